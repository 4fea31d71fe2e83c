//! Configuration file handling for the invoice app.
//!
//! The configuration file is stored at `$INVOICE_HOME/config.json` and holds the service fee that
//! is charged per bill and the currency symbol used when amounts are displayed. The saved bills
//! live next to it in `$INVOICE_HOME/bills.json`.

use crate::model::{Amount, DEFAULT_CURRENCY_SYMBOL};
use crate::storage::FileStorage;
use crate::store::{BillStore, BILLS_KEY};
use crate::{utils, Result};
use anyhow::{bail, Context};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "invoice";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The service fee used when `init` is not given one.
pub const DEFAULT_SERVICE_FEE: Decimal = Decimal::ONE_THOUSAND;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$INVOICE_HOME` and from there it loads `$INVOICE_HOME/config.json`. It also knows
/// where the bills are stored within the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, if needed, and writes an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory, e.g. `$HOME/invoice`
    /// - `service_fee` - The fee charged per billable bill, defaults to `DEFAULT_SERVICE_FEE`
    /// - `currency_symbol` - The symbol appended to displayed amounts, defaults to `៛`
    ///
    /// # Errors
    /// - Returns an error if a config file already exists or any file operation fails.
    pub async fn create(
        dir: impl Into<PathBuf>,
        service_fee: Option<Decimal>,
        currency_symbol: Option<String>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the invoice home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        let config_file = ConfigFile {
            service_fee: Amount::new(service_fee.unwrap_or(DEFAULT_SERVICE_FEE)),
            currency_symbol,
            ..ConfigFile::default()
        };
        config_file.validate()?;
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `invoice_home` exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(invoice_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = invoice_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The invoice home directory is missing, run 'invoice init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'invoice init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The fee added once for every bill with a positive amount.
    pub fn service_fee(&self) -> Decimal {
        self.config_file.service_fee.value()
    }

    pub fn currency_symbol(&self) -> &str {
        self.config_file
            .currency_symbol
            .as_deref()
            .unwrap_or(DEFAULT_CURRENCY_SYMBOL)
    }

    /// The storage that holds the saved bills.
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.root)
    }

    /// The file in which the bills are saved.
    pub fn bills_path(&self) -> PathBuf {
        self.storage().path(BILLS_KEY)
    }

    /// Loads the saved bills into a `BillStore`.
    pub async fn bill_store(&self) -> BillStore<FileStorage> {
        BillStore::load(self.storage()).await
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "invoice",
///   "config_version": 1,
///   "service_fee": "1000",
///   "currency_symbol": "៛"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "invoice"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The fee charged per bill whose amount is greater than zero
    service_fee: Amount,

    /// Symbol placed after displayed amounts. Defaults to the riel sign if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency_symbol: Option<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            service_fee: Amount::new(DEFAULT_SERVICE_FEE),
            currency_symbol: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or contains invalid values
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file at {}", path.display()))?;
        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            self.app_name
        );
        anyhow::ensure!(
            !self.service_fee.is_negative(),
            "The service fee cannot be negative, got {}",
            self.service_fee
        );
        Ok(())
    }
}
