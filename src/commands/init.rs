use crate::args::InitArgs;
use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the invoice home directory and an initial `config.json`.
///
/// # Arguments
/// - `invoice_home` - The directory that will be the root of the data directory, e.g.
///   `$HOME/invoice`
/// - `args` - The optional service fee and currency symbol to write into the config.
///
/// # Errors
/// - Returns an error if the directory is already initialized or any file operations fail.
pub async fn init(invoice_home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(
        invoice_home,
        args.service_fee(),
        args.currency_symbol().map(str::to_string),
    )
    .await
    .context("Unable to create the invoice directory and config")?;
    Ok(format!(
        "Successfully created the invoice directory at {} with a service fee of {}",
        config.root().display(),
        config.service_fee().normalize()
    )
    .into())
}
