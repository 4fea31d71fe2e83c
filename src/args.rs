//! These structs provide the CLI interface for the invoice CLI.

use crate::model::BillType;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// invoice: A command-line calculator for utility-bill invoices.
///
/// Enter electricity and water bill amounts, and this program adds a fixed service fee for every
/// bill, sums up a total and prints an invoice. Bills are saved in the invoice home directory after
/// every change, so each command picks up where the last one left off.
///
/// Start with `invoice init`, then `invoice add electricity`, `invoice set <ID> <AMOUNT>` and
/// finally `invoice print`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the invoice home directory and its configuration file.
    ///
    /// This is the first command you should run. By default the home directory is
    /// $HOME/invoice; pass --invoice-home or set INVOICE_HOME to put it somewhere else.
    Init(InitArgs),
    /// Add a new, empty bill. Prints the id of the new bill.
    Add(AddArgs),
    /// Remove a bill by id.
    Remove(RemoveArgs),
    /// Set the amount of a bill. The text is saved exactly as given.
    Set(SetArgs),
    /// Empty the amount of every bill, keeping the bills themselves.
    Clear,
    /// List the bills, newest first.
    List(ListArgs),
    /// Show the subtotals, service fees and grand total.
    Summary,
    /// Render the printable invoice.
    Print(PrintArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where bills and configuration are held. Defaults to ~/invoice
    #[arg(long, env = "INVOICE_HOME", default_value_t = default_invoice_home())]
    invoice_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, invoice_home: PathBuf) -> Self {
        Self {
            log_level,
            invoice_home: invoice_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn invoice_home(&self) -> &DisplayPath {
        &self.invoice_home
    }
}

/// Args for the `invoice init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The fee added for every bill that has an amount greater than zero. Defaults to 1000.
    #[arg(long)]
    service_fee: Option<Decimal>,

    /// The symbol shown after amounts. Defaults to the riel sign.
    #[arg(long)]
    currency_symbol: Option<String>,
}

impl InitArgs {
    pub fn new(service_fee: Option<Decimal>, currency_symbol: Option<String>) -> Self {
        Self {
            service_fee,
            currency_symbol,
        }
    }

    pub fn service_fee(&self) -> Option<Decimal> {
        self.service_fee
    }

    pub fn currency_symbol(&self) -> Option<&str> {
        self.currency_symbol.as_deref()
    }
}

/// Args for the `invoice add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The kind of bill to add.
    #[arg(value_enum)]
    category: BillType,
}

impl AddArgs {
    pub fn new(category: BillType) -> Self {
        Self { category }
    }

    pub fn category(&self) -> BillType {
        self.category
    }
}

/// Args for the `invoice remove` command.
#[derive(Debug, Parser, Clone)]
pub struct RemoveArgs {
    /// The id of the bill to remove.
    id: String,
}

impl RemoveArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Args for the `invoice set` command.
#[derive(Debug, Parser, Clone)]
pub struct SetArgs {
    /// The id of the bill to change.
    id: String,

    /// The new amount. Anything is accepted; text that is not a number counts as zero.
    #[arg(allow_hyphen_values = true, default_value = "")]
    amount: String,
}

impl SetArgs {
    pub fn new(id: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            amount: amount.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }
}

/// How `invoice list` writes the bills.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ListFormat {
    /// A JSON array in the same shape the bills are saved in.
    Json,
    /// A markdown table.
    #[default]
    Table,
    /// CSV with a header row.
    Csv,
}

serde_plain::derive_display_from_serialize!(ListFormat);
serde_plain::derive_fromstr_from_deserialize!(ListFormat);

/// Args for the `invoice list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// The output format: json, table or csv.
    #[arg(long, value_enum, default_value_t = ListFormat::Table)]
    format: ListFormat,
}

impl ListArgs {
    pub fn new(format: ListFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ListFormat {
        self.format
    }
}

/// Args for the `invoice print` command.
#[derive(Debug, Parser, Clone)]
pub struct PrintArgs {
    /// Write the invoice to this file instead of stdout.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

impl PrintArgs {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

fn default_invoice_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("invoice"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --invoice-home or INVOICE_HOME instead of relying on the \
                default invoice home directory.",
            );
            PathBuf::from("invoice")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("invoice").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_add() {
        let args = parse(&["--invoice-home", "/tmp/x", "add", "water"]);
        assert_eq!(args.common().invoice_home().path(), Path::new("/tmp/x"));
        match args.command() {
            Command::Add(add) => assert_eq!(add.category(), BillType::Water),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_set_negative_and_empty() {
        match parse(&["set", "abc", "-40"]).command() {
            Command::Set(set) => {
                assert_eq!(set.id(), "abc");
                assert_eq!(set.amount(), "-40");
            }
            other => panic!("unexpected command {other:?}"),
        }
        match parse(&["set", "abc"]).command() {
            Command::Set(set) => assert_eq!(set.amount(), ""),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_init_fee() {
        match parse(&["init", "--service-fee", "1500"]).command() {
            Command::Init(init) => {
                assert_eq!(init.service_fee(), Some(Decimal::from(1500)));
                assert!(init.currency_symbol().is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_format() {
        match parse(&["list", "--format", "csv"]).command() {
            Command::List(list) => assert_eq!(list.format(), ListFormat::Csv),
            other => panic!("unexpected command {other:?}"),
        }
        match parse(&["list"]).command() {
            Command::List(list) => assert_eq!(list.format(), ListFormat::Table),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_log_level() {
        let args = parse(&["--log-level", "debug", "summary"]);
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_parse_rejects_unknown_category() {
        assert!(Args::try_parse_from(["invoice", "add", "gas"]).is_err());
    }
}
