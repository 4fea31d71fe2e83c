use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use utility_invoice::args::{Args, Command};
use utility_invoice::{commands, Config, Result};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().invoice_home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args).await?.print(),

        Command::Add(add_args) => {
            let config = Config::load(home).await?;
            commands::add_bill(config, add_args.clone()).await?.print()
        }

        Command::Remove(remove_args) => {
            let config = Config::load(home).await?;
            commands::remove_bill(config, remove_args.clone())
                .await?
                .print()
        }

        Command::Set(set_args) => {
            let config = Config::load(home).await?;
            commands::set_amount(config, set_args.clone()).await?.print()
        }

        Command::Clear => {
            let config = Config::load(home).await?;
            commands::clear_amounts(config).await?.print()
        }

        Command::List(list_args) => {
            let config = Config::load(home).await?;
            commands::list_bills(config, list_args.clone())
                .await?
                .print()
        }

        Command::Summary => commands::summary(Config::load(home).await?).await?.print(),

        Command::Print(print_args) => {
            let config = Config::load(home).await?;
            commands::print(config, print_args.clone()).await?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this package only.
            EnvFilter::new(format!(
                "utility_invoice={},{}={}",
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
