use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use rust_decimal::Decimal;
use xru::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for xru::AppCommand {
    fn from(cmd: Commands) -> xru::AppCommand {
        match cmd {
            Commands::Currencies => xru::AppCommand::Currencies,
            Commands::Add {
                iso4217,
                name,
                rate,
            } => xru::AppCommand::Add {
                iso4217,
                name,
                rate,
            },
            Commands::Deactivate { iso4217 } => xru::AppCommand::Deactivate { iso4217 },
            Commands::Rates => xru::AppCommand::Rates,
            Commands::Update { dry_run } => xru::AppCommand::Update { dry_run },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List the currencies that receive rate updates
    Currencies,
    /// Add a currency to the catalog
    Add {
        /// ISO-4217 code, e.g. USD
        iso4217: String,
        /// Display name
        name: String,
        /// Initial conversion rate against the default currency
        #[arg(long)]
        rate: Option<Decimal>,
    },
    /// Stop updating a currency
    Deactivate {
        /// ISO-4217 code
        iso4217: String,
    },
    /// Show the latest rates without saving them
    Rates,
    /// Fetch the latest rates and store them in the catalog
    Update {
        /// Show what would change without saving
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => xru::cli::setup::setup_at_path(path),
            None => xru::cli::setup::setup(),
        },
        Some(cmd) => xru::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
