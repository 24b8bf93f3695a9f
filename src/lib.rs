pub mod cli;
pub mod core;
pub mod fetcher;
pub mod providers;
pub mod store;
pub mod updater;

use anyhow::Result;
use rust_decimal::Decimal;
use tracing::{debug, info};

pub enum AppCommand {
    Currencies,
    Add {
        iso4217: String,
        name: String,
        rate: Option<Decimal>,
    },
    Deactivate {
        iso4217: String,
    },
    Rates,
    Update {
        dry_run: bool,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Exchange rate updater starting...");

    let config = match config_path {
        Some(path) => core::config::AppConfig::load_from_path(path)?,
        None => core::config::AppConfig::load()?,
    };
    debug!(default_currency = ?config.default_currency, "Loaded config");

    match command {
        AppCommand::Rates => {
            let fetcher = fetcher::RateFetcher::from_config(&config)?;
            cli::rates::run(&config, &fetcher).await
        }
        AppCommand::Update { dry_run } => {
            let catalog = store::open_catalog(&config)?;
            let fetcher = fetcher::RateFetcher::from_config(&config)?;
            cli::update::run(&config, &catalog, &fetcher, dry_run).await
        }
        AppCommand::Currencies => {
            let catalog = store::open_catalog(&config)?;
            cli::currencies::list(&config, &catalog)
        }
        AppCommand::Add {
            iso4217,
            name,
            rate,
        } => {
            let catalog = store::open_catalog(&config)?;
            cli::currencies::add(&catalog, &iso4217, &name, rate)
        }
        AppCommand::Deactivate { iso4217 } => {
            let catalog = store::open_catalog(&config)?;
            cli::currencies::deactivate(&catalog, &iso4217)
        }
    }
}
