//! One full update run: read targets, fetch rates, write them back.

use crate::core::catalog::get_currencies;
use crate::core::config::ProviderSettings;
use crate::core::currency::{ConfigSource, Currency, CurrencyCatalog};
use crate::core::rates::RateMap;
use crate::core::writer::{SaveReport, save_latest_rates};
use crate::fetcher::RateFetcher;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// A target currency and the rate it is moving to.
#[derive(Debug, Clone, PartialEq)]
pub struct RateChange {
    pub currency: Currency,
    pub new_rate: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateReport {
    pub default_currency: Option<String>,
    pub changes: Vec<RateChange>,
    /// ISO codes of target currencies the provider had no rate for.
    pub unpriced: Vec<String>,
    /// `None` when nothing was written (dry run).
    pub saved: Option<SaveReport>,
}

/// Pairs target currencies with fetched rates by ISO code.
pub fn match_rates(currencies: &[Currency], rates: &RateMap) -> (Vec<RateChange>, Vec<String>) {
    let mut changes = Vec::new();
    let mut unpriced = Vec::new();
    for currency in currencies {
        match rates.get(&currency.iso4217.to_uppercase()) {
            Some(rate) => changes.push(RateChange {
                currency: currency.clone(),
                new_rate: *rate,
            }),
            None => unpriced.push(currency.iso4217.clone()),
        }
    }
    (changes, unpriced)
}

pub async fn update_rates(
    config: &dyn ConfigSource,
    catalog: &dyn CurrencyCatalog,
    fetcher: &RateFetcher,
    settings: &ProviderSettings,
    dry_run: bool,
) -> Result<UpdateReport> {
    let currencies = get_currencies(config, catalog)?;
    let rates = match fetcher.get_latest_rates(settings).await {
        Ok(rates) => rates,
        Err(e) if e.is_fetch_failure() => {
            return Err(e).context("Failed to fetch latest rates");
        }
        Err(e) => return Err(e).context("Failed to re-base latest rates"),
    };

    let (changes, unpriced) = match_rates(&currencies, &rates);
    if !unpriced.is_empty() {
        warn!(?unpriced, "No rate available for some currencies");
    }

    let saved = if dry_run {
        info!(count = changes.len(), "Dry run, not saving rates");
        None
    } else {
        let by_id: BTreeMap<String, Decimal> = changes
            .iter()
            .map(|c| (c.currency.id.clone(), c.new_rate))
            .collect();
        let report = save_latest_rates(catalog, &by_id);
        info!(
            updated = report.updated.len(),
            missing = report.missing.len(),
            failed = report.failed.len(),
            "Saved latest rates"
        );
        Some(report)
    };

    Ok(UpdateReport {
        default_currency: settings.default_currency(),
        changes,
        unpriced,
        saved,
    })
}
