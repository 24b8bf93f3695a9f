use crate::core::currency::{
    ConfigSource, Currency, CurrencyCatalog, CurrencyFilter, CurrencyStatus, DEFAULT_CURRENCY_KEY,
};
use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Active currencies other than the configured default, ordered by name.
pub fn get_currencies(
    config: &dyn ConfigSource,
    catalog: &dyn CurrencyCatalog,
) -> Result<Vec<Currency>> {
    let default_iso4217 = config
        .get_config(DEFAULT_CURRENCY_KEY)
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty());
    if default_iso4217.is_none() {
        warn!("No default currency configured, listing every active currency");
    }

    let filter = CurrencyFilter {
        status: Some(CurrencyStatus::Active),
        exclude_iso4217: default_iso4217,
    };
    let mut currencies = catalog
        .list_currencies(&filter)
        .context("Failed to list currencies")?;
    currencies.sort_by(|a, b| a.name.cmp(&b.name));

    debug!(count = currencies.len(), "Loaded target currencies");
    Ok(currencies)
}
