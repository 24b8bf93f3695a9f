pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::currency::{Currency, CurrencyCatalog, CurrencyFilter, CurrencyStatus};
use anyhow::{Result, bail};
use disk::DiskCatalog;
use rust_decimal::Decimal;
use tracing::info;

/// Opens the catalog under the configured data directory.
pub fn open_catalog(config: &AppConfig) -> Result<DiskCatalog> {
    let path = config.data_path()?.join("catalog");
    DiskCatalog::open(&path)
}

/// Adds an active currency, refusing a second active entry for one ISO code.
pub fn add_currency(
    catalog: &dyn CurrencyCatalog,
    iso4217: &str,
    name: &str,
    conversion_rate: Decimal,
) -> Result<Currency> {
    let iso4217 = iso4217.trim().to_uppercase();
    if iso4217.len() != 3 || !iso4217.chars().all(|c| c.is_ascii_alphabetic()) {
        bail!("Invalid ISO-4217 code: {}", iso4217);
    }
    if conversion_rate <= Decimal::ZERO {
        bail!("Conversion rate must be positive, got {}", conversion_rate);
    }

    let active = CurrencyFilter {
        status: Some(CurrencyStatus::Active),
        exclude_iso4217: None,
    };
    if catalog
        .list_currencies(&active)?
        .iter()
        .any(|c| c.iso4217 == iso4217)
    {
        bail!("An active currency with code {} already exists", iso4217);
    }

    let id = uuid::Uuid::new_v4().to_string();
    let currency = Currency::new(&id, name, &iso4217, conversion_rate);
    catalog.save_currency(&currency)?;
    info!(%id, %iso4217, "Added currency");
    Ok(currency)
}

/// Marks every active currency with the given code inactive.
pub fn deactivate_currency(catalog: &dyn CurrencyCatalog, iso4217: &str) -> Result<usize> {
    let active = CurrencyFilter {
        status: Some(CurrencyStatus::Active),
        exclude_iso4217: None,
    };
    let mut count = 0;
    for mut currency in catalog.list_currencies(&active)? {
        if currency.iso4217.eq_ignore_ascii_case(iso4217) {
            currency.status = CurrencyStatus::Inactive;
            catalog.save_currency(&currency)?;
            count += 1;
        }
    }
    if count == 0 {
        bail!("No active currency with code {}", iso4217.to_uppercase());
    }
    info!(iso4217, "Deactivated currency");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::memory::MemoryCatalog;
    use rust_decimal_macros::dec;

    #[test]
    fn test_add_currency() {
        let catalog = MemoryCatalog::new();

        let added = add_currency(&catalog, "gbp", "Pound Sterling", dec!(1)).unwrap();
        assert_eq!(added.iso4217, "GBP");
        assert!(added.is_active());
        assert_eq!(catalog.load_currency_by_id(&added.id).unwrap(), Some(added));

        let dup = add_currency(&catalog, "GBP", "Pound", dec!(1));
        assert!(dup.unwrap_err().to_string().contains("already exists"));
        assert!(add_currency(&catalog, "GB", "Bad", dec!(1)).is_err());
        assert!(add_currency(&catalog, "CHF", "Swiss Franc", dec!(0)).is_err());
    }

    #[test]
    fn test_deactivate_then_re_add() {
        let catalog = MemoryCatalog::new();
        let added = add_currency(&catalog, "CHF", "Swiss Franc", dec!(0.94)).unwrap();

        assert_eq!(deactivate_currency(&catalog, "chf").unwrap(), 1);
        let stored = catalog.load_currency_by_id(&added.id).unwrap().unwrap();
        assert_eq!(stored.status, CurrencyStatus::Inactive);

        assert!(deactivate_currency(&catalog, "CHF").is_err());
        assert!(add_currency(&catalog, "CHF", "Swiss Franc", dec!(0.95)).is_ok());
    }
}
