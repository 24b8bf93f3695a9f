//! Currency records and the host interfaces they are read from and written to.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Config key holding the host's default currency code.
pub const DEFAULT_CURRENCY_KEY: &str = "default_currency_iso4217";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyStatus {
    Active,
    Inactive,
}

/// A currency as tracked by the host catalog.
///
/// `conversion_rate` is expressed against the host's default currency and is
/// the only field the updater ever changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub id: String,
    pub name: String,
    pub iso4217: String,
    pub status: CurrencyStatus,
    pub conversion_rate: Decimal,
}

impl Currency {
    pub fn new(id: &str, name: &str, iso4217: &str, conversion_rate: Decimal) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            iso4217: iso4217.to_uppercase(),
            status: CurrencyStatus::Active,
            conversion_rate,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CurrencyStatus::Active
    }
}

/// Selection criteria for [`CurrencyCatalog::list_currencies`].
#[derive(Debug, Clone, Default)]
pub struct CurrencyFilter {
    pub status: Option<CurrencyStatus>,
    /// ISO code to leave out, compared case-insensitively.
    pub exclude_iso4217: Option<String>,
}

impl CurrencyFilter {
    pub fn matches(&self, currency: &Currency) -> bool {
        if let Some(status) = self.status
            && currency.status != status
        {
            return false;
        }
        match &self.exclude_iso4217 {
            Some(iso) => !currency.iso4217.eq_ignore_ascii_case(iso),
            None => true,
        }
    }
}

/// Read access to host configuration values.
pub trait ConfigSource: Send + Sync {
    fn get_config(&self, key: &str) -> Option<String>;
}

/// The host's currency catalog.
pub trait CurrencyCatalog: Send + Sync {
    fn list_currencies(&self, filter: &CurrencyFilter) -> Result<Vec<Currency>>;

    fn load_currency_by_id(&self, id: &str) -> Result<Option<Currency>>;

    fn save_currency(&self, currency: &Currency) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_filter_matches() {
        let mut usd = Currency::new("1", "US Dollar", "usd", dec!(1.1));
        let filter = CurrencyFilter {
            status: Some(CurrencyStatus::Active),
            exclude_iso4217: Some("EUR".to_string()),
        };
        assert_eq!(usd.iso4217, "USD");
        assert!(filter.matches(&usd));

        usd.status = CurrencyStatus::Inactive;
        assert!(!filter.matches(&usd));

        let eur = Currency::new("2", "Euro", "EUR", dec!(1));
        assert!(!filter.matches(&eur));
        assert!(CurrencyFilter::default().matches(&eur));
    }
}
