use crate::core::currency::{Currency, CurrencyCatalog, CurrencyFilter};
use anyhow::{Context, Result};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "currencies";

/// Currency catalog persisted in a fjall keyspace, one JSON record per id.
pub struct DiskCatalog {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskCatalog {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;

        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open catalog at {}", path.display()))?;
        let partition = keyspace.open_partition(PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened currency catalog at {}", path.display());

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl CurrencyCatalog for DiskCatalog {
    fn list_currencies(&self, filter: &CurrencyFilter) -> Result<Vec<Currency>> {
        let mut currencies = Vec::new();
        for item in self.partition.iter() {
            let (key, value) = item?;
            let currency: Currency = serde_json::from_slice(&value).with_context(|| {
                format!(
                    "Corrupt catalog record: {}",
                    String::from_utf8_lossy(&key)
                )
            })?;
            if filter.matches(&currency) {
                currencies.push(currency);
            }
        }
        Ok(currencies)
    }

    fn load_currency_by_id(&self, id: &str) -> Result<Option<Currency>> {
        match self.partition.get(id)? {
            Some(value) => {
                let currency = serde_json::from_slice(&value)
                    .with_context(|| format!("Corrupt catalog record: {id}"))?;
                Ok(Some(currency))
            }
            None => Ok(None),
        }
    }

    fn save_currency(&self, currency: &Currency) -> Result<()> {
        self.partition
            .insert(currency.id.as_str(), serde_json::to_vec(currency)?)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!(id = %currency.id, "Catalog PUT");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyStatus;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[test]
    fn test_disk_catalog_get_put() {
        let dir = tempdir().unwrap();
        let catalog = DiskCatalog::open(dir.path()).unwrap();

        assert!(catalog.load_currency_by_id("1").unwrap().is_none());

        let usd = Currency::new("1", "US Dollar", "USD", dec!(1.0903));
        catalog.save_currency(&usd).unwrap();

        assert_eq!(catalog.load_currency_by_id("1").unwrap(), Some(usd));
    }

    #[test]
    fn test_disk_catalog_list_with_filter() {
        let dir = tempdir().unwrap();
        let catalog = DiskCatalog::open(dir.path()).unwrap();

        let mut chf = Currency::new("3", "Swiss Franc", "CHF", dec!(0.94));
        chf.status = CurrencyStatus::Inactive;
        catalog
            .save_currency(&Currency::new("1", "US Dollar", "USD", dec!(1)))
            .unwrap();
        catalog
            .save_currency(&Currency::new("2", "Euro", "EUR", dec!(0.92)))
            .unwrap();
        catalog.save_currency(&chf).unwrap();

        let filter = CurrencyFilter {
            status: Some(CurrencyStatus::Active),
            exclude_iso4217: Some("usd".to_string()),
        };
        let listed = catalog.list_currencies(&filter).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].iso4217, "EUR");
    }
}
