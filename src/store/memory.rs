use crate::core::currency::{Currency, CurrencyCatalog, CurrencyFilter};
use anyhow::{Result, anyhow};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

/// In-memory currency catalog keyed by id.
#[derive(Default)]
pub struct MemoryCatalog {
    inner: Mutex<BTreeMap<String, Currency>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_currencies(currencies: Vec<Currency>) -> Self {
        let map = currencies.into_iter().map(|c| (c.id.clone(), c)).collect();
        Self {
            inner: Mutex::new(map),
        }
    }
}

impl CurrencyCatalog for MemoryCatalog {
    fn list_currencies(&self, filter: &CurrencyFilter) -> Result<Vec<Currency>> {
        let inner = self.inner.lock().map_err(|_| anyhow!("Catalog lock poisoned"))?;
        Ok(inner.values().filter(|c| filter.matches(c)).cloned().collect())
    }

    fn load_currency_by_id(&self, id: &str) -> Result<Option<Currency>> {
        let inner = self.inner.lock().map_err(|_| anyhow!("Catalog lock poisoned"))?;
        Ok(inner.get(id).cloned())
    }

    fn save_currency(&self, currency: &Currency) -> Result<()> {
        let mut inner = self.inner.lock().map_err(|_| anyhow!("Catalog lock poisoned"))?;
        debug!(id = %currency.id, "Catalog PUT");
        inner.insert(currency.id.clone(), currency.clone());
        Ok(())
    }
}
