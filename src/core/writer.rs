use crate::core::currency::CurrencyCatalog;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Outcome of one batch of rate updates, by currency id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    pub updated: Vec<String>,
    /// Ids with no record in the catalog.
    pub missing: Vec<String>,
    /// Ids whose load or save failed, with the error text.
    pub failed: Vec<(String, String)>,
    /// Ids that were given a zero or negative rate.
    pub rejected: Vec<String>,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.failed.is_empty() && self.rejected.is_empty()
    }
}

/// Writes each rate to the currency with the matching id.
///
/// A bad entry never stops the batch; it is recorded in the report instead.
pub fn save_latest_rates(
    catalog: &dyn CurrencyCatalog,
    rates: &BTreeMap<String, Decimal>,
) -> SaveReport {
    let mut report = SaveReport::default();

    for (id, rate) in rates {
        if *rate <= Decimal::ZERO {
            warn!(%id, %rate, "Refusing to store non-positive rate");
            report.rejected.push(id.clone());
            continue;
        }

        let mut currency = match catalog.load_currency_by_id(id) {
            Ok(Some(currency)) => currency,
            Ok(None) => {
                warn!(%id, "Currency not found, skipping");
                report.missing.push(id.clone());
                continue;
            }
            Err(e) => {
                warn!(%id, "Failed to load currency: {:#}", e);
                report.failed.push((id.clone(), format!("{e:#}")));
                continue;
            }
        };

        currency.conversion_rate = *rate;
        match catalog.save_currency(&currency) {
            Ok(()) => {
                debug!(%id, iso4217 = %currency.iso4217, %rate, "Saved conversion rate");
                report.updated.push(id.clone());
            }
            Err(e) => {
                warn!(%id, "Failed to save currency: {:#}", e);
                report.failed.push((id.clone(), format!("{e:#}")));
            }
        }
    }

    report
}
