//! Core business logic abstractions

pub mod catalog;
pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod rates;
pub mod writer;

// Re-export main types for cleaner imports
pub use currency::{ConfigSource, Currency, CurrencyCatalog, CurrencyFilter, CurrencyStatus};
pub use error::RateError;
pub use rates::{FetchedRates, MissingBase, RateMap, RateProvider};
pub use writer::SaveReport;
