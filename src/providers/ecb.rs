//! European Central Bank daily reference rates.
//!
//! The feed is an XML document quoting roughly thirty currencies against EUR,
//! one `<Cube currency='USD' rate='1.0903'/>` element per line. It is read
//! line by line with attribute patterns rather than an XML parser, so stray
//! attributes, whitespace or a broken line never spoil the rest of the feed.

use crate::core::error::RateError;
use crate::core::rates::{FetchedRates, MissingBase, RateMap, RateProvider};
use crate::providers::util::fetch_text;
use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, instrument};

const PROVIDER_ID: &str = "ECB";

/// Implicit base currency of the reference feed.
pub const ECB_BASE: &str = "EUR";

static CURRENCY_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"currency\s*=\s*['"]([[:alpha:]]+)['"]"#).expect("Invalid regex pattern")
});

static RATE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"rate\s*=\s*['"]([^'"\s]+)['"]"#).expect("Invalid regex pattern")
});

static TIME_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"time\s*=\s*['"](\d{4}-\d{2}-\d{2})['"]"#).expect("Invalid regex pattern")
});

pub struct EcbProvider {
    client: reqwest::Client,
    url: String,
}

impl EcbProvider {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        EcbProvider {
            client,
            url: url.to_string(),
        }
    }
}

/// Extracts the rates and publication date from a reference feed document.
pub fn parse_feed(content: &str) -> (RateMap, Option<NaiveDate>) {
    let mut rates = RateMap::new();
    let mut published = None;

    for line in content.lines() {
        if published.is_none()
            && let Some(time) = TIME_ATTR.captures(line)
        {
            published = NaiveDate::parse_from_str(&time[1], "%Y-%m-%d").ok();
        }

        let Some(currency) = CURRENCY_ATTR.captures(line) else {
            continue;
        };
        let Some(rate) = RATE_ATTR.captures(line) else {
            debug!(line = line.trim(), "Skipping feed line without a rate");
            continue;
        };
        let parsed = Decimal::from_str(&rate[1]).or_else(|_| Decimal::from_scientific(&rate[1]));
        match parsed {
            Ok(value) => {
                rates.insert(currency[1].to_uppercase(), value);
            }
            Err(e) => debug!(line = line.trim(), "Skipping unparsable rate: {}", e),
        }
    }

    (rates, published)
}

#[async_trait]
impl RateProvider for EcbProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn on_missing_base(&self) -> MissingBase {
        MissingBase::Empty
    }

    #[instrument(name = "EcbRatesFetch", skip(self), fields(url = %self.url))]
    async fn fetch_latest(&self) -> Result<FetchedRates, RateError> {
        debug!("Requesting reference rates from {}", self.url);
        let content = fetch_text(&self.client, &self.url, PROVIDER_ID).await?;

        let (rates, published) = parse_feed(&content);
        debug!(count = rates.len(), ?published, "Parsed reference feed");

        Ok(FetchedRates {
            provider: PROVIDER_ID,
            base: ECB_BASE.to_string(),
            rates,
            base_rate: Decimal::ONE,
            published,
        })
    }
}
