//! Open Exchange Rates `latest.json` provider.
//!
//! The provider decides the base currency (USD on most plans) and lists the
//! base itself among the rates. Free plans are only served over plain HTTP,
//! hence the `secure_connection` switch.

use crate::core::error::RateError;
use crate::core::rates::{FetchedRates, MissingBase, RateMap, RateProvider};
use async_trait::async_trait;
use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

const PROVIDER_ID: &str = "OPEN_EXCHANGE_RATES";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    error: bool,
    message: Option<String>,
    description: Option<String>,
    base: Option<String>,
    timestamp: Option<i64>,
    #[serde(default)]
    rates: RateMap,
}

pub struct OpenExchangeRatesProvider {
    client: reqwest::Client,
    host: String,
    app_id: String,
    secure: bool,
}

impl OpenExchangeRatesProvider {
    pub fn new(client: reqwest::Client, host: &str, app_id: &str, secure: bool) -> Self {
        Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
            secure,
        }
    }

    fn latest_url(&self) -> Result<reqwest::Url, RateError> {
        let scheme = if self.secure { "https" } else { "http" };
        let endpoint = format!("{}://{}/api/latest.json", scheme, self.host);
        reqwest::Url::parse_with_params(&endpoint, &[("app_id", self.app_id.as_str())]).map_err(
            |e| RateError::Request {
                provider: PROVIDER_ID.to_string(),
                message: format!("invalid host {}: {}", self.host, e),
            },
        )
    }
}

#[async_trait]
impl RateProvider for OpenExchangeRatesProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn on_missing_base(&self) -> MissingBase {
        MissingBase::Fail
    }

    #[instrument(
        name = "OpenExchangeRatesFetch",
        skip(self),
        fields(host = %self.host, secure = self.secure)
    )]
    async fn fetch_latest(&self) -> Result<FetchedRates, RateError> {
        debug!("Requesting latest rates from {}", self.host);

        let response = self
            .client
            .get(self.latest_url()?)
            .send()
            .await
            .map_err(|e| RateError::from_reqwest(PROVIDER_ID, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RateError::from_reqwest(PROVIDER_ID, e))?;

        // Error documents come with a 4xx status, so try to read them first.
        let parsed = serde_json::from_str::<LatestResponse>(&text);
        if let Ok(data) = &parsed
            && data.error
        {
            let message = data
                .description
                .clone()
                .or_else(|| data.message.clone())
                .unwrap_or_else(|| format!("request failed with {status}"));
            return Err(RateError::Provider {
                provider: PROVIDER_ID.to_string(),
                message,
            });
        }
        if !status.is_success() {
            return Err(RateError::Status {
                provider: PROVIDER_ID.to_string(),
                status,
            });
        }

        let data = parsed.map_err(|e| RateError::Malformed {
            provider: PROVIDER_ID.to_string(),
            message: e.to_string(),
        })?;
        let base = data.base.ok_or_else(|| RateError::Malformed {
            provider: PROVIDER_ID.to_string(),
            message: "missing base currency".to_string(),
        })?;
        let base_rate = data.rates.get(&base).copied().unwrap_or(Decimal::ONE);
        let published = data
            .timestamp
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.date_naive());

        debug!(%base, count = data.rates.len(), "Parsed latest rates");

        Ok(FetchedRates {
            provider: PROVIDER_ID,
            base,
            rates: data.rates,
            base_rate,
            published,
        })
    }
}
