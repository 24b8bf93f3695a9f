//! Provider selection and the re-based rate fetch.

use crate::core::config::{
    AppConfig, OPEN_EXCHANGE_RATES_HOST, ProviderSettings, ProvidersConfig,
};
use crate::core::error::RateError;
use crate::core::rates::{self, RateMap, RateProvider};
use crate::providers::util::build_client;
use crate::providers::{EcbProvider, OpenExchangeRatesProvider};
use anyhow::Result;
use tracing::{debug, info, warn};

pub struct RateFetcher {
    client: reqwest::Client,
    providers: ProvidersConfig,
}

impl RateFetcher {
    pub fn new(client: reqwest::Client, providers: ProvidersConfig) -> Self {
        Self { client, providers }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = build_client(config.request_timeout())?;
        Ok(Self::new(client, config.providers.clone()))
    }

    /// Picks the commercial provider when it is enabled and fully configured,
    /// the ECB reference feed otherwise.
    pub fn select_provider(&self, settings: &ProviderSettings) -> Box<dyn RateProvider> {
        if let Some((app_id, secure)) = settings.commercial_credentials() {
            let host = self
                .providers
                .open_exchange_rates
                .as_ref()
                .map_or(OPEN_EXCHANGE_RATES_HOST, |p| p.host.as_str());
            return Box::new(OpenExchangeRatesProvider::new(
                self.client.clone(),
                host,
                app_id,
                secure,
            ));
        }
        if settings.commercial_enabled {
            debug!("Commercial provider enabled without app id or transport, using ECB");
        }
        Box::new(EcbProvider::new(
            self.client.clone(),
            &self.providers.ecb.url,
        ))
    }

    /// Latest rates expressed against the settings' default currency.
    ///
    /// Without a default currency there is nothing to re-base against and the
    /// result is empty. An empty result always means "nothing to update".
    pub async fn get_latest_rates(&self, settings: &ProviderSettings) -> Result<RateMap, RateError> {
        let Some(default_iso4217) = settings.default_currency() else {
            warn!("No default currency configured, skipping rate fetch");
            return Ok(RateMap::new());
        };

        let provider = self.select_provider(settings);
        fetch_rebased(provider.as_ref(), &default_iso4217).await
    }
}

/// Fetches from `provider` and re-bases the result to `default_iso4217`.
pub async fn fetch_rebased(
    provider: &dyn RateProvider,
    default_iso4217: &str,
) -> Result<RateMap, RateError> {
    info!(provider = provider.id(), "Fetching latest rates");
    let fetched = provider.fetch_latest().await?;
    debug!(
        base = %fetched.base,
        count = fetched.rates.len(),
        published = ?fetched.published,
        "Fetched rates"
    );
    rates::normalize(fetched, default_iso4217, provider.on_missing_base())
}
