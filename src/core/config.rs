use crate::core::currency::{ConfigSource, DEFAULT_CURRENCY_KEY};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const ECB_DAILY_URL: &str = "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-daily.xml";
pub const OPEN_EXCHANGE_RATES_HOST: &str = "openexchangerates.org";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EcbProviderConfig {
    pub url: String,
}

impl Default for EcbProviderConfig {
    fn default() -> Self {
        EcbProviderConfig {
            url: ECB_DAILY_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OpenExchangeRatesConfig {
    /// Stands in for the host's upgrade check; the commercial feed is only
    /// used when this is set.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_oxr_host")]
    pub host: String,
    pub app_id: Option<String>,
    pub secure_connection: Option<bool>,
}

fn default_oxr_host() -> String {
    OPEN_EXCHANGE_RATES_HOST.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub ecb: EcbProviderConfig,
    pub open_exchange_rates: Option<OpenExchangeRatesConfig>,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// ISO-4217 code every conversion rate is expressed against.
    pub default_currency: Option<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "xru", "xru")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("org", "xru", "xru")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn provider_settings(&self) -> ProviderSettings {
        let oxr = self.providers.open_exchange_rates.as_ref();
        ProviderSettings {
            default_iso4217: self.default_currency.clone(),
            app_id: oxr.and_then(|p| p.app_id.clone()),
            secure_connection: oxr.and_then(|p| p.secure_connection),
            commercial_enabled: oxr.is_some_and(|p| p.enabled),
        }
    }
}

impl ConfigSource for AppConfig {
    fn get_config(&self, key: &str) -> Option<String> {
        match key {
            DEFAULT_CURRENCY_KEY => self.default_currency.clone(),
            _ => None,
        }
    }
}

/// Per-run inputs to the rate fetcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    pub default_iso4217: Option<String>,
    pub app_id: Option<String>,
    pub secure_connection: Option<bool>,
    pub commercial_enabled: bool,
}

impl ProviderSettings {
    pub fn new(default_iso4217: &str) -> Self {
        Self {
            default_iso4217: Some(default_iso4217.to_string()),
            ..Default::default()
        }
    }

    /// The default currency, upper-cased, if one is set and not blank.
    pub fn default_currency(&self) -> Option<String> {
        self.default_iso4217
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
    }

    /// Credentials for the commercial provider, when it may be used.
    pub fn commercial_credentials(&self) -> Option<(&str, bool)> {
        if !self.commercial_enabled {
            return None;
        }
        let app_id = self
            .app_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())?;
        Some((app_id, self.secure_connection?))
    }
}
