use crate::core::error::RateError;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

/// Builds the HTTP client shared by all providers.
///
/// `timeout` bounds every request end to end; providers never retry.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent("xru/0.1")
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Sends a GET to `url` and returns the body of a successful response.
pub async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    provider: &str,
) -> Result<String, RateError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| RateError::from_reqwest(provider, e))?;

    debug!(status = %response.status(), "Received {} response", provider);

    if !response.status().is_success() {
        return Err(RateError::Status {
            provider: provider.to_string(),
            status: response.status(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| RateError::from_reqwest(provider, e))
}
