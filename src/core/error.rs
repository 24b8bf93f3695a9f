//! Errors raised while fetching and re-basing exchange rates.

use thiserror::Error;

/// Failures of a single rate fetch.
///
/// Everything here is a whole-run failure: the caller decides whether to
/// retry or abort. Per-line feed problems never surface as an error, they are
/// skipped by the parser.
#[derive(Error, Debug)]
pub enum RateError {
    /// The request could not be sent or the connection dropped.
    #[error("Request error: {message} for provider: {provider}")]
    Request { provider: String, message: String },

    /// The provider did not answer within the configured timeout.
    #[error("Request timed out for provider: {provider}")]
    Timeout { provider: String },

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP error: {status} for provider: {provider}")]
    Status {
        provider: String,
        status: reqwest::StatusCode,
    },

    /// The provider answered, but reported an error of its own.
    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    /// The response document could not be understood at all.
    #[error("Malformed response from {provider}: {message}")]
    Malformed { provider: String, message: String },

    /// The requested base currency has no usable rate in the provider's set.
    #[error("No usable {currency} rate from {provider} to re-base against")]
    RebaseUndefined { provider: String, currency: String },
}

impl RateError {
    /// Classifies a transport error from `reqwest`.
    ///
    /// The request URL is stripped from the message since it can carry
    /// credentials in its query string.
    pub fn from_reqwest(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RateError::Timeout {
                provider: provider.to_string(),
            }
        } else if let Some(status) = err.status() {
            RateError::Status {
                provider: provider.to_string(),
                status,
            }
        } else {
            RateError::Request {
                provider: provider.to_string(),
                message: err.without_url().to_string(),
            }
        }
    }

    /// True for every variant that means the source could not be reached or read.
    pub fn is_fetch_failure(&self) -> bool {
        !matches!(self, RateError::RebaseUndefined { .. })
    }
}
