use chrono::NaiveDate;
use thiserror::Error;

use crate::providers::ProviderKind;

/// Errors a single provider can produce while serving a range request.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider failed validation (missing or malformed credentials).
    #[error("provider {0} is not available")]
    Unavailable(ProviderKind),

    #[error("network request to {0} failed")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request to {url} failed with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source] source: reqwest::Error,
    },

    #[error("rate limit exceeded for {0}")]
    RateLimited(ProviderKind),

    #[error("authentication rejected for {0}")]
    Unauthorized(ProviderKind),

    #[error("malformed response from {provider}: {message}")]
    MalformedResponse {
        provider: ProviderKind,
        message: String,
    },

    #[error("{provider} returned no observations for {start} to {end}")]
    NoData {
        provider: ProviderKind,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error(
        "batched fetch collected {collected} of {expected} expected days, \
         below the acceptance threshold of {threshold_pct:.0}%",
        threshold_pct = threshold * 100.0
    )]
    InsufficientCoverage {
        collected: usize,
        expected: usize,
        threshold: f64,
    },
}

impl ProviderError {
    /// Validation failures are permanent for the life of a request; the
    /// dispatcher moves on instead of burning retries on them.
    pub(crate) fn is_validation(&self) -> bool {
        matches!(
            self,
            ProviderError::Unavailable(_) | ProviderError::Unauthorized(_)
        )
    }
}
