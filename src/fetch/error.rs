use chrono::NaiveDate;
use thiserror::Error;

use crate::providers::error::ProviderError;
use crate::providers::ProviderKind;

/// Errors a fetch can return to its caller. Provider-level failures are
/// absorbed by the fallback chain; only input problems and chain exhaustion
/// surface here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(
        "invalid coordinates ({latitude}, {longitude}): latitude must be in [-90, 90] \
         and longitude in [-180, 180]"
    )]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("no weather provider is currently available")]
    NoProviderAvailable,

    #[error("failed to build the HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Every provider in the fallback chain was tried and none delivered.
    #[error(
        "every provider in the fallback chain failed ({count} attempted)",
        count = attempted.len()
    )]
    ChainExhausted {
        /// Providers that were actually attempted, in dispatch order.
        attempted: Vec<ProviderKind>,
        #[source]
        last_error: Option<Box<ProviderError>>,
    },
}
