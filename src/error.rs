use thiserror::Error;

use crate::fetch::error::FetchError;
use crate::locations::error::RegionResolutionError;
use crate::providers::error::ProviderError;
use crate::types::metric::UnknownMetricError;

/// Top-level error type aggregating every failure this crate can surface.
#[derive(Debug, Error)]
pub enum MeteorankerError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Region(#[from] RegionResolutionError),

    #[error(transparent)]
    Metric(#[from] UnknownMetricError),
}
