mod analytics;
mod error;
mod fetch;
mod locations;
mod providers;
mod types;

pub use error::MeteorankerError;

pub use fetch::client::{FetchClient, ProviderPreference, RetryPolicy};
pub use fetch::error::FetchError;
pub use fetch::usage::UsageSnapshot;

pub use providers::batching::BatchPolicy;
pub use providers::error::ProviderError;
pub use providers::ProviderKind;

pub use locations::directory::LocationDirectory;
pub use locations::error::RegionResolutionError;
pub use locations::region::{RegionScope, RegionTable, ScopeBound};

pub use analytics::engine::{AnalyticsEngine, ScopePolicy};
pub use analytics::pool::WorkerPool;
pub use analytics::statistics::Statistics;

pub use types::fetch::FetchOutcome;
pub use types::location::{LatLon, Location};
pub use types::metric::{Direction, Metric, UnknownMetricError};
pub use types::observation::ObservationRecord;
pub use types::result::{AnalyticsQuery, AnalyticsResult, RankedLocationResult};
