pub mod batching;
pub mod error;
mod meteostat;
mod open_meteo;

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;

use crate::providers::error::ProviderError;
pub(crate) use crate::providers::meteostat::MeteostatProvider;
pub(crate) use crate::providers::open_meteo::OpenMeteoProvider;
use crate::types::observation::ObservationRecord;

/// Identifies one of the supported weather archive providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProviderKind {
    /// Open-Meteo historical archive, unauthenticated.
    OpenMeteo,
    /// Meteostat point data via RapidAPI, key required.
    Meteostat,
}

impl ProviderKind {
    /// Dispatch priority for automatic selection. Free providers come first.
    pub const PRIORITY: [ProviderKind; 2] = [ProviderKind::OpenMeteo, ProviderKind::Meteostat];

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenMeteo => "open-meteo",
            ProviderKind::Meteostat => "meteostat",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A configured provider instance. Closed set, statically dispatched.
#[derive(Debug)]
pub(crate) enum Provider {
    OpenMeteo(OpenMeteoProvider),
    Meteostat(MeteostatProvider),
}

impl Provider {
    pub(crate) fn kind(&self) -> ProviderKind {
        match self {
            Provider::OpenMeteo(_) => ProviderKind::OpenMeteo,
            Provider::Meteostat(_) => ProviderKind::Meteostat,
        }
    }

    /// Cheap local check that the provider is usable at all. No network.
    pub(crate) fn validate(&self) -> bool {
        match self {
            Provider::OpenMeteo(p) => p.validate(),
            Provider::Meteostat(p) => p.validate(),
        }
    }

    /// Longest date span (inclusive, in days) a single request may cover.
    pub(crate) fn max_span_days(&self) -> i64 {
        match self {
            Provider::OpenMeteo(p) => p.max_span_days(),
            Provider::Meteostat(p) => p.max_span_days(),
        }
    }

    /// Pause to insert between consecutive requests to this provider.
    pub(crate) fn min_request_interval(&self) -> Duration {
        match self {
            Provider::OpenMeteo(p) => p.min_request_interval(),
            Provider::Meteostat(p) => p.min_request_interval(),
        }
    }

    /// Fetches daily observations for one coordinate over an inclusive date
    /// range no longer than [`max_span_days`](Self::max_span_days).
    pub(crate) async fn fetch_range(
        &self,
        http: &Client,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ObservationRecord>, ProviderError> {
        match self {
            Provider::OpenMeteo(p) => p.fetch_range(http, latitude, longitude, start, end).await,
            Provider::Meteostat(p) => p.fetch_range(http, latitude, longitude, start, end).await,
        }
    }
}
