use std::sync::Mutex;
use std::time::Duration;

use bon::{bon, Builder};
use chrono::NaiveDate;
use log::{debug, info, warn};
use reqwest::Client;

use crate::fetch::error::FetchError;
use crate::fetch::usage::{UsageSnapshot, UsageTracker};
use crate::providers::batching::{fetch_batched, BatchPolicy};
use crate::providers::error::ProviderError;
use crate::providers::{MeteostatProvider, OpenMeteoProvider, Provider, ProviderKind};
use crate::types::location::LatLon;
use crate::types::observation::ObservationRecord;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const METEOSTAT_KEY_ENV: &str = "METEOSTAT_API_KEY";
const USER_AGENT: &str = concat!("meteoranker/", env!("CARGO_PKG_VERSION"));

/// How the client picks the provider to try first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderPreference {
    /// First available provider in priority order, free providers first.
    #[default]
    Auto,
    /// Prefer this provider whenever it is available.
    Fixed(ProviderKind),
}

/// Retry behavior for one provider within the fallback chain.
///
/// Delays grow linearly: the pause after attempt `n` is `base_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct RetryPolicy {
    #[builder(default = 3)]
    pub max_attempts: u32,
    #[builder(default = Duration::from_secs(1))]
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Multi-provider fetch client with transparent fallback.
///
/// Holds every configured provider in priority order plus the retry,
/// batching and usage machinery shared by all fetches. Cheap to share
/// behind an `Arc`; all mutability is internal.
#[derive(Debug)]
pub struct FetchClient {
    http: Client,
    providers: Vec<Provider>,
    preference: ProviderPreference,
    retry: RetryPolicy,
    batch: BatchPolicy,
    usage: UsageTracker,
    current: Mutex<Option<ProviderKind>>,
}

#[bon]
impl FetchClient {
    /// Builds a client.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use meteoranker::FetchClient;
    ///
    /// # fn main() -> Result<(), meteoranker::FetchError> {
    /// let client = FetchClient::builder()
    ///     .meteostat_api_key("0123456789abcdef0123456789abcdef".to_string())
    ///     .build()?;
    /// # Ok(()) }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the underlying HTTP client
    /// cannot be constructed.
    #[builder]
    pub fn new(
        /// RapidAPI key for Meteostat. Falls back to the `METEOSTAT_API_KEY`
        /// environment variable when unset.
        meteostat_api_key: Option<String>,
        #[builder(default)] preference: ProviderPreference,
        #[builder(default)] retry_policy: RetryPolicy,
        #[builder(default)] batch_policy: BatchPolicy,
        /// Override for the Open-Meteo archive endpoint, e.g. a self-hosted
        /// instance.
        open_meteo_endpoint: Option<String>,
        /// Override for the Meteostat point-data endpoint.
        meteostat_endpoint: Option<String>,
        request_timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::ClientBuild)?;

        let api_key = meteostat_api_key.or_else(|| std::env::var(METEOSTAT_KEY_ENV).ok());

        // Priority order: free providers first.
        let providers = vec![
            Provider::OpenMeteo(OpenMeteoProvider::new(open_meteo_endpoint)),
            Provider::Meteostat(MeteostatProvider::new(meteostat_endpoint, api_key)),
        ];

        Ok(Self {
            http,
            providers,
            preference,
            retry: retry_policy,
            batch: batch_policy,
            usage: UsageTracker::default(),
            current: Mutex::new(None),
        })
    }

    /// Fetches daily observations for one coordinate over an inclusive date
    /// range, walking the fallback chain until a provider delivers.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use chrono::NaiveDate;
    /// use meteoranker::{FetchClient, LatLon};
    ///
    /// # async fn run() -> Result<(), meteoranker::FetchError> {
    /// let client = FetchClient::builder().build()?;
    /// let (records, provider) = client
    ///     .fetch()
    ///     .coordinate(LatLon(47.4979, 19.0402))
    ///     .start(NaiveDate::from_ymd_opt(2023, 7, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2023, 7, 31).unwrap())
    ///     .call()
    ///     .await?;
    /// println!("{} days from {provider}", records.len());
    /// # Ok(()) }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidCoordinates`] or
    /// [`FetchError::InvalidDateRange`] for bad input,
    /// [`FetchError::NoProviderAvailable`] when nothing passes validation,
    /// and [`FetchError::ChainExhausted`] when every available provider
    /// failed.
    #[builder]
    pub async fn fetch(
        &self,
        coordinate: LatLon,
        start: NaiveDate,
        end: NaiveDate,
        /// Try exactly this provider first, overriding the configured
        /// preference. If it is unavailable the client falls back to
        /// automatic selection.
        provider: Option<ProviderKind>,
    ) -> Result<(Vec<ObservationRecord>, ProviderKind), FetchError> {
        let LatLon(latitude, longitude) = coordinate;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(FetchError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        if start > end {
            return Err(FetchError::InvalidDateRange { start, end });
        }

        let initial = self.resolve_initial(provider)?;
        let chain = self.fallback_chain(initial);
        debug!(
            "dispatching fetch for ({latitude}, {longitude}) {start} to {end}, chain: {chain:?}"
        );

        let mut attempted = Vec::with_capacity(chain.len());
        let mut last_error = None;
        for kind in chain {
            let provider = self.provider(kind);
            if !provider.validate() {
                debug!("skipping {kind}: failed validation");
                continue;
            }
            attempted.push(kind);
            match self
                .fetch_with_retry(provider, latitude, longitude, start, end)
                .await
            {
                Ok(records) => {
                    self.usage.record_success(kind);
                    if let Ok(mut current) = self.current.lock() {
                        *current = Some(kind);
                    }
                    if kind != initial {
                        warn!("fell back from {initial} to {kind}");
                        self.usage.record_fallback();
                    }
                    info!(
                        "fetched {} day(s) for ({latitude}, {longitude}) from {kind}",
                        records.len()
                    );
                    return Ok((records, kind));
                }
                Err(e) => {
                    warn!("provider {kind} gave up: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(FetchError::ChainExhausted {
            attempted,
            last_error: last_error.map(Box::new),
        })
    }

    /// Providers that currently pass validation, in priority order.
    pub fn available_providers(&self) -> Vec<ProviderKind> {
        self.providers
            .iter()
            .filter(|p| p.validate())
            .map(Provider::kind)
            .collect()
    }

    /// The provider that served the most recent successful fetch.
    pub fn current_provider(&self) -> Option<ProviderKind> {
        self.current.lock().ok().and_then(|current| *current)
    }

    pub fn usage_snapshot(&self) -> UsageSnapshot {
        self.usage.snapshot()
    }
}

impl FetchClient {
    fn provider(&self, kind: ProviderKind) -> &Provider {
        // Both kinds are always constructed, so the lookup cannot miss.
        self.providers
            .iter()
            .find(|p| p.kind() == kind)
            .unwrap_or(&self.providers[0])
    }

    /// Picks the provider to try first: explicit override, then configured
    /// preference, then the first available in priority order.
    fn resolve_initial(
        &self,
        override_kind: Option<ProviderKind>,
    ) -> Result<ProviderKind, FetchError> {
        if let Some(kind) = override_kind {
            if self.provider(kind).validate() {
                return Ok(kind);
            }
            warn!("requested provider {kind} is unavailable, selecting automatically");
        }
        if let ProviderPreference::Fixed(kind) = self.preference {
            if self.provider(kind).validate() {
                return Ok(kind);
            }
            warn!("preferred provider {kind} is unavailable, selecting automatically");
        }
        self.providers
            .iter()
            .find(|p| p.validate())
            .map(Provider::kind)
            .ok_or(FetchError::NoProviderAvailable)
    }

    /// The initial provider followed by every other available provider in
    /// priority order, without duplicates.
    fn fallback_chain(&self, initial: ProviderKind) -> Vec<ProviderKind> {
        let mut chain = vec![initial];
        for provider in &self.providers {
            let kind = provider.kind();
            if provider.validate() && !chain.contains(&kind) {
                chain.push(kind);
            }
        }
        chain
    }

    async fn fetch_with_retry(
        &self,
        provider: &Provider,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ObservationRecord>, ProviderError> {
        let mut last_error = None;
        for attempt in 1..=self.retry.max_attempts {
            match fetch_batched(provider, &self.http, latitude, longitude, start, end, self.batch)
                .await
            {
                Ok(records) => return Ok(records),
                Err(e) if e.is_validation() => return Err(e),
                Err(e) => {
                    warn!(
                        "attempt {attempt}/{} against {} failed: {e}",
                        self.retry.max_attempts,
                        provider.kind()
                    );
                    last_error = Some(e);
                    if attempt < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.base_delay * attempt).await;
                    }
                }
            }
        }
        Err(last_error.unwrap_or(ProviderError::Unavailable(provider.kind())))
    }
}
