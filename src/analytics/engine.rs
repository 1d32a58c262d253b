use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bon::bon;
use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::analytics::pool::{WorkerPool, DEFAULT_MAX_WORKERS};
use crate::analytics::ranking::rank_locations;
use crate::analytics::statistics::Statistics;
use crate::fetch::client::FetchClient;
use crate::locations::directory::LocationDirectory;
use crate::locations::region::{RegionTable, ScopeBound};
use crate::providers::ProviderKind;
use crate::types::fetch::FetchOutcome;
use crate::types::location::Location;
use crate::types::metric::Metric;
use crate::types::result::{AnalyticsQuery, AnalyticsResult};

/// Pacing and candidate limits for one scope class. Wider scopes use
/// smaller dispatch groups and longer pauses to stay inside provider
/// rate limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopePolicy {
    /// Upper bound on candidate locations per run.
    pub max_candidates: usize,
    /// Candidates with a smaller (or unknown) population are skipped.
    /// Zero disables the floor.
    pub min_population: u64,
    /// Locations dispatched concurrently before pausing.
    pub group_size: usize,
    /// Pause between dispatch groups.
    pub group_delay: Duration,
}

impl ScopePolicy {
    pub fn for_bound(bound: &ScopeBound) -> Self {
        match bound {
            ScopeBound::Country { .. } => Self {
                max_candidates: 165,
                min_population: 0,
                group_size: 8,
                group_delay: Duration::from_millis(200),
            },
            ScopeBound::Continent { .. } => Self {
                max_candidates: 150,
                min_population: 50_000,
                group_size: 4,
                group_delay: Duration::from_millis(400),
            },
            ScopeBound::Global => Self {
                max_candidates: 160,
                min_population: 100_000,
                group_size: 8,
                group_delay: Duration::from_millis(500),
            },
        }
    }
}

/// Orchestrates a multi-location analysis: region resolution, paced
/// parallel fetching, ranking and aggregate statistics.
#[derive(Debug)]
pub struct AnalyticsEngine {
    fetch_client: Arc<FetchClient>,
    directory: LocationDirectory,
    regions: RegionTable,
    pool: WorkerPool,
}

#[bon]
impl AnalyticsEngine {
    #[builder]
    pub fn new(
        fetch_client: Arc<FetchClient>,
        directory: LocationDirectory,
        #[builder(default)] regions: RegionTable,
        max_workers: Option<usize>,
    ) -> Self {
        Self {
            fetch_client,
            directory,
            regions,
            pool: WorkerPool::new(max_workers.unwrap_or(DEFAULT_MAX_WORKERS)),
        }
    }

    /// Answers one query: which locations in `region` had the most extreme
    /// `metric` on `date`.
    ///
    /// Always returns a result. When the run cannot produce data (unknown
    /// region, no candidates, every fetch failed) the result is empty and
    /// carries a `failure_reason` instead of an error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use chrono::NaiveDate;
    /// use meteoranker::{AnalyticsEngine, FetchClient, LocationDirectory, Metric};
    ///
    /// # async fn run(directory: LocationDirectory) -> Result<(), meteoranker::FetchError> {
    /// let client = Arc::new(FetchClient::builder().build()?);
    /// let engine = AnalyticsEngine::builder()
    ///     .fetch_client(client)
    ///     .directory(directory)
    ///     .build();
    /// let result = engine
    ///     .analyze()
    ///     .metric(Metric::TemperatureMax)
    ///     .region("HU")
    ///     .date(NaiveDate::from_ymd_opt(2024, 7, 20).unwrap())
    ///     .result_limit(10)
    ///     .call()
    ///     .await;
    /// for row in &result.results {
    ///     println!("{}. {} {:.1}{}", row.rank, row.name, row.value, row.metric.unit());
    /// }
    /// # Ok(()) }
    /// ```
    #[builder]
    pub async fn analyze(
        &self,
        metric: Metric,
        region: &str,
        date: NaiveDate,
        /// Truncates the ranked list. Statistics still cover every
        /// surviving location.
        result_limit: Option<usize>,
    ) -> AnalyticsResult {
        let started = Instant::now();
        let query = AnalyticsQuery {
            metric,
            region_token: region.to_string(),
            date,
            result_limit,
        };

        let scope = match self.regions.resolve(region) {
            Ok(scope) => scope,
            Err(e) => {
                warn!("analysis aborted before fetching: {e}");
                return AnalyticsResult::empty(query, started.elapsed(), 0, e.to_string());
            }
        };

        let policy = ScopePolicy::for_bound(&scope.bound);
        let candidates =
            self.directory
                .candidates(&scope, policy.min_population, policy.max_candidates);
        if candidates.is_empty() {
            warn!("no candidate locations for region '{}'", scope.display_name);
            return AnalyticsResult::empty(
                query,
                started.elapsed(),
                0,
                format!("no candidate locations for region '{}'", scope.display_name),
            );
        }

        let total_candidates = candidates.len();
        info!(
            "analyzing {metric} over {total_candidates} locations in '{}' on {date}",
            scope.display_name
        );

        let outcomes = self.fetch_all(candidates, date, policy).await;
        let successes: Vec<FetchOutcome> =
            outcomes.into_iter().filter(FetchOutcome::is_success).collect();
        let successful = successes.len();

        if successful == 0 {
            return AnalyticsResult::empty(
                query,
                started.elapsed(),
                total_candidates,
                "every candidate location failed to fetch",
            );
        }
        debug!("{successful} of {total_candidates} locations fetched successfully");

        let mut provider_usage: BTreeMap<ProviderKind, u64> = BTreeMap::new();
        for outcome in &successes {
            if let Some(kind) = outcome.provider {
                *provider_usage.entry(kind).or_insert(0) += 1;
            }
        }

        let ranked = rank_locations(&successes, metric, date);
        let values: Vec<f64> = ranked.iter().map(|row| row.value).collect();
        // Statistics come from the full surviving set, before truncation.
        let statistics = Statistics::compute(&values);

        let mut results = ranked;
        if let Some(limit) = result_limit {
            results.truncate(limit);
        }

        AnalyticsResult {
            query,
            results,
            statistics,
            execution_time: started.elapsed(),
            total_candidates,
            successful,
            provider_usage,
            failure_reason: None,
        }
    }
}

impl AnalyticsEngine {
    /// Fetches every candidate, `group_size` at a time through the worker
    /// pool, pausing `group_delay` between groups.
    async fn fetch_all(
        &self,
        candidates: Vec<Location>,
        date: NaiveDate,
        policy: ScopePolicy,
    ) -> Vec<FetchOutcome> {
        let groups: Vec<Vec<Location>> = candidates
            .chunks(policy.group_size.max(1))
            .map(<[Location]>::to_vec)
            .collect();
        let group_count = groups.len();

        let mut outcomes = Vec::with_capacity(candidates.len());
        for (i, group) in groups.into_iter().enumerate() {
            let tasks: Vec<_> = group
                .into_iter()
                .map(|location| {
                    let client = Arc::clone(&self.fetch_client);
                    fetch_one(client, location, date)
                })
                .collect();
            outcomes.extend(self.pool.run_group(tasks).await);
            if i + 1 < group_count {
                tokio::time::sleep(policy.group_delay).await;
            }
        }
        outcomes
    }
}

/// Fetches a single day for one location. Failures become part of the
/// outcome instead of aborting the run.
async fn fetch_one(client: Arc<FetchClient>, location: Location, date: NaiveDate) -> FetchOutcome {
    match client
        .fetch()
        .coordinate(location.coords())
        .start(date)
        .end(date)
        .call()
        .await
    {
        Ok((records, provider)) => FetchOutcome::success(location, records, provider),
        Err(e) => {
            debug!("dropping {}: {e}", location.name);
            FetchOutcome::failure(location, e.to_string())
        }
    }
}
