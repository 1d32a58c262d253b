use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;

use crate::analytics::statistics::Statistics;
use crate::providers::ProviderKind;
use crate::types::metric::Metric;

/// The question a multi-location analysis answers: which locations in a
/// region had the most extreme value of a metric on a date.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsQuery {
    pub metric: Metric,
    /// Region token as the caller wrote it, resolved against the region table.
    pub region_token: String,
    pub date: NaiveDate,
    /// Truncates the ranked list; statistics still cover the full set.
    pub result_limit: Option<usize>,
}

/// One ranked row of an analysis: a location, its metric value and its
/// 1-based position in the ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedLocationResult {
    pub name: String,
    pub country: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: Option<u64>,
    pub value: f64,
    pub metric: Metric,
    pub date: NaiveDate,
    pub rank: usize,
    pub provider: Option<ProviderKind>,
}

/// Complete outcome of one analysis run.
///
/// The engine always hands one of these back, even when everything failed;
/// in that case `results` is empty and `failure_reason` says why.
#[derive(Debug, Clone)]
pub struct AnalyticsResult {
    pub query: AnalyticsQuery,
    pub results: Vec<RankedLocationResult>,
    /// Aggregates over every surviving value, not just the truncated list.
    pub statistics: Statistics,
    pub execution_time: Duration,
    /// How many candidate locations the region resolved to.
    pub total_candidates: usize,
    /// How many of them produced usable observations.
    pub successful: usize,
    /// Successful fetches per provider for this run.
    pub provider_usage: BTreeMap<ProviderKind, u64>,
    pub failure_reason: Option<String>,
}

impl AnalyticsResult {
    /// An empty-but-valid result for a run that produced no data.
    pub fn empty(
        query: AnalyticsQuery,
        execution_time: Duration,
        total_candidates: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            query,
            results: Vec::new(),
            statistics: Statistics::default(),
            execution_time,
            total_candidates,
            successful: 0,
            provider_usage: BTreeMap::new(),
            failure_reason: Some(reason.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
