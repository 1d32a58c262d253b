use chrono::{Duration as DateDelta, NaiveDate};
use log::{info, warn};
use reqwest::Client;

use crate::providers::error::ProviderError;
use crate::providers::Provider;
use crate::types::observation::ObservationRecord;

/// Tunables for splitting an oversized date range into provider-sized
/// sub-requests and judging the combined result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchPolicy {
    /// Fraction of the requested days that must come back for a batched
    /// fetch to count as a success. Zero records always fails.
    pub coverage_threshold: f64,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            coverage_threshold: 0.8,
        }
    }
}

/// Splits an inclusive date range into contiguous chunks of at most
/// `max_days` days each. Chunks never overlap and never leave gaps.
pub(crate) fn split_range(
    start: NaiveDate,
    end: NaiveDate,
    max_days: i64,
) -> Vec<(NaiveDate, NaiveDate)> {
    let mut chunks = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        let chunk_end = (cursor + DateDelta::days(max_days - 1)).min(end);
        chunks.push((cursor, chunk_end));
        cursor = chunk_end + DateDelta::days(1);
    }
    chunks
}

/// Fetches a date range from one provider, splitting it into sub-requests
/// when it exceeds the provider's maximum span. Sub-requests run
/// sequentially with the provider's pacing interval between them; a failed
/// sub-request is skipped rather than aborting the whole fetch, and the
/// combined result is judged against the coverage threshold afterwards.
pub(crate) async fn fetch_batched(
    provider: &Provider,
    http: &Client,
    latitude: f64,
    longitude: f64,
    start: NaiveDate,
    end: NaiveDate,
    policy: BatchPolicy,
) -> Result<Vec<ObservationRecord>, ProviderError> {
    let span_days = (end - start).num_days() + 1;
    if span_days <= provider.max_span_days() {
        return provider.fetch_range(http, latitude, longitude, start, end).await;
    }

    let chunks = split_range(start, end, provider.max_span_days());
    info!(
        "splitting {span_days}-day request into {} sub-requests for {}",
        chunks.len(),
        provider.kind()
    );

    let mut records = Vec::with_capacity(span_days as usize);
    let mut failed = 0usize;
    let total = chunks.len();
    for (i, (chunk_start, chunk_end)) in chunks.into_iter().enumerate() {
        match provider
            .fetch_range(http, latitude, longitude, chunk_start, chunk_end)
            .await
        {
            Ok(chunk) => records.extend(chunk),
            Err(e) => {
                failed += 1;
                warn!(
                    "sub-request {}/{total} ({chunk_start} to {chunk_end}) failed: {e}",
                    i + 1
                );
            }
        }
        if i + 1 < total {
            tokio::time::sleep(provider.min_request_interval()).await;
        }
    }

    let expected = span_days as usize;
    let minimum = expected as f64 * policy.coverage_threshold;
    if records.is_empty() || (records.len() as f64) < minimum {
        return Err(ProviderError::InsufficientCoverage {
            collected: records.len(),
            expected,
            threshold: policy.coverage_threshold,
        });
    }
    if failed > 0 {
        info!(
            "accepting partial coverage: {} of {expected} days after {failed} failed sub-requests",
            records.len()
        );
    }

    // Sub-request boundaries arrive in order, but a provider may not
    // guarantee order within a chunk.
    records.sort_by_key(|record| record.date);
    Ok(records)
}
