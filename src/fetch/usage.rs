use std::sync::atomic::{AtomicU64, Ordering};

use crate::providers::ProviderKind;

/// Owned usage counters for one fetch client. Shared by reference with
/// whoever wants to observe the client; never global.
#[derive(Debug, Default)]
pub(crate) struct UsageTracker {
    open_meteo: AtomicU64,
    meteostat: AtomicU64,
    fallbacks: AtomicU64,
}

impl UsageTracker {
    pub(crate) fn record_success(&self, kind: ProviderKind) {
        match kind {
            ProviderKind::OpenMeteo => self.open_meteo.fetch_add(1, Ordering::Relaxed),
            ProviderKind::Meteostat => self.meteostat.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub(crate) fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            open_meteo: self.open_meteo.load(Ordering::Relaxed),
            meteostat: self.meteostat.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of a client's usage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageSnapshot {
    /// Successful fetches served by Open-Meteo.
    pub open_meteo: u64,
    /// Successful fetches served by Meteostat.
    pub meteostat: u64,
    /// Fetches that succeeded on a provider other than the one initially
    /// selected.
    pub fallbacks: u64,
}

impl UsageSnapshot {
    pub fn successes(&self, kind: ProviderKind) -> u64 {
        match kind {
            ProviderKind::OpenMeteo => self.open_meteo,
            ProviderKind::Meteostat => self.meteostat,
        }
    }

    pub fn total(&self) -> u64 {
        self.open_meteo + self.meteostat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_per_provider() {
        let tracker = UsageTracker::default();
        tracker.record_success(ProviderKind::OpenMeteo);
        tracker.record_success(ProviderKind::OpenMeteo);
        tracker.record_success(ProviderKind::Meteostat);
        tracker.record_fallback();

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.successes(ProviderKind::OpenMeteo), 2);
        assert_eq!(snapshot.successes(ProviderKind::Meteostat), 1);
        assert_eq!(snapshot.fallbacks, 1);
        assert_eq!(snapshot.total(), 3);
    }
}
