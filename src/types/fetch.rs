use crate::providers::ProviderKind;
use crate::types::location::Location;
use crate::types::observation::ObservationRecord;

/// Outcome of fetching one location's observations during a multi-location
/// run. A failed location carries its error text instead of aborting the
/// whole run.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub location: Location,
    pub records: Vec<ObservationRecord>,
    /// Which provider ultimately served the data, when any did.
    pub provider: Option<ProviderKind>,
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn success(
        location: Location,
        records: Vec<ObservationRecord>,
        provider: ProviderKind,
    ) -> Self {
        Self {
            location,
            records,
            provider: Some(provider),
            error: None,
        }
    }

    pub fn failure(location: Location, error: impl Into<String>) -> Self {
        Self {
            location,
            records: Vec::new(),
            provider: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
