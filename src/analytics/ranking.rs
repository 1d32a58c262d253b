use std::cmp::Ordering;

use chrono::NaiveDate;
use log::debug;
use ordered_float::OrderedFloat;

use crate::types::fetch::FetchOutcome;
use crate::types::metric::{Direction, Metric};
use crate::types::result::RankedLocationResult;

/// Total order over possibly-absent metric values. Present values compare
/// by the metric's direction; absent values sort after every present one,
/// so they can never outrank real data.
pub(crate) fn metric_ordering(a: Option<f64>, b: Option<f64>, direction: Direction) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ordering = OrderedFloat(x).cmp(&OrderedFloat(y));
            match direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Extracts the metric value for `date` from each successful outcome, drops
/// locations where the value is absent, and ranks the survivors. The sort
/// is stable, so tied locations keep their fetch order.
pub(crate) fn rank_locations(
    outcomes: &[FetchOutcome],
    metric: Metric,
    date: NaiveDate,
) -> Vec<RankedLocationResult> {
    let mut survivors: Vec<(&FetchOutcome, f64)> = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        let value = outcome
            .records
            .iter()
            .find(|record| record.date == date)
            .and_then(|record| metric.extract(record));
        match value {
            Some(value) => survivors.push((outcome, value)),
            None => debug!(
                "dropping {}: no {metric} value for {date}",
                outcome.location.name
            ),
        }
    }

    survivors.sort_by(|a, b| metric_ordering(Some(a.1), Some(b.1), metric.direction()));

    survivors
        .into_iter()
        .enumerate()
        .map(|(i, (outcome, value))| RankedLocationResult {
            name: outcome.location.name.clone(),
            country: outcome.location.country.clone(),
            country_code: outcome.location.country_code.clone(),
            latitude: outcome.location.latitude,
            longitude: outcome.location.longitude,
            population: outcome.location.population,
            value,
            metric,
            date,
            rank: i + 1,
            provider: outcome.provider,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderKind;
    use crate::types::location::Location;
    use crate::types::observation::ObservationRecord;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 20).unwrap()
    }

    fn outcome(name: &str, temp_max: Option<f64>) -> FetchOutcome {
        let mut record = ObservationRecord::new(date());
        record.temp_max = temp_max;
        FetchOutcome::success(
            Location::new(name, "Hungary", "HU", 47.0, 19.0),
            vec![record],
            ProviderKind::OpenMeteo,
        )
    }

    #[test]
    fn descending_metric_ranks_largest_first() {
        let outcomes = vec![
            outcome("a", Some(28.0)),
            outcome("b", Some(33.0)),
            outcome("c", Some(31.0)),
        ];
        let ranked = rank_locations(&outcomes, Metric::TemperatureMax, date());
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn ascending_metric_ranks_smallest_first() {
        let mut cold = ObservationRecord::new(date());
        cold.temp_min = Some(-12.0);
        let mut mild = ObservationRecord::new(date());
        mild.temp_min = Some(2.0);

        let outcomes = vec![
            FetchOutcome::success(
                Location::new("mild", "Hungary", "HU", 47.0, 19.0),
                vec![mild],
                ProviderKind::OpenMeteo,
            ),
            FetchOutcome::success(
                Location::new("cold", "Hungary", "HU", 48.0, 20.0),
                vec![cold],
                ProviderKind::OpenMeteo,
            ),
        ];
        let ranked = rank_locations(&outcomes, Metric::TemperatureMin, date());
        assert_eq!(ranked[0].name, "cold");
    }

    #[test]
    fn absent_values_are_dropped_not_ranked() {
        let outcomes = vec![
            outcome("present", Some(25.0)),
            outcome("absent", None),
        ];
        let ranked = rank_locations(&outcomes, Metric::TemperatureMax, date());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "present");
    }

    #[test]
    fn ties_preserve_fetch_order() {
        let outcomes = vec![
            outcome("first", Some(30.0)),
            outcome("second", Some(30.0)),
            outcome("third", Some(30.0)),
        ];
        let ranked = rank_locations(&outcomes, Metric::TemperatureMax, date());
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn absent_sorts_after_present_in_both_directions() {
        for direction in [Direction::Ascending, Direction::Descending] {
            assert_eq!(
                metric_ordering(Some(1.0), None, direction),
                Ordering::Less
            );
            assert_eq!(
                metric_ordering(None, Some(1.0), direction),
                Ordering::Greater
            );
        }
    }

    #[test]
    fn record_for_other_dates_is_ignored() {
        let other_day = NaiveDate::from_ymd_opt(2024, 7, 21).unwrap();
        let mut record = ObservationRecord::new(other_day);
        record.temp_max = Some(40.0);
        let outcomes = vec![FetchOutcome::success(
            Location::new("offset", "Hungary", "HU", 47.0, 19.0),
            vec![record],
            ProviderKind::OpenMeteo,
        )];
        assert!(rank_locations(&outcomes, Metric::TemperatureMax, date()).is_empty());
    }
}
