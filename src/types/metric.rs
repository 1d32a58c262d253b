use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::types::observation::ObservationRecord;

/// Which way a metric ranks: largest value first or smallest value first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// The daily observation field a multi-location query ranks by.
///
/// The identifiers accepted by [`FromStr`] match the field names providers
/// use on the wire, so a query string like `"temperature_2m_max"` maps
/// straight onto the record field it ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    TemperatureMax,
    TemperatureMin,
    TemperatureMean,
    PrecipitationSum,
    WindSpeedMax,
    WindGustMax,
    /// Daily swing between maximum and minimum temperature. Derived, not
    /// fetched; it exists only when both extremes do.
    TemperatureRange,
}

/// A query named a metric this crate does not rank by.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown metric '{0}'")]
pub struct UnknownMetricError(pub String);

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::TemperatureMax,
        Metric::TemperatureMin,
        Metric::TemperatureMean,
        Metric::PrecipitationSum,
        Metric::WindSpeedMax,
        Metric::WindGustMax,
        Metric::TemperatureRange,
    ];

    /// Reads this metric's value out of a record, `None` when the underlying
    /// measurement is absent.
    pub fn extract(&self, record: &ObservationRecord) -> Option<f64> {
        match self {
            Metric::TemperatureMax => record.temp_max,
            Metric::TemperatureMin => record.temp_min,
            Metric::TemperatureMean => record.temp_mean,
            Metric::PrecipitationSum => record.precipitation,
            Metric::WindSpeedMax => record.wind_speed_max,
            Metric::WindGustMax => record.wind_gust_max,
            Metric::TemperatureRange => record.temp_range(),
        }
    }

    /// Minimum temperature ranks coldest-first; everything else largest-first.
    pub fn direction(&self) -> Direction {
        match self {
            Metric::TemperatureMin => Direction::Ascending,
            _ => Direction::Descending,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::TemperatureMax
            | Metric::TemperatureMin
            | Metric::TemperatureMean
            | Metric::TemperatureRange => "°C",
            Metric::PrecipitationSum => "mm",
            Metric::WindSpeedMax | Metric::WindGustMax => "km/h",
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Metric::TemperatureMax => "temperature_2m_max",
            Metric::TemperatureMin => "temperature_2m_min",
            Metric::TemperatureMean => "temperature_2m_mean",
            Metric::PrecipitationSum => "precipitation_sum",
            Metric::WindSpeedMax => "windspeed_10m_max",
            Metric::WindGustMax => "windgusts_10m_max",
            Metric::TemperatureRange => "temperature_range",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Metric {
    type Err = UnknownMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        Metric::ALL
            .into_iter()
            .find(|metric| metric.identifier() == token)
            .ok_or_else(|| UnknownMetricError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_every_identifier() {
        for metric in Metric::ALL {
            assert_eq!(metric.identifier().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(
            "  Temperature_2M_Max ".parse::<Metric>().unwrap(),
            Metric::TemperatureMax
        );
    }

    #[test]
    fn unknown_metric_is_rejected() {
        let err = "humidity".parse::<Metric>().unwrap_err();
        assert_eq!(err, UnknownMetricError("humidity".to_string()));
    }

    #[test]
    fn only_minimum_temperature_ranks_ascending() {
        for metric in Metric::ALL {
            let expected = if metric == Metric::TemperatureMin {
                Direction::Ascending
            } else {
                Direction::Descending
            };
            assert_eq!(metric.direction(), expected);
        }
    }

    #[test]
    fn extract_returns_none_for_absent_measurements() {
        let record = ObservationRecord::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        for metric in Metric::ALL {
            assert_eq!(metric.extract(&record), None);
        }
    }

    #[test]
    fn temperature_range_is_derived_from_extremes() {
        let mut record = ObservationRecord::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        record.temp_max = Some(12.0);
        record.temp_min = Some(-3.0);
        assert_eq!(Metric::TemperatureRange.extract(&record), Some(15.0));
    }
}
