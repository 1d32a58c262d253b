use chrono::NaiveDate;

/// One day's weather observations for one location.
///
/// Absent measurements stay `None` so that a missing value can always be
/// distinguished from a measured zero. Providers map their own wire formats
/// into this shape; nothing downstream ever defaults a field.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub date: NaiveDate,
    /// Daily maximum air temperature (°C).
    pub temp_max: Option<f64>,
    /// Daily minimum air temperature (°C).
    pub temp_min: Option<f64>,
    /// Daily mean air temperature (°C).
    pub temp_mean: Option<f64>,
    /// Total precipitation (mm).
    pub precipitation: Option<f64>,
    /// Maximum sustained wind speed (km/h).
    pub wind_speed_max: Option<f64>,
    /// Maximum wind gust (km/h).
    pub wind_gust_max: Option<f64>,
}

impl ObservationRecord {
    /// Creates a record for `date` with every measurement absent.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            temp_max: None,
            temp_min: None,
            temp_mean: None,
            precipitation: None,
            wind_speed_max: None,
            wind_gust_max: None,
        }
    }

    /// Daily temperature swing (max − min), available only when both
    /// extremes were measured.
    pub fn temp_range(&self) -> Option<f64> {
        match (self.temp_max, self.temp_min) {
            (Some(max), Some(min)) => Some(max - min),
            _ => None,
        }
    }

    /// Fills in the daily mean from the extremes when the provider omitted
    /// it. Leaves the mean absent if either extreme is missing.
    pub(crate) fn derive_temp_mean(&mut self) {
        if self.temp_mean.is_none() {
            if let (Some(max), Some(min)) = (self.temp_max, self.temp_min) {
                self.temp_mean = Some((max + min) / 2.0);
            }
        }
    }
}
