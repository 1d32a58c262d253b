use std::time::Duration;

use chrono::NaiveDate;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::providers::error::ProviderError;
use crate::providers::ProviderKind;
use crate::types::observation::ObservationRecord;

const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,temperature_2m_mean,\
                            precipitation_sum,windspeed_10m_max,windgusts_10m_max";
const MAX_SPAN_DAYS: i64 = 90;
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(600);

/// Open-Meteo historical archive. Unauthenticated, columnar responses.
#[derive(Debug)]
pub(crate) struct OpenMeteoProvider {
    base_url: String,
}

/// Columnar response body: parallel arrays keyed under `daily`, one entry
/// per day, absent measurements encoded as JSON nulls.
#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<DailyColumns>,
}

#[derive(Debug, Deserialize)]
struct DailyColumns {
    time: Vec<NaiveDate>,
    #[serde(default)]
    temperature_2m_max: Option<Vec<Option<f64>>>,
    #[serde(default)]
    temperature_2m_min: Option<Vec<Option<f64>>>,
    #[serde(default)]
    temperature_2m_mean: Option<Vec<Option<f64>>>,
    #[serde(default)]
    precipitation_sum: Option<Vec<Option<f64>>>,
    #[serde(default)]
    windspeed_10m_max: Option<Vec<Option<f64>>>,
    #[serde(default)]
    windgusts_10m_max: Option<Vec<Option<f64>>>,
}

fn column_value(column: &Option<Vec<Option<f64>>>, index: usize) -> Option<f64> {
    column.as_ref().and_then(|values| values.get(index)).copied().flatten()
}

impl OpenMeteoProvider {
    pub(crate) fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| ARCHIVE_URL.to_string()),
        }
    }

    pub(crate) fn validate(&self) -> bool {
        true
    }

    pub(crate) fn max_span_days(&self) -> i64 {
        MAX_SPAN_DAYS
    }

    pub(crate) fn min_request_interval(&self) -> Duration {
        MIN_REQUEST_INTERVAL
    }

    pub(crate) async fn fetch_range(
        &self,
        http: &Client,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ObservationRecord>, ProviderError> {
        debug!(
            "open-meteo request for ({latitude}, {longitude}) covering {start} to {end}"
        );
        let response = http
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("start_date", start.format("%Y-%m-%d").to_string()),
                ("end_date", end.format("%Y-%m-%d").to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::NetworkRequest(self.base_url.clone(), e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited(ProviderKind::OpenMeteo));
        }
        let response = response.error_for_status().map_err(|e| ProviderError::HttpStatus {
            url: self.base_url.clone(),
            status,
            source: e,
        })?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::NetworkRequest(self.base_url.clone(), e))?;
        let body: ArchiveResponse =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::MalformedResponse {
                provider: ProviderKind::OpenMeteo,
                message: e.to_string(),
            })?;

        let daily = body.daily.ok_or_else(|| ProviderError::MalformedResponse {
            provider: ProviderKind::OpenMeteo,
            message: "response is missing the 'daily' block".to_string(),
        })?;

        let mut records = Vec::with_capacity(daily.time.len());
        for (i, date) in daily.time.iter().enumerate() {
            let mut record = ObservationRecord::new(*date);
            record.temp_max = column_value(&daily.temperature_2m_max, i);
            record.temp_min = column_value(&daily.temperature_2m_min, i);
            record.temp_mean = column_value(&daily.temperature_2m_mean, i);
            record.precipitation = column_value(&daily.precipitation_sum, i);
            record.wind_speed_max = column_value(&daily.windspeed_10m_max, i);
            record.wind_gust_max = column_value(&daily.windgusts_10m_max, i);
            record.derive_temp_mean();
            records.push(record);
        }

        if records.is_empty() {
            return Err(ProviderError::NoData {
                provider: ProviderKind::OpenMeteo,
                start,
                end,
            });
        }
        Ok(records)
    }
}
