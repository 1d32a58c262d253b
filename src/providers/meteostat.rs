use std::time::Duration;

use chrono::NaiveDate;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::providers::error::ProviderError;
use crate::providers::ProviderKind;
use crate::types::observation::ObservationRecord;

const POINT_DAILY_URL: &str = "https://meteostat.p.rapidapi.com/point/daily";
const RAPIDAPI_HOST: &str = "meteostat.p.rapidapi.com";
/// RapidAPI keys are long opaque strings; anything shorter is a paste error.
const MIN_KEY_LENGTH: usize = 32;
const MAX_SPAN_DAYS: i64 = 3650;
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

/// Meteostat point data behind RapidAPI. Row-oriented responses, keyed.
#[derive(Debug)]
pub(crate) struct MeteostatProvider {
    base_url: String,
    api_key: Option<String>,
}

/// Row response body: one object per day under `data`.
#[derive(Debug, Deserialize)]
struct PointDailyResponse {
    data: Vec<DailyRow>,
}

#[derive(Debug, Deserialize)]
struct DailyRow {
    date: NaiveDate,
    tavg: Option<f64>,
    tmin: Option<f64>,
    tmax: Option<f64>,
    prcp: Option<f64>,
    wspd: Option<f64>,
    wpgt: Option<f64>,
}

impl MeteostatProvider {
    pub(crate) fn new(base_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| POINT_DAILY_URL.to_string()),
            api_key,
        }
    }

    /// Usable only with a plausible RapidAPI key.
    pub(crate) fn validate(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| key.trim().len() >= MIN_KEY_LENGTH)
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
        let Some(api_key) = self.api_key.as_deref().filter(|_| self.validate()) else {
            return Err(ProviderError::Unavailable(ProviderKind::Meteostat));
        };

        debug!(
            "meteostat request for ({latitude}, {longitude}) covering {start} to {end}"
        );
        let response = http
            .get(&self.base_url)
            .header("X-RapidAPI-Key", api_key.trim())
            .header("X-RapidAPI-Host", RAPIDAPI_HOST)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("start", start.format("%Y-%m-%d").to_string()),
                ("end", end.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::NetworkRequest(self.base_url.clone(), e))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ProviderError::Unauthorized(ProviderKind::Meteostat));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(ProviderError::RateLimited(ProviderKind::Meteostat));
            }
            _ => {}
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
        let body: PointDailyResponse =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::MalformedResponse {
                provider: ProviderKind::Meteostat,
                message: e.to_string(),
            })?;

        let mut records = Vec::with_capacity(body.data.len());
        for row in body.data {
            let mut record = ObservationRecord::new(row.date);
            record.temp_mean = row.tavg;
            record.temp_min = row.tmin;
            record.temp_max = row.tmax;
            record.precipitation = row.prcp;
            record.wind_speed_max = row.wspd;
            record.wind_gust_max = row.wpgt;
            record.derive_temp_mean();
            records.push(record);
        }

        if records.is_empty() {
            return Err(ProviderError::NoData {
                provider: ProviderKind::Meteostat,
                start,
                end,
            });
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_requires_plausible_key() {
        let no_key = MeteostatProvider::new(None, None);
        assert!(!no_key.validate());

        let short_key = MeteostatProvider::new(None, Some("abc123".to_string()));
        assert!(!short_key.validate());

        let key = "0123456789abcdef0123456789abcdef".to_string();
        let good = MeteostatProvider::new(None, Some(key));
        assert!(good.validate());
    }

    #[test]
    fn daily_rows_parse_with_nulls() {
        let body = r#"{
            "data": [
                {"date": "2024-06-01", "tavg": 21.4, "tmin": 15.0, "tmax": 28.1,
                 "prcp": null, "wspd": 11.2, "wpgt": 33.0, "wdir": 180, "tsun": 540}
            ]
        }"#;
        let parsed: PointDailyResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].tmax, Some(28.1));
        assert_eq!(parsed.data[0].prcp, None);
    }
}
