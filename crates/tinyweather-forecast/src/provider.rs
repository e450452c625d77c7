//! Hourly forecasts from Open-Meteo (free, no API key).
//! See: https://open-meteo.com/en/docs

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tinyweather_core::{with_retry, ForecastConfig, RetryConfig};

use crate::error::ForecastError;
use crate::types::HourlySeries;

const HOURLY_VARIABLES: &str = "temperature_2m,precipitation_probability,precipitation,\
relative_humidity_2m,cloud_cover,wind_speed_10m";

/// Raw hourly forecast for a coordinate pair.
pub trait ForecastSource {
    fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<HourlySeries, ForecastError>> + Send;
}

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl OpenMeteoClient {
    pub fn new(config: &ForecastConfig) -> Result<Self, ForecastError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.open_meteo_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub async fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<HourlySeries, ForecastError> {
        let url = format!("{}/v1/forecast", self.base_url);
        let lat = latitude.to_string();
        let lon = longitude.to_string();
        let params = [
            ("latitude", lat.as_str()),
            ("longitude", lon.as_str()),
            ("hourly", HOURLY_VARIABLES),
            ("timeformat", "unixtime"),
            ("forecast_days", "2"),
        ];

        let response = with_retry(&self.retry, || self.client.get(&url).query(&params).send()).await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!("Forecast request returned status {}", status);
            return Err(ForecastError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| ForecastError::Parse(e.to_string()))?;

        let series = parsed.hourly.into_series()?;
        tracing::info!(
            "Fetched {} hourly samples for {:.2},{:.2}",
            series.len(),
            latitude,
            longitude
        );
        Ok(series)
    }
}

impl ForecastSource for OpenMeteoClient {
    async fn fetch_hourly(&self, latitude: f64, longitude: f64) -> Result<HourlySeries, ForecastError> {
        OpenMeteoClient::fetch_hourly(self, latitude, longitude).await
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlyResponse,
}

#[derive(Debug, Deserialize)]
struct HourlyResponse {
    time: Vec<i64>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    cloud_cover: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
}

impl HourlyResponse {
    fn into_series(self) -> Result<HourlySeries, ForecastError> {
        let times = self
            .time
            .iter()
            .map(|&ts| {
                DateTime::<Utc>::from_timestamp(ts, 0)
                    .ok_or_else(|| ForecastError::Parse(format!("invalid timestamp {}", ts)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HourlySeries {
            times,
            temperature: self.temperature_2m,
            precipitation_probability: self.precipitation_probability,
            precipitation: self.precipitation,
            cloud_cover: self.cloud_cover,
            wind_speed: self.wind_speed_10m,
            relative_humidity: self.relative_humidity_2m,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_parse_hourly_with_nulls() {
        let parsed: ForecastResponse = serde_json::from_value(serde_json::json!({
            "latitude": 52.52,
            "longitude": 13.41,
            "utc_offset_seconds": 0,
            "hourly_units": { "temperature_2m": "°C" },
            "hourly": {
                "time": [1_780_000_000_i64, 1_780_003_600_i64],
                "temperature_2m": [12.5, null],
                "precipitation_probability": [10, 20],
                "wind_speed_10m": [3.2, 4.1]
            }
        }))
        .unwrap();

        let series = parsed.hourly.into_series().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.temperature, vec![Some(12.5), None]);
        assert_eq!(series.precipitation_probability, vec![Some(10.0), Some(20.0)]);
        assert!(series.cloud_cover.is_empty());
        assert_eq!(series.times[1].timestamp(), 1_780_003_600);
    }

    #[test]
    fn test_out_of_range_timestamp_is_parse_error() {
        let hourly = HourlyResponse {
            time: vec![i64::MAX],
            temperature_2m: vec![],
            precipitation_probability: vec![],
            precipitation: vec![],
            relative_humidity_2m: vec![],
            cloud_cover: vec![],
            wind_speed_10m: vec![],
        };
        assert!(matches!(hourly.into_series(), Err(ForecastError::Parse(_))));
    }
}
