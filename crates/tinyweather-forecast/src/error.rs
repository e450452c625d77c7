//! Errors from the forecast and narration clients and cache persistence.

use thiserror::Error;
use tinyweather_core::{AppError, NetworkError, ReqwestErrorExt, WeatherError};

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Could not parse response: {0}")]
    Parse(String),

    #[error("Forecast contained no usable temperature samples")]
    EmptySeries,

    #[error("No narration API key configured")]
    MissingApiKey,

    #[error("Cache file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ForecastError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Status { status, .. } if *status == 401 || *status == 403 => {
                "The weather service rejected the request.".to_string()
            }
            Self::Status { status, .. } if *status == 429 => {
                "Too many requests. Please wait a moment.".to_string()
            }
            Self::Status { .. } => "Weather service unavailable. Please try again.".to_string(),
            Self::Parse(_) | Self::EmptySeries => {
                "Weather service returned unexpected data.".to_string()
            }
            Self::MissingApiKey => "Narration is not configured.".to_string(),
            Self::Io(_) | Self::Json(_) => "Could not access the weather cache.".to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::Network(e) => AppError::Network(e.into_network_error()),
            ForecastError::Status { status, message } => {
                AppError::Network(NetworkError::ServerError { status, message })
            }
            ForecastError::Parse(msg) => AppError::Weather(WeatherError::InvalidData(msg)),
            ForecastError::EmptySeries => {
                AppError::Weather(WeatherError::InvalidData("empty forecast".to_string()))
            }
            ForecastError::MissingApiKey => AppError::Weather(WeatherError::MissingApiKey),
            ForecastError::Io(e) => AppError::Io(e),
            ForecastError::Json(e) => AppError::Weather(WeatherError::CacheError(e.to_string())),
        }
    }
}
