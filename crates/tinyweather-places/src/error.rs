//! Errors from the geocoding and IP-location clients.
//!
//! Ranking itself never fails; only the network collaborators produce these.

use thiserror::Error;
use tinyweather_core::{AppError, NetworkError, ReqwestErrorExt, WeatherError};

#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Geocoder returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Could not parse geocoder response: {0}")]
    Parse(String),

    #[error("Location lookup failed: {0}")]
    Location(String),
}

impl PlacesError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Status { status, .. } if *status == 429 => {
                "Place search is busy. Please wait a moment.".to_string()
            }
            Self::Status { .. } => "Place search failed. Please try again.".to_string(),
            Self::Parse(_) => "Place search returned unexpected data.".to_string(),
            Self::Location(_) => "Could not detect your location.".to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Parse(_) | Self::Location(_) => false,
        }
    }
}

impl From<PlacesError> for AppError {
    fn from(err: PlacesError) -> Self {
        match err {
            PlacesError::Network(e) => AppError::Network(e.into_network_error()),
            PlacesError::Status { status, message } => {
                AppError::Network(NetworkError::ServerError { status, message })
            }
            PlacesError::Parse(msg) => AppError::Network(NetworkError::InvalidResponse(msg)),
            PlacesError::Location(msg) => AppError::Weather(WeatherError::LocationNotFound(msg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        let busy = PlacesError::Status {
            status: 429,
            message: "slow down".into(),
        };
        assert!(busy.is_retryable());
        assert!(busy.user_message().contains("busy"));
        assert!(!PlacesError::Parse("x".into()).is_retryable());
        assert!(!PlacesError::Status {
            status: 400,
            message: "bad".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = PlacesError::Location("no ip".into()).into();
        assert!(matches!(
            app,
            AppError::Weather(WeatherError::LocationNotFound(_))
        ));
    }
}
