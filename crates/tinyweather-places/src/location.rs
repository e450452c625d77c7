//! Approximate reference location from the caller's IP address.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tinyweather_core::LocationConfig;
use tokio::sync::Mutex;

use crate::error::PlacesError;
use crate::types::ReferenceLocation;

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    country_name: Option<String>,
    country_code: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl IpLookupResponse {
    fn into_reference(self) -> ReferenceLocation {
        ReferenceLocation {
            country_code: self.country_code.or_else(|| self.country.clone()),
            country_name: self.country_name.or(self.country),
            latitude: self.latitude,
            longitude: self.longitude,
            city: self.city,
            region: self.region,
        }
    }
}

/// Resolves the session's reference location once and remembers it.
///
/// Concurrent callers wait on the same lookup. Failed lookups are not
/// remembered, so a later call tries again.
#[derive(Debug)]
pub struct IpLocator {
    client: Client,
    url: String,
    enabled: bool,
    cached: Mutex<Option<ReferenceLocation>>,
}

impl IpLocator {
    pub fn new(config: &LocationConfig) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.ip_lookup_url.clone(),
            enabled: config.enabled,
            cached: Mutex::new(None),
        })
    }

    /// The reference location, or `None` when disabled or undetectable.
    pub async fn locate(&self) -> Option<ReferenceLocation> {
        if !self.enabled {
            return None;
        }

        let mut cached = self.cached.lock().await;
        if let Some(location) = cached.as_ref() {
            return Some(location.clone());
        }

        match self.lookup().await {
            Ok(location) => {
                tracing::info!("Detected reference location: {}", location.context_label());
                *cached = Some(location.clone());
                Some(location)
            }
            Err(e) => {
                tracing::warn!("Failed to get reference location: {}", e);
                None
            }
        }
    }

    /// Forget the remembered location
    pub async fn reset(&self) {
        self.cached.lock().await.take();
    }

    async fn lookup(&self) -> Result<ReferenceLocation, PlacesError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: IpLookupResponse = response
            .json()
            .await
            .map_err(|e| PlacesError::Parse(e.to_string()))?;

        if body.error {
            return Err(PlacesError::Location(
                body.reason.unwrap_or_else(|| "lookup refused".to_string()),
            ));
        }

        Ok(body.into_reference())
    }
}
