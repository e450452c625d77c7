//! Geocoding via Nominatim (OpenStreetMap) - free, no API key required.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tinyweather_core::{with_retry, RetryConfig, SearchConfig};

use crate::error::PlacesError;
use crate::ranking::rank_and_split;
use crate::types::{PlaceCandidate, RankedSplit, ReferenceLocation};

/// Free-text place lookup.
pub trait Geocoder {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<PlaceCandidate>, PlacesError>> + Send;
}

/// Nominatim HTTP client
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
    limit: u32,
    retry: RetryConfig,
}

impl NominatimClient {
    pub fn new(config: &SearchConfig) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
            limit: config.result_limit,
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Forward search. Blank queries return no candidates without a request.
    /// Records that do not decode are skipped; only a non-array body fails.
    pub async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlacesError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/search", self.base_url);
        let limit = self.limit.to_string();
        let params = [
            ("q", query),
            ("format", "jsonv2"),
            ("addressdetails", "1"),
            ("limit", limit.as_str()),
        ];

        let response = with_retry(&self.retry, || self.client.get(&url).query(&params).send()).await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!("Place search returned status {}", status);
            return Err(PlacesError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let records: Vec<Value> =
            serde_json::from_str(&body).map_err(|e| PlacesError::Parse(e.to_string()))?;
        let candidates: Vec<PlaceCandidate> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value(record) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    tracing::debug!("Skipping malformed place record: {}", e);
                    None
                }
            })
            .collect();

        tracing::info!("Place search \"{}\" returned {} candidates", query, candidates.len());
        Ok(candidates)
    }
}

impl Geocoder for NominatimClient {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlacesError> {
        NominatimClient::search(self, query).await
    }
}

/// Geocoder + ranking: turns a query into local/global suggestions.
#[derive(Debug, Clone)]
pub struct PlaceSearch<G> {
    geocoder: G,
    local_size: usize,
    total_size: usize,
}

impl<G: Geocoder> PlaceSearch<G> {
    pub fn new(geocoder: G, local_size: usize, total_size: usize) -> Self {
        Self {
            geocoder,
            local_size,
            total_size,
        }
    }

    pub fn from_config(geocoder: G, config: &SearchConfig) -> Self {
        Self::new(geocoder, config.local_size, config.total_size)
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Search and rank. Upstream failures are returned; an empty result is
    /// an empty split, not an error.
    pub async fn suggest(
        &self,
        query: &str,
        reference: Option<&ReferenceLocation>,
    ) -> Result<RankedSplit, PlacesError> {
        if query.trim().is_empty() {
            return Ok(RankedSplit::default());
        }

        let candidates = self.geocoder.search(query).await?;
        Ok(rank_and_split(
            candidates,
            query,
            reference,
            self.local_size,
            self.total_size,
        ))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::types::PlaceAddress;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedGeocoder {
        results: Vec<PlaceCandidate>,
        calls: AtomicUsize,
    }

    impl Geocoder for FixedGeocoder {
        async fn search(&self, _query: &str) -> Result<Vec<PlaceCandidate>, PlacesError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.results.clone())
        }
    }

    struct FailingGeocoder;

    impl Geocoder for FailingGeocoder {
        async fn search(&self, _query: &str) -> Result<Vec<PlaceCandidate>, PlacesError> {
            Err(PlacesError::Status {
                status: 503,
                message: "maintenance".into(),
            })
        }
    }

    fn place(id: u64, name: &str, code: &str) -> PlaceCandidate {
        PlaceCandidate {
            identity: id,
            name: name.to_string(),
            display_name: name.to_string(),
            latitude: String::new(),
            longitude: String::new(),
            category: String::new(),
            place_type: String::new(),
            importance: None,
            address: Some(PlaceAddress {
                country_code: Some(code.to_string()),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn test_suggest_ranks_geocoder_results() {
        let geocoder = FixedGeocoder {
            results: vec![place(1, "Paris", "fr"), place(2, "Paris", "us"), place(2, "Paris", "us")],
            calls: AtomicUsize::new(0),
        };
        let search = PlaceSearch::new(geocoder, 1, 3);
        let reference = ReferenceLocation {
            country_code: Some("US".into()),
            ..Default::default()
        };

        let split = search.suggest("Paris", Some(&reference)).await.unwrap();
        assert_eq!(split.local[0].candidate.identity, 2);
        assert_eq!(split.global.len(), 1);
        assert_eq!(split.global[0].candidate.identity, 1);
    }

    #[tokio::test]
    async fn test_blank_query_skips_geocoder() {
        let search = PlaceSearch::new(
            FixedGeocoder {
                results: vec![place(1, "Paris", "fr")],
                calls: AtomicUsize::new(0),
            },
            3,
            6,
        );
        let split = search.suggest("   ", None).await.unwrap();
        assert!(split.is_empty());
        assert_eq!(search.geocoder().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_returned() {
        let search = PlaceSearch::new(FailingGeocoder, 3, 6);
        let err = search.suggest("Paris", None).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
