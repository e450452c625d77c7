//! Integration tests for the Nominatim and IP lookup clients using wiremock.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use tinyweather_core::{LocationConfig, RetryConfig, SearchConfig};
use tinyweather_places::{IpLocator, NominatimClient, PlaceSearch, PlacesError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn search_config(uri: &str) -> SearchConfig {
    SearchConfig {
        nominatim_url: uri.to_string(),
        result_limit: 5,
        local_size: 1,
        total_size: 3,
        user_agent: "tinyweather-tests".to_string(),
        timeout_secs: 5,
    }
}

fn nominatim_place(id: u64, name: &str, lat: &str, lon: &str, country_code: &str) -> serde_json::Value {
    serde_json::json!({
        "place_id": id,
        "licence": "Data © OpenStreetMap contributors",
        "osm_type": "relation",
        "osm_id": id * 10,
        "lat": lat,
        "lon": lon,
        "category": "boundary",
        "type": "administrative",
        "place_rank": 16,
        "importance": 0.5,
        "addresstype": "city",
        "name": name,
        "display_name": format!("{name}, Somewhere"),
        "address": { "city": name, "country_code": country_code }
    })
}

#[tokio::test]
async fn test_search_sends_expected_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Paris"))
        .and(query_param("format", "jsonv2"))
        .and(query_param("addressdetails", "1"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            nominatim_place(1, "Paris", "48.8566", "2.3522", "fr"),
            nominatim_place(2, "Paris", "33.6609", "-95.5555", "us"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = NominatimClient::new(&search_config(&server.uri())).unwrap();
    let candidates = client.search("  Paris ").await.unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[1].identity, 2);
    assert_eq!(candidates[1].longitude, "-95.5555");
}

#[tokio::test]
async fn test_suggest_ranks_live_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            nominatim_place(1, "Paris", "48.8566", "2.3522", "fr"),
            nominatim_place(2, "Paris", "33.6609", "-95.5555", "us"),
            nominatim_place(1, "Paris", "48.8566", "2.3522", "fr"),
            nominatim_place(3, "Parisot", "44.26", "1.85", "fr"),
        ])))
        .mount(&server)
        .await;

    let config = search_config(&server.uri());
    let search = PlaceSearch::from_config(NominatimClient::new(&config).unwrap(), &config);
    let reference = tinyweather_places::ReferenceLocation {
        country_code: Some("US".into()),
        latitude: Some(32.7767),
        longitude: Some(-96.797),
        ..Default::default()
    };

    let split = search.suggest("Paris", Some(&reference)).await.unwrap();
    let ids: Vec<u64> = split.iter().map(|r| r.candidate.identity).collect();
    assert_eq!(ids, vec![2, 1, 3]);
    assert_eq!(split.local.len(), 1);
    assert_eq!(split.global.len(), 2);
}

#[tokio::test]
async fn test_search_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_string("blocked"))
        .mount(&server)
        .await;

    let client = NominatimClient::new(&search_config(&server.uri()))
        .unwrap()
        .with_retry_config(RetryConfig::none());
    let err = client.search("Paris").await.unwrap_err();

    match err {
        PlacesError::Status { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "blocked");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_search_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let client = NominatimClient::new(&search_config(&server.uri())).unwrap();
    assert!(matches!(
        client.search("Paris").await,
        Err(PlacesError::Parse(_))
    ));
}

#[tokio::test]
async fn test_search_skips_malformed_records() {
    let server = MockServer::start().await;

    let mut missing_id = nominatim_place(2, "Paris", "48.8566", "2.3522", "fr");
    missing_id.as_object_mut().unwrap().remove("place_id");
    let mut bad_lat = nominatim_place(3, "Lyon", "45.76", "4.83", "fr");
    bad_lat["lat"] = serde_json::json!({ "deg": 45 });

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            nominatim_place(1, "London", "51.5074", "-0.1278", "gb"),
            missing_id,
            bad_lat,
            nominatim_place(4, "Leeds", "53.8008", "-1.5491", "gb"),
        ])))
        .mount(&server)
        .await;

    let client = NominatimClient::new(&search_config(&server.uri())).unwrap();
    let candidates = client.search("L").await.unwrap();

    let ids: Vec<u64> = candidates.iter().map(|c| c.identity).collect();
    assert_eq!(ids, vec![1, 4]);
}

#[tokio::test]
async fn test_ip_locator_caches_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": "Glasgow",
            "region": "Scotland",
            "country_name": "United Kingdom",
            "country_code": "GB",
            "latitude": 55.8642,
            "longitude": -4.2518
        })))
        .expect(1)
        .mount(&server)
        .await;

    let locator = IpLocator::new(&LocationConfig {
        enabled: true,
        ip_lookup_url: format!("{}/json/", server.uri()),
        timeout_secs: 5,
    })
    .unwrap();

    let first = locator.locate().await.unwrap();
    let second = locator.locate().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.country_code.as_deref(), Some("GB"));
    assert_eq!(first.coordinates(), Some((55.8642, -4.2518)));
}

#[tokio::test]
async fn test_ip_locator_error_body_is_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": true,
            "reason": "RateLimited"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let locator = IpLocator::new(&LocationConfig {
        enabled: true,
        ip_lookup_url: format!("{}/json/", server.uri()),
        timeout_secs: 5,
    })
    .unwrap();

    assert!(locator.locate().await.is_none());
    assert!(locator.locate().await.is_none());
}
