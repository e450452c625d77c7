//! Place search for TinyWeather
//!
//! Ranks geocoded place candidates against the asker's approximate
//! location, and provides the Nominatim and IP-geolocation clients that
//! feed the ranking, plus a small search-history store.

pub mod dedup;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod history;
pub mod location;
pub mod ranking;
pub mod types;

pub use dedup::dedupe_by_identity;
pub use error::PlacesError;
pub use geo::{distance_to_reference, haversine_distance_km, is_country_match, is_prefix_match};
pub use geocode::{Geocoder, NominatimClient, PlaceSearch};
pub use history::{SearchHistory, SearchHistoryEntry, SearchStats};
pub use location::IpLocator;
pub use ranking::{rank, rank_and_split};
pub use types::*;
