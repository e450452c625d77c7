//! Pure scoring predicates between a candidate and the asker's location.

use crate::types::{PlaceCandidate, ReferenceLocation};

/// Mean Earth radius
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points given in decimal degrees.
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1_r.cos() * lat2_r.cos() * (d_lon / 2.0).sin().powi(2);
    // clamp guards against a creeping just above 1.0 for antipodal points
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// True if the trimmed, lowercased query starts the candidate's name, the
/// first segment of its display name, or its address city/town.
pub fn is_prefix_match(candidate: &PlaceCandidate, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return false;
    }

    let address = candidate.address.as_ref();
    let fields = [
        Some(candidate.name.as_str()),
        Some(candidate.display_head()),
        address.and_then(|a| a.city.as_deref()),
        address.and_then(|a| a.town.as_deref()),
    ];

    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().starts_with(&query))
}

/// True if the candidate lies in the reference's country.
///
/// Each side uses its country code, falling back to the country name.
pub fn is_country_match(candidate: &PlaceCandidate, reference: Option<&ReferenceLocation>) -> bool {
    let Some(reference) = reference else {
        return false;
    };

    let wanted = first_non_empty(&[
        reference.country_code.as_deref(),
        reference.country_name.as_deref(),
    ]);
    let Some(wanted) = wanted else {
        return false;
    };

    let address = candidate.address.as_ref();
    let actual = first_non_empty(&[
        address.and_then(|a| a.country_code.as_deref()),
        address.and_then(|a| a.country.as_deref()),
    ]);

    actual.is_some_and(|actual| actual == wanted)
}

/// Distance from the reference to the candidate, when both sides have coordinates.
pub fn distance_to_reference(
    candidate: &PlaceCandidate,
    reference: Option<&ReferenceLocation>,
) -> Option<f64> {
    let (ref_lat, ref_lon) = reference?.coordinates()?;
    let (lat, lon) = candidate.coordinates()?;
    Some(haversine_distance_km(ref_lat, ref_lon, lat, lon))
}

fn first_non_empty(values: &[Option<&str>]) -> Option<String> {
    values
        .iter()
        .flatten()
        .map(|v| v.trim().to_lowercase())
        .find(|v| !v.is_empty())
}
