//! Key normalisation and expiry policy shared by the weather cache.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Entries older than this are treated as absent
pub const CACHE_TTL_SECS: i64 = 30 * 60;

/// Default period of the background sweep
pub const SWEEP_INTERVAL_SECS: u64 = 5 * 60;

/// Decimal places kept for each coordinate in a key
pub const KEY_PRECISION: i32 = 2;

pub fn cache_ttl() -> Duration {
    Duration::seconds(CACHE_TTL_SECS)
}

/// Rounded `"lat,lon"` pair identifying a cache entry.
///
/// Points within roughly a kilometre collapse onto the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed-precision rendering of the stored double, never negative zero.
/// The value is formatted as is; scaling first would round twice.
fn format_coordinate(value: f64) -> String {
    let text = format!("{:.prec$}", value, prec = KEY_PRECISION as usize);
    match text.strip_prefix('-') {
        Some(magnitude) if magnitude.bytes().all(|b| b == b'0' || b == b'.') => {
            magnitude.to_string()
        }
        _ => text,
    }
}

pub fn key_for(latitude: f64, longitude: f64) -> CacheKey {
    CacheKey(format!(
        "{},{}",
        format_coordinate(latitude),
        format_coordinate(longitude)
    ))
}

/// True once `now - created_at` reaches the TTL
pub fn is_stale(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - created_at >= cache_ttl()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_key_uses_fixed_precision() {
        assert_eq!(key_for(51.5, -0.1).as_str(), "51.50,-0.10");
        assert_eq!(key_for(51.50, -0.10), key_for(51.5, -0.1));
        assert_eq!(key_for(48.85661, 2.35222).to_string(), "48.86,2.35");
    }

    #[test]
    fn test_nearby_points_collide() {
        assert_eq!(key_for(51.504, -0.096), key_for(51.496, -0.101));
        assert_ne!(key_for(51.504, -0.096), key_for(51.516, -0.096));
    }

    #[test]
    fn test_no_negative_zero() {
        assert_eq!(key_for(-0.001, -0.004).as_str(), "0.00,0.00");
        assert_eq!(key_for(-0.0, 0.0), key_for(0.0, 0.0));
    }

    #[test]
    fn test_rounds_the_stored_value() {
        // 48.855, 0.015 and -0.105 are all stored just short of the half
        assert_eq!(key_for(48.855, 0.015).as_str(), "48.85,0.01");
        assert_eq!(key_for(51.5, -0.105).as_str(), "51.50,-0.10");
        // stored just above the half, so these round outwards
        assert_eq!(key_for(-0.005, 0.005).as_str(), "-0.01,0.01");
    }

    #[test]
    fn test_stale_at_exact_ttl() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        assert!(!is_stale(t0, t0));
        assert!(!is_stale(t0, t0 + Duration::seconds(1799)));
        assert!(is_stale(t0, t0 + Duration::seconds(1800)));
        assert!(is_stale(t0, t0 + Duration::hours(5)));
        // clock skew: an entry from the future is fresh
        assert!(!is_stale(t0 + Duration::minutes(1), t0));
    }
}
