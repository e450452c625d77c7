//! Weather snapshots, the per-location response cache, and narration for TinyWeather
//!
//! Forecast data comes from Open-Meteo and is condensed into a
//! [`WeatherSnapshot`]. Snapshots and the narrations generated from them are
//! cached per rounded coordinate pair for thirty minutes.

pub mod cache;
pub mod cache_key;
pub mod error;
pub mod followup;
pub mod narration;
pub mod persist;
pub mod processing;
pub mod provider;
pub mod shared;
pub mod sweeper;
pub mod tone;
pub mod types;

pub use cache::{CacheEntry, Coordinates, WeatherCache};
pub use cache_key::{cache_ttl, is_stale, key_for, CacheKey, CACHE_TTL_SECS, SWEEP_INTERVAL_SECS};
pub use error::ForecastError;
pub use followup::{suggest_follow_ups, FollowUpSuggestion};
pub use narration::{strip_think_blocks, NarrationClient, Narrator};
pub use persist::{CachePersistence, CacheSnapshotStore};
pub use processing::process_hourly;
pub use provider::{ForecastSource, OpenMeteoClient};
pub use shared::{CacheEvent, SharedWeatherCache};
pub use sweeper::CacheSweeper;
pub use tone::{tone_by_id, Tone, ToneCursor, TONES};
pub use types::*;
