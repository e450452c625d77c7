//! Two-level expiring store: a snapshot per rounded coordinate pair, and
//! per-tone narrations nested inside each entry.
//!
//! Reads never evict. Stale entries are ignored by `get` and removed only by
//! [`WeatherCache::sweep`]. Every time-dependent method has an `_at` variant
//! taking an explicit `now`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache_key::{is_stale, key_for, CacheKey};
use crate::types::WeatherSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub location_label: String,
    /// Unrounded coordinates the entry was stored with
    pub coordinates: Coordinates,
    pub snapshot: WeatherSnapshot,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub narrations_by_tone: HashMap<String, String>,
}

impl CacheEntry {
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        is_stale(self.created_at, now)
    }

    pub fn narration(&self, tone_id: &str) -> Option<&str> {
        self.narrations_by_tone.get(tone_id).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeatherCache {
    entries: HashMap<CacheKey, CacheEntry>,
}

impl WeatherCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries, dropping any already stale at `now`.
    pub fn from_entries(entries: HashMap<CacheKey, CacheEntry>, now: DateTime<Utc>) -> Self {
        let mut cache = Self { entries };
        cache.sweep_at(now);
        cache
    }

    pub fn key_for(latitude: f64, longitude: f64) -> CacheKey {
        key_for(latitude, longitude)
    }

    pub fn get(&self, latitude: f64, longitude: f64) -> Option<&CacheEntry> {
        self.get_at(latitude, longitude, Utc::now())
    }

    pub fn get_at(&self, latitude: f64, longitude: f64, now: DateTime<Utc>) -> Option<&CacheEntry> {
        self.entries
            .get(&key_for(latitude, longitude))
            .filter(|entry| !entry.is_stale_at(now))
    }

    pub fn put(&mut self, location_label: &str, latitude: f64, longitude: f64, snapshot: WeatherSnapshot) -> CacheKey {
        self.put_at(location_label, latitude, longitude, snapshot, Utc::now())
    }

    /// Create or replace the entry. Narrations recorded against a previous
    /// entry at the same key are discarded.
    pub fn put_at(
        &mut self,
        location_label: &str,
        latitude: f64,
        longitude: f64,
        snapshot: WeatherSnapshot,
        now: DateTime<Utc>,
    ) -> CacheKey {
        let key = key_for(latitude, longitude);
        let entry = CacheEntry {
            location_label: location_label.to_string(),
            coordinates: Coordinates {
                latitude,
                longitude,
            },
            snapshot,
            created_at: now,
            narrations_by_tone: HashMap::new(),
        };
        if self.entries.insert(key.clone(), entry).is_some() {
            tracing::debug!("Replaced weather cache entry {}", key);
        }
        key
    }

    pub fn get_narration(&self, latitude: f64, longitude: f64, tone_id: &str) -> Option<&str> {
        self.get_narration_at(latitude, longitude, tone_id, Utc::now())
    }

    pub fn get_narration_at(
        &self,
        latitude: f64,
        longitude: f64,
        tone_id: &str,
        now: DateTime<Utc>,
    ) -> Option<&str> {
        self.get_at(latitude, longitude, now)?.narration(tone_id)
    }

    pub fn put_narration(&mut self, latitude: f64, longitude: f64, tone_id: &str, text: &str) -> bool {
        self.put_narration_at(latitude, longitude, tone_id, text, Utc::now())
    }

    /// Record a narration on the live entry. Returns `false` and stores
    /// nothing when there is no live entry; a snapshot must be put first.
    pub fn put_narration_at(
        &mut self,
        latitude: f64,
        longitude: f64,
        tone_id: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> bool {
        match self
            .entries
            .get_mut(&key_for(latitude, longitude))
            .filter(|entry| !entry.is_stale_at(now))
        {
            Some(entry) => {
                entry
                    .narrations_by_tone
                    .insert(tone_id.to_string(), text.to_string());
                true
            }
            None => {
                tracing::debug!("Dropped narration for {} with no live cache entry", tone_id);
                false
            }
        }
    }

    pub fn sweep(&mut self) -> usize {
        self.sweep_at(Utc::now())
    }

    /// Remove stale entries, returning how many were removed
    pub fn sweep_at(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_stale_at(now));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All stored entries, stale ones included
    pub fn entries(&self) -> &HashMap<CacheKey, CacheEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
