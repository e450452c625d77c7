//! Optional JSON persistence of the weather cache across restarts.
//!
//! The cache itself never touches disk; the host saves after mutations or
//! at shutdown, and entries are re-checked against the TTL on load.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tinyweather_core::{AppContext, Component};

use crate::cache::{CacheEntry, WeatherCache};
use crate::cache_key::CacheKey;
use crate::error::ForecastError;
use crate::shared::SharedWeatherCache;

#[derive(Debug, Clone)]
pub struct CacheSnapshotStore {
    path: PathBuf,
}

impl CacheSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all entries, replacing the previous file in one rename.
    pub fn save(&self, cache: &WeatherCache) -> Result<(), ForecastError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(cache.entries())?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!("Saved {} weather cache entries to {:?}", cache.len(), self.path);
        Ok(())
    }

    pub fn load(&self) -> Result<WeatherCache, ForecastError> {
        self.load_at(Utc::now())
    }

    /// Missing file yields an empty cache; entries stale at `now` are dropped.
    pub fn load_at(&self, now: DateTime<Utc>) -> Result<WeatherCache, ForecastError> {
        if !self.path.exists() {
            return Ok(WeatherCache::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let entries: HashMap<CacheKey, CacheEntry> = serde_json::from_str(&contents)?;
        let stored = entries.len();
        let cache = WeatherCache::from_entries(entries, now);
        tracing::debug!(
            "Restored {} of {} weather cache entries from {:?}",
            cache.len(),
            stored,
            self.path
        );
        Ok(cache)
    }

    pub fn save_shared(&self, cache: &SharedWeatherCache) -> Result<(), ForecastError> {
        cache.with_cache(|c| self.save(c))
    }
}

/// Restores the shared cache on start and saves it on stop.
#[derive(Debug)]
pub struct CachePersistence {
    store: CacheSnapshotStore,
    cache: SharedWeatherCache,
    enabled: bool,
}

impl CachePersistence {
    pub fn new(store: CacheSnapshotStore, cache: SharedWeatherCache) -> Self {
        Self {
            store,
            cache,
            enabled: true,
        }
    }
}

impl Component for CachePersistence {
    fn id(&self) -> &str {
        "cache-persistence"
    }

    fn name(&self) -> &str {
        "Weather cache persistence"
    }

    fn initialize(&mut self, ctx: &AppContext) -> anyhow::Result<()> {
        self.enabled = ctx.config.cache.persist;
        if !self.enabled {
            return Ok(());
        }
        match self.store.load() {
            Ok(restored) => self.cache.replace(restored),
            // A corrupt cache file is not worth failing startup over
            Err(e) => tracing::warn!("Ignoring unreadable weather cache: {}", e),
        }
        Ok(())
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.store.save_shared(&self.cache)?;
        Ok(())
    }
}
