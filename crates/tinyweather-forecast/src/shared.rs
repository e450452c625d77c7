//! Cloneable handle to one [`WeatherCache`] with change notifications.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::cache::{CacheEntry, WeatherCache};
use crate::cache_key::CacheKey;
use crate::types::WeatherSnapshot;

const EVENT_CAPACITY: usize = 64;

/// Emitted after each mutation of the shared cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    Stored { key: CacheKey },
    NarrationStored { key: CacheKey, tone_id: String },
    Swept { removed: usize },
    Cleared,
}

/// Each operation locks once, so `get` followed by `put` is two
/// independent steps, not a transaction.
#[derive(Debug, Clone)]
pub struct SharedWeatherCache {
    inner: Arc<Mutex<WeatherCache>>,
    events: broadcast::Sender<CacheEvent>,
}

impl Default for SharedWeatherCache {
    fn default() -> Self {
        Self::new(WeatherCache::new())
    }
}

impl SharedWeatherCache {
    pub fn new(cache: WeatherCache) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(cache)),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: CacheEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    pub fn get(&self, latitude: f64, longitude: f64) -> Option<CacheEntry> {
        self.inner.lock().get(latitude, longitude).cloned()
    }

    pub fn get_at(&self, latitude: f64, longitude: f64, now: DateTime<Utc>) -> Option<CacheEntry> {
        self.inner.lock().get_at(latitude, longitude, now).cloned()
    }

    pub fn put(&self, location_label: &str, latitude: f64, longitude: f64, snapshot: WeatherSnapshot) {
        let key = self.inner.lock().put(location_label, latitude, longitude, snapshot);
        self.notify(CacheEvent::Stored { key });
    }

    pub fn get_narration(&self, latitude: f64, longitude: f64, tone_id: &str) -> Option<String> {
        self.inner
            .lock()
            .get_narration(latitude, longitude, tone_id)
            .map(str::to_string)
    }

    /// Returns `false` when there was no live entry to attach the narration to
    pub fn put_narration(&self, latitude: f64, longitude: f64, tone_id: &str, text: &str) -> bool {
        let stored = self
            .inner
            .lock()
            .put_narration(latitude, longitude, tone_id, text);
        if stored {
            self.notify(CacheEvent::NarrationStored {
                key: WeatherCache::key_for(latitude, longitude),
                tone_id: tone_id.to_string(),
            });
        }
        stored
    }

    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let removed = self.inner.lock().sweep_at(now);
        if removed > 0 {
            self.notify(CacheEvent::Swept { removed });
        }
        removed
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
        self.notify(CacheEvent::Cleared);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Run `f` with the cache locked
    pub fn with_cache<R>(&self, f: impl FnOnce(&WeatherCache) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Swap in a restored cache without emitting events
    pub fn replace(&self, cache: WeatherCache) {
        *self.inner.lock() = cache;
    }
}
