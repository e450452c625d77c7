//! Search history used to suggest popular places as input placeholders.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tinyweather_core::HistoryConfig;

/// Suggestions used when there is no (or too little) history
pub const DEFAULT_SUGGESTIONS: &[&str] = &["London", "Glasgow", "Birmingham", "Norwich", "Malta"];

/// Popularity decays linearly to this floor over 30 days
const RECENCY_FLOOR: f64 = 0.1;
const RECENCY_WINDOW_DAYS: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub location: String,
    pub count: u32,
    pub last_searched: DateTime<Utc>,
}

impl SearchHistoryEntry {
    fn age_days(&self, now: DateTime<Utc>) -> f64 {
        (now - self.last_searched).num_milliseconds().max(0) as f64 / 86_400_000.0
    }

    /// Score used when trimming the history to its size cap
    fn retention_score(&self, now: DateTime<Utc>) -> f64 {
        f64::from(self.count) / (1.0 + self.age_days(now))
    }

    /// Score used to order placeholder suggestions
    fn popularity_score(&self, now: DateTime<Utc>) -> f64 {
        let recency = (1.0 - self.age_days(now) / RECENCY_WINDOW_DAYS).max(RECENCY_FLOOR);
        f64::from(self.count) * recency
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchStats {
    pub total_searches: u32,
    pub unique_locations: usize,
    pub most_searched: Option<SearchHistoryEntry>,
}

/// Search counts keyed by the trimmed location text.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: HashMap<String, SearchHistoryEntry>,
    max_entries: usize,
    retention: Duration,
}

impl SearchHistory {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: config.max_entries,
            retention: Duration::days(config.retention_days),
        }
    }

    /// Load history from a JSON file, dropping expired entries.
    /// A missing file yields an empty history.
    pub fn load(path: &Path, config: &HistoryConfig) -> Result<Self> {
        let mut history = Self::new(config);
        if !path.exists() {
            return Ok(history);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read search history")?;
        history.entries =
            serde_json::from_str(&contents).context("Failed to parse search history")?;
        history.prune(Utc::now());
        Ok(history)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create history directory")?;
        }
        let contents =
            serde_json::to_string_pretty(&self.entries).context("Failed to serialize history")?;
        std::fs::write(path, contents).context("Failed to write search history")?;
        Ok(())
    }

    pub fn log_search(&mut self, location: &str) {
        self.log_search_at(location, Utc::now());
    }

    pub fn log_search_at(&mut self, location: &str, now: DateTime<Utc>) {
        let location = location.trim();
        if location.is_empty() {
            return;
        }

        self.entries
            .entry(location.to_string())
            .and_modify(|e| {
                e.count += 1;
                e.last_searched = now;
            })
            .or_insert_with(|| SearchHistoryEntry {
                location: location.to_string(),
                count: 1,
                last_searched: now,
            });

        self.prune(now);
    }

    /// Drop expired entries, then keep the `max_entries` best by retention score.
    fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now - self.retention;
        self.entries.retain(|_, e| e.last_searched > cutoff);

        if self.entries.len() <= self.max_entries {
            return;
        }

        let mut scored: Vec<(String, f64)> = self
            .entries
            .iter()
            .map(|(k, e)| (k.clone(), e.retention_score(now)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (key, _) in scored.into_iter().skip(self.max_entries) {
            self.entries.remove(&key);
        }
    }

    pub fn popular(&self, limit: usize) -> Vec<String> {
        self.popular_at(limit, Utc::now())
    }

    /// Most popular searches (first comma segment), padded with defaults.
    pub fn popular_at(&self, limit: usize, now: DateTime<Utc>) -> Vec<String> {
        if self.entries.is_empty() {
            return DEFAULT_SUGGESTIONS
                .iter()
                .take(limit)
                .map(|s| s.to_string())
                .collect();
        }

        let mut scored: Vec<&SearchHistoryEntry> = self.entries.values().collect();
        scored.sort_by(|a, b| {
            b.popularity_score(now)
                .total_cmp(&a.popularity_score(now))
                .then_with(|| a.location.cmp(&b.location))
        });

        let mut combined: Vec<String> = scored
            .into_iter()
            .take(limit)
            .map(|e| {
                e.location
                    .split(',')
                    .map(str::trim)
                    .find(|part| !part.is_empty())
                    .unwrap_or(&e.location)
                    .to_string()
            })
            .collect();

        for default in DEFAULT_SUGGESTIONS {
            if combined.len() >= limit {
                break;
            }
            if !combined.iter().any(|c| c == default) {
                combined.push(default.to_string());
            }
        }

        combined.truncate(limit);
        combined
    }

    pub fn stats(&self) -> SearchStats {
        let most_searched = self
            .entries
            .values()
            .max_by(|a, b| a.count.cmp(&b.count).then_with(|| b.location.cmp(&a.location)))
            .cloned();

        SearchStats {
            total_searches: self.entries.values().map(|e| e.count).sum(),
            unique_locations: self.entries.len(),
            most_searched,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, location: &str) -> Option<&SearchHistoryEntry> {
        self.entries.get(location.trim())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
