//! End-to-end briefing: place search, cached forecast, cached narration.

use std::fmt;
use std::path::PathBuf;

use parking_lot::Mutex;
use tinyweather_core::{AppError, WeatherError};
use tinyweather_forecast::{
    process_hourly, suggest_follow_ups, FollowUpSuggestion, ForecastSource, Narrator,
    SharedWeatherCache, Tone, WeatherSnapshot,
};
use tinyweather_places::{Geocoder, IpLocator, PlaceSearch, SearchHistory};

/// Result of one briefing run
#[derive(Debug, Clone)]
pub struct BriefingReport {
    pub location_label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub snapshot: WeatherSnapshot,
    pub snapshot_cached: bool,
    pub tone: &'static Tone,
    pub narration: Option<String>,
    pub narration_cached: bool,
    /// Other ranked matches, best first
    pub alternatives: Vec<String>,
    pub follow_ups: Vec<FollowUpSuggestion>,
}

impl fmt::Display for BriefingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.snapshot;
        writeln!(
            f,
            "{} ({:.4}, {:.4}){}",
            self.location_label,
            self.latitude,
            self.longitude,
            if self.snapshot_cached { " [cached]" } else { "" }
        )?;
        writeln!(
            f,
            "  Temperature: {:.1}°C now, {:.1}°C to {:.1}°C, {}",
            s.temperature.now,
            s.temperature.low,
            s.temperature.high,
            s.temperature.trend.description()
        )?;
        writeln!(
            f,
            "  Rain: {:.0}% max chance, {:.1} mm total",
            s.precipitation.max_chance, s.precipitation.total_rain
        )?;
        writeln!(f, "  Clouds: {:.0}% average, {}", s.clouds.avg, s.clouds.trend.description())?;
        writeln!(
            f,
            "  Wind: up to {:.1} km/h, {}",
            s.wind.max,
            s.wind.conditions.description()
        )?;
        writeln!(f, "  Summary: {}", s.summary_hints.join(", "))?;

        if let Some(narration) = &self.narration {
            writeln!(
                f,
                "\n{} {}{}: {}",
                self.tone.emoji,
                self.tone.name,
                if self.narration_cached { " [cached]" } else { "" },
                narration
            )?;
        }
        if !self.alternatives.is_empty() {
            writeln!(f, "\nDid you mean: {}", self.alternatives.join("; "))?;
        }
        if !self.follow_ups.is_empty() {
            writeln!(f, "\nAsk next:")?;
            for suggestion in &self.follow_ups {
                writeln!(f, "  {} {}", suggestion.emoji, suggestion.text)?;
            }
        }
        Ok(())
    }
}

/// Wires place search, forecast, narration and the shared cache together.
pub struct Briefing<G, F, N> {
    search: PlaceSearch<G>,
    locator: IpLocator,
    forecast: F,
    narrator: N,
    cache: SharedWeatherCache,
    history: Mutex<SearchHistory>,
    history_path: Option<PathBuf>,
}

impl<G, F, N> Briefing<G, F, N>
where
    G: Geocoder,
    F: ForecastSource,
    N: Narrator,
{
    pub fn new(
        search: PlaceSearch<G>,
        locator: IpLocator,
        forecast: F,
        narrator: N,
        cache: SharedWeatherCache,
        history: SearchHistory,
    ) -> Self {
        Self {
            search,
            locator,
            forecast,
            narrator,
            cache,
            history: Mutex::new(history),
            history_path: None,
        }
    }

    /// Save search history to `path` after every run
    pub fn with_history_path(mut self, path: PathBuf) -> Self {
        self.history_path = Some(path);
        self
    }

    pub fn narrator(&self) -> &N {
        &self.narrator
    }

    pub async fn run(&self, query: &str, tone: &'static Tone) -> Result<BriefingReport, AppError> {
        let reference = self.locator.locate().await;
        let split = self.search.suggest(query, reference.as_ref()).await?;

        let best = split
            .first()
            .ok_or_else(|| WeatherError::LocationNotFound(query.trim().to_string()))?;
        let (latitude, longitude) = best.candidate.coordinates().ok_or_else(|| {
            WeatherError::LocationNotFound(format!("{} has no usable coordinates", best.candidate.label()))
        })?;
        let location_label = best.candidate.display_name.clone();
        let alternatives = split
            .iter()
            .skip(1)
            .map(|r| r.candidate.display_name.clone())
            .collect();

        self.record_search(&location_label);

        let (snapshot, snapshot_cached) = match self.cache.get(latitude, longitude) {
            Some(entry) => {
                tracing::debug!("Using cached weather for {}", entry.location_label);
                (entry.snapshot, true)
            }
            None => {
                let series = self.forecast.fetch_hourly(latitude, longitude).await?;
                let snapshot = process_hourly(&series)?;
                self.cache
                    .put(&location_label, latitude, longitude, snapshot.clone());
                (snapshot, false)
            }
        };

        let (narration, narration_cached) = self.narration(latitude, longitude, &snapshot, tone).await;
        let follow_ups = suggest_follow_ups(&snapshot, &location_label);

        Ok(BriefingReport {
            location_label,
            latitude,
            longitude,
            snapshot,
            snapshot_cached,
            tone,
            narration,
            narration_cached,
            alternatives,
            follow_ups,
        })
    }

    /// Cached narration, or a fresh one stored back into the cache. Failures
    /// leave the briefing without narration rather than failing it.
    async fn narration(
        &self,
        latitude: f64,
        longitude: f64,
        snapshot: &WeatherSnapshot,
        tone: &Tone,
    ) -> (Option<String>, bool) {
        if let Some(text) = self.cache.get_narration(latitude, longitude, tone.id) {
            return (Some(text), true);
        }
        if !self.narrator.is_available() {
            tracing::info!("Narration skipped: no API key configured");
            return (None, false);
        }

        match self.narrator.narrate(snapshot, tone).await {
            Ok(text) => {
                self.cache.put_narration(latitude, longitude, tone.id, &text);
                (Some(text), false)
            }
            Err(e) => {
                tracing::warn!("Narration failed: {}", e);
                (None, false)
            }
        }
    }

    fn record_search(&self, location: &str) {
        let mut history = self.history.lock();
        history.log_search(location);
        if let Some(path) = &self.history_path {
            if let Err(e) = history.save(path) {
                tracing::warn!("Failed to save search history: {}", e);
            }
        }
    }
}
