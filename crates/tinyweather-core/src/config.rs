use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Environment variable that overrides `narration.api_key`
pub const NARRATION_API_KEY_ENV: &str = "TINYWEATHER_NARRATION_API_KEY";

/// Tone identifiers known to the narration catalogue
pub const KNOWN_TONES: &[&str] = &[
    "funny",
    "professional",
    "poetic",
    "dramatic",
    "chill",
    "scientific",
    "inpc",
    "cute",
];

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory (cache and history files live here)
    pub config_dir: PathBuf,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub location: LocationConfig,

    #[serde(default)]
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub narration: NarrationConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Place search (Nominatim) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub nominatim_url: String,
    /// Number of raw candidates requested from the geocoder
    pub result_limit: u32,
    /// Leading ranked results shown as "near you"
    pub local_size: usize,
    /// Total ranked results shown (local + global)
    pub total_size: usize,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            result_limit: 10,
            local_size: 3,
            total_size: 6,
            user_agent: "TinyWeather/0.1.0".to_string(),
            timeout_secs: 10,
        }
    }
}

/// IP-based reference location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub enabled: bool,
    pub ip_lookup_url: String,
    pub timeout_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ip_lookup_url: "https://ipapi.co/json/".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Open-Meteo forecast settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub open_meteo_url: String,
    pub timeout_secs: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            open_meteo_url: "https://api.open-meteo.com".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Narration (OpenAI-compatible chat completion) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// API key; `TINYWEATHER_NARRATION_API_KEY` takes precedence when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub default_tone: String,
    pub timeout_secs: u64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.deepinfra.com/v1/openai/chat/completions".to_string(),
            model: "Qwen/Qwen3-32B".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            api_key: None,
            default_tone: "funny".to_string(),
            timeout_secs: 60,
        }
    }
}

impl NarrationConfig {
    /// The API key to use, preferring the environment over the file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(NARRATION_API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Save the weather cache to disk between runs
    pub persist: bool,
    /// Interval of the background stale-entry sweep
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            persist: true,
            sweep_interval_secs: 300,
        }
    }
}

impl CacheConfig {
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub max_entries: usize,
    pub retention_days: i64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: 50,
            retention_days: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tinyweather");

        Self {
            config_dir,
            search: SearchConfig::default(),
            location: LocationConfig::default(),
            forecast: ForecastConfig::default(),
            narration: NarrationConfig::default(),
            cache: CacheConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse config file")
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails; warnings are logged.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.search.nominatim_url, "search.nominatim_url", &mut result);
        validate_url(&self.forecast.open_meteo_url, "forecast.open_meteo_url", &mut result);
        validate_url(&self.narration.endpoint, "narration.endpoint", &mut result);
        if self.location.enabled {
            validate_url(&self.location.ip_lookup_url, "location.ip_lookup_url", &mut result);
        }

        if self.search.total_size == 0 {
            result.add_error("search.total_size", "Must show at least one result");
        }
        if self.search.local_size > self.search.total_size {
            result.add_error(
                "search.local_size",
                format!(
                    "Local results ({}) cannot exceed total results ({})",
                    self.search.local_size, self.search.total_size
                ),
            );
        }
        if (self.search.result_limit as usize) < self.search.total_size {
            result.add_warning(
                "search.result_limit",
                "Geocoder limit is smaller than the number of results shown",
            );
        }
        if self.search.user_agent.trim().is_empty() {
            result.add_error("search.user_agent", "Nominatim requires a User-Agent");
        }

        if !KNOWN_TONES.contains(&self.narration.default_tone.as_str()) {
            result.add_error(
                "narration.default_tone",
                format!("Unknown tone: {}", self.narration.default_tone),
            );
        }
        if !(0.0..=2.0).contains(&self.narration.temperature) {
            result.add_warning("narration.temperature", "Temperature outside 0.0..=2.0");
        }
        if self.narration.resolved_api_key().is_none() {
            result.add_warning(
                "narration.api_key",
                "No narration API key - briefings will skip narration",
            );
        }

        if self.cache.sweep_interval_secs == 0 {
            result.add_error("cache.sweep_interval_secs", "Sweep interval must be greater than 0");
        } else if self.cache.sweep_interval_secs > 1800 {
            result.add_warning(
                "cache.sweep_interval_secs",
                "Sweep interval is longer than the cache lifetime",
            );
        }

        if self.history.max_entries == 0 {
            result.add_warning("history.max_entries", "Search history disabled (0 entries)");
        }
        if self.history.retention_days <= 0 {
            result.add_error("history.retention_days", "Retention must be at least one day");
        }

        result
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Path of the persisted weather cache
    pub fn weather_cache_path(&self) -> PathBuf {
        self.config_dir.join("weather_cache.json")
    }

    /// Path of the persisted search history
    pub fn search_history_path(&self) -> PathBuf {
        self.config_dir.join("search_history.json")
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("tinyweather");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }
            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
