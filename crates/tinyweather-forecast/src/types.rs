use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw hourly forecast arrays, index-aligned with `times`.
///
/// Missing samples from the provider are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlySeries {
    pub times: Vec<DateTime<Utc>>,
    pub temperature: Vec<Option<f64>>,
    pub precipitation_probability: Vec<Option<f64>>,
    pub precipitation: Vec<Option<f64>>,
    pub cloud_cover: Vec<Option<f64>>,
    pub wind_speed: Vec<Option<f64>>,
    pub relative_humidity: Vec<Option<f64>>,
}

impl HourlySeries {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Condensed 24-hour summary that narrations are generated from.
///
/// Field names serialize in camelCase; this JSON is what the narration
/// prompt embeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub period: String,
    pub temperature: TemperatureSummary,
    pub precipitation: PrecipitationSummary,
    pub clouds: CloudSummary,
    pub wind: WindSummary,
    pub summary_hints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    pub now: f64,
    pub high: f64,
    pub low: f64,
    pub trend: TemperatureTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecipitationSummary {
    pub max_chance: f64,
    pub peak_hour: Option<DateTime<Utc>>,
    pub total_rain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudSummary {
    pub avg: f64,
    pub trend: CloudTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindSummary {
    pub max: f64,
    pub avg: f64,
    pub conditions: WindConditions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureTrend {
    Warming,
    Cooling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudTrend {
    #[serde(rename = "clouds increasing")]
    Increasing,
    #[serde(rename = "clearing")]
    Clearing,
    #[serde(rename = "steady")]
    Steady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindConditions {
    #[serde(rename = "strong winds")]
    Strong,
    #[serde(rename = "breezy")]
    Breezy,
    #[serde(rename = "light winds")]
    Light,
}

impl WindConditions {
    /// Classify a maximum wind speed in km/h
    pub fn from_max_speed(max: f64) -> Self {
        if max > 12.0 {
            Self::Strong
        } else if max > 7.0 {
            Self::Breezy
        } else {
            Self::Light
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Strong => "strong winds",
            Self::Breezy => "breezy",
            Self::Light => "light winds",
        }
    }
}

impl TemperatureTrend {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Warming => "warming",
            Self::Cooling => "cooling",
        }
    }
}

impl CloudTrend {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Increasing => "clouds increasing",
            Self::Clearing => "clearing",
            Self::Steady => "steady",
        }
    }
}
