use serde::{Deserialize, Serialize};

/// One geocoding result, shaped like a Nominatim `jsonv2` record.
///
/// Coordinates stay as the provider's strings; use [`PlaceCandidate::coordinates`]
/// to get parsed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Stable provider id; two candidates with the same id are the same place
    #[serde(rename = "place_id")]
    pub identity: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "lat", default)]
    pub latitude: String,
    #[serde(rename = "lon", default)]
    pub longitude: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub place_type: String,
    #[serde(default)]
    pub importance: Option<f64>,
    #[serde(default)]
    pub address: Option<PlaceAddress>,
}

/// Address details (`addressdetails=1`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceAddress {
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl PlaceCandidate {
    /// Parsed `(latitude, longitude)`, or `None` if either is not a finite number.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((
            parse_coordinate(&self.latitude)?,
            parse_coordinate(&self.longitude)?,
        ))
    }

    /// First comma-separated segment of the display name
    pub fn display_head(&self) -> &str {
        self.display_name.split(',').next().unwrap_or("").trim()
    }

    /// Short label for lists: the primary name, or the display head.
    pub fn label(&self) -> &str {
        if self.name.trim().is_empty() {
            self.display_head()
        } else {
            self.name.trim()
        }
    }

    pub fn importance_or_zero(&self) -> f64 {
        self.importance.filter(|i| i.is_finite()).unwrap_or(0.0)
    }
}

pub(crate) fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The asker's approximate position, used to bias ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLocation {
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl ReferenceLocation {
    /// Both coordinates, when known
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    /// "City, Region, Country", skipping absent parts and a region equal to the city.
    pub fn context_label(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(city) = self.city.as_deref().filter(|c| !c.is_empty()) {
            parts.push(city);
        }
        if let Some(region) = self.region.as_deref().filter(|r| !r.is_empty()) {
            if self.city.as_deref() != Some(region) {
                parts.push(region);
            }
        }
        if let Some(country) = self.country_name.as_deref().filter(|c| !c.is_empty()) {
            parts.push(country);
        }
        parts.join(", ")
    }
}

/// A candidate annotated with its ranking signals. Lives for one ranking call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub candidate: PlaceCandidate,
    pub distance_km: Option<f64>,
    pub is_prefix_match: bool,
    pub is_country_match: bool,
}

/// Ranked results partitioned for display
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedSplit {
    pub local: Vec<RankedCandidate>,
    pub global: Vec<RankedCandidate>,
}

impl RankedSplit {
    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.global.is_empty()
    }

    pub fn len(&self) -> usize {
        self.local.len() + self.global.len()
    }

    /// Best-ranked candidate overall
    pub fn first(&self) -> Option<&RankedCandidate> {
        self.local.first().or_else(|| self.global.first())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedCandidate> {
        self.local.iter().chain(self.global.iter())
    }
}
