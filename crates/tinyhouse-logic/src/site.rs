//! Site context: climate and location records supplied by the host.
//!
//! Geocoding and climate lookups happen outside this crate. The host
//! resolves them once per batch and passes the results in as an optional
//! [`SiteContext`]; every consumer degrades to neutral defaults when a
//! record is missing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tables::TablesError;

/// Vegetation class derived from annual rainfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Vegetation {
    Lush,
    Moderate,
    Arid,
}

impl Vegetation {
    pub fn from_precipitation(precipitation_mm: f64) -> Self {
        if precipitation_mm > 1200.0 {
            Self::Lush
        } else if precipitation_mm > 600.0 {
            Self::Moderate
        } else {
            Self::Arid
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Lush => "lush",
            Self::Moderate => "moderate",
            Self::Arid => "arid",
        }
    }
}

/// Site climate summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Climate {
    /// Mean daily maximum temperature, °C.
    pub temperature: f64,
    /// Annual precipitation, mm.
    pub precipitation: f64,
    /// Mean wind speed, m/s.
    pub wind: f64,
    /// Mean relative humidity, %.
    pub humidity: f64,
    pub vegetation: Vegetation,
    /// Heating degree days (0 = unknown).
    pub degree_days: u32,
}

impl Climate {
    /// Summarise daily model series into a climate record.
    ///
    /// Daily precipitation is annualised (×365). Empty series average to 0.
    pub fn from_daily_samples(
        max_temperature: &[f64],
        precipitation: &[f64],
        wind: &[f64],
        humidity: &[f64],
    ) -> Self {
        let temperature = average(max_temperature);
        let precipitation = (average(precipitation) * 365.0).round();
        let degree_days = (4000.0 + (18.0 - temperature) * 120.0)
            .round()
            .clamp(2500.0, 6200.0) as u32;
        Self {
            temperature,
            precipitation,
            wind: average(wind),
            humidity: average(humidity).round(),
            vegetation: Vegetation::from_precipitation(precipitation),
            degree_days,
        }
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Geocoded site location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// ISO 3166-1 alpha-2, any case.
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: f64,
}

/// External site data available to the analytics pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteContext {
    #[serde(default)]
    pub climate: Option<Climate>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl SiteContext {
    pub fn new(climate: Option<Climate>, location: Option<Location>) -> Self {
        Self { climate, location }
    }
}

/// Site setting used for staging and flood exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    Urban,
    Coastal,
    Forest,
    Desert,
    Mountain,
}

impl Environment {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Urban => "Urban",
            Self::Coastal => "Coastal",
            Self::Forest => "Forest",
            Self::Desert => "Desert",
            Self::Mountain => "Mountain",
        }
    }
}

const COASTAL_COUNTRIES: [&str; 9] = ["us", "ca", "au", "es", "pt", "it", "jp", "gb", "br"];

/// Pick the site environment. A manual override always wins.
pub fn environment_from_location(
    location: Option<&Location>,
    manual: Option<Environment>,
) -> Environment {
    if let Some(env) = manual {
        return env;
    }
    let Some(location) = location else {
        return Environment::Forest;
    };

    let country = location
        .country_code
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();
    // A zero longitude counts as "unknown" and never marks a coastline.
    if COASTAL_COUNTRIES.contains(&country.as_str())
        && location.longitude != 0.0
        && location.longitude.abs() < 50.0
    {
        return Environment::Coastal;
    }
    if location.population.unwrap_or(0) > 1_000_000 {
        return Environment::Urban;
    }
    if location.latitude > 55.0 || location.latitude < -55.0 {
        return Environment::Forest;
    }
    if location.elevation > 800.0 {
        Environment::Mountain
    } else {
        Environment::Forest
    }
}

/// Named site contexts, keyed by preset name.
pub type SitePresets = BTreeMap<String, SiteContext>;

/// Parse a JSON object of named site contexts.
pub fn parse_site_presets(json: &str) -> Result<SitePresets, TablesError> {
    Ok(serde_json::from_str(json)?)
}
