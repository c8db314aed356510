//! Lookup tables for the analytics pipeline.
//!
//! All cost, energy, carbon and scoring constants live in one immutable
//! [`AnalyticsTables`] value that is passed into the analytics functions.
//! The defaults reproduce the studio's calibrated baselines; a JSON file
//! can override any subset of them (missing sections keep their
//! defaults). A key missing from a map falls back to a fixed baseline
//! rather than failing.
//!
//! ```
//! use tinyhouse_logic::tables::AnalyticsTables;
//!
//! let tables = AnalyticsTables::from_json(r#"{ "base_sale_price": 300.0 }"#).unwrap();
//! assert_eq!(tables.base_sale_price, 300.0);
//! assert_eq!(tables.default_country_cost_factor, 1.1);
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::category::RoomCategory;
use crate::params::{EnergySystem, Envelope, Fabricator, Orientation, Palette, Sustainability};

// ── Fallback baselines for missing keys ─────────────────────────────────

pub const FALLBACK_CATEGORY_COST: f64 = 200.0;
pub const FALLBACK_CATEGORY_ENERGY: f64 = 10.0;
pub const FALLBACK_CATEGORY_CARBON: f64 = 26.0;
pub const FALLBACK_SUSTAINABILITY_COST: f64 = 1.05;
pub const FALLBACK_ROOM_ENERGY_SYSTEM: f64 = 0.95;
pub const FALLBACK_FABRICATOR_SPEED: f64 = 48.0;
pub const FALLBACK_R_VALUE: f64 = 28.0;

/// Look up `key`, falling back to `default` (with a warning) when absent.
pub(crate) fn lookup<K>(map: &HashMap<K, f64>, key: &K, default: f64, table: &str) -> f64
where
    K: Eq + Hash + Debug,
{
    match map.get(key) {
        Some(v) => *v,
        None => {
            log::warn!("No {table} entry for {key:?}; using {default}");
            default
        }
    }
}

/// Base unit rates (USD) before regional and envelope factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRates {
    /// Per m³ of printed foundation.
    pub foundation: f64,
    /// Per m² of envelope wall.
    pub envelope: f64,
    /// Per m² of roof.
    pub roof: f64,
    /// Per m² of glazing.
    pub glazing: f64,
    /// Per m² of interior fit-out.
    pub finish: f64,
    /// Per core; multiplied by `systems_core_multiplier`.
    pub systems: f64,
    pub systems_core_multiplier: f64,
}

impl Default for MaterialRates {
    fn default() -> Self {
        Self {
            foundation: 75.0,
            envelope: 32.0,
            roof: 28.0,
            glazing: 55.0,
            finish: 40.0,
            systems: 45.0,
            systems_core_multiplier: 80.0,
        }
    }
}

/// Mass per unit quantity (kg) and carbon per kg (kg CO₂e) for the
/// non-envelope material lines. Envelope values are keyed by envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialMass {
    pub foundation_density: f64,
    pub foundation_carbon: f64,
    pub roof_density: f64,
    pub roof_carbon: f64,
    pub glazing_density: f64,
    pub glazing_carbon: f64,
    pub finish_density: f64,
    pub finish_carbon: f64,
    pub systems_density: f64,
    pub systems_carbon: f64,
}

impl Default for MaterialMass {
    fn default() -> Self {
        Self {
            foundation_density: 2400.0,
            foundation_carbon: 0.13,
            roof_density: 95.0,
            roof_carbon: 0.32,
            glazing_density: 30.0,
            glazing_carbon: 1.45,
            finish_density: 45.0,
            finish_carbon: 0.45,
            systems_density: 650.0,
            systems_carbon: 2.1,
        }
    }
}

/// Risk level weights for the aggregate risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    /// Score used when no climate data is available.
    pub pending: f64,
    /// Upper bound of the Low label.
    pub low_threshold: f64,
    /// Upper bound of the Medium label.
    pub medium_threshold: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            low: 0.18,
            medium: 0.48,
            high: 0.88,
            pending: 0.45,
            low_threshold: 0.33,
            medium_threshold: 0.66,
        }
    }
}

/// Financial rollup rates, as fractions of material cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRates {
    pub soft_costs: f64,
    pub insurance_min: f64,
    pub insurance_max: f64,
    pub contingency: f64,
    pub maintenance: f64,
    /// Maximum sale-value discount at risk score 1.
    pub resilience_discount: f64,
    /// Extra schedule days at risk score 1.
    pub resilience_buffer_days: f64,
}

impl Default for FinancialRates {
    fn default() -> Self {
        Self {
            soft_costs: 0.35,
            insurance_min: 0.02,
            insurance_max: 0.10,
            contingency: 0.10,
            maintenance: 0.12,
            resilience_discount: 0.12,
            resilience_buffer_days: 5.0,
        }
    }
}

/// Optimisation score weights and normalisation references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub cost: f64,
    pub energy: f64,
    pub carbon: f64,
    pub resilience: f64,
    /// Cap on budget / cost before normalisation.
    pub cost_ratio_cap: f64,
    /// kWh/sqft·yr at which energy performance reaches zero.
    pub energy_reference: f64,
    /// kg CO₂e/sqft at which carbon profile reaches zero.
    pub carbon_reference: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            cost: 0.35,
            energy: 0.25,
            carbon: 0.20,
            resilience: 0.20,
            cost_ratio_cap: 1.2,
            energy_reference: 45.0,
            carbon_reference: 65.0,
        }
    }
}

/// Every constant the analytics pipeline consults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsTables {
    // Per-room baselines
    pub category_cost: HashMap<RoomCategory, f64>,
    pub category_energy: HashMap<RoomCategory, f64>,
    pub category_carbon: HashMap<RoomCategory, f64>,
    pub sustainability_cost_factor: HashMap<Sustainability, f64>,
    pub palette_cost_factor: HashMap<Palette, f64>,
    pub room_envelope_carbon_factor: HashMap<Envelope, f64>,
    pub room_energy_system_factor: HashMap<EnergySystem, f64>,
    pub orientation_comfort: HashMap<Orientation, f64>,

    // Whole-design factors
    pub envelope_cost_factor: HashMap<Envelope, f64>,
    pub energy_system_multiplier: HashMap<EnergySystem, f64>,
    /// kWh/sqft·yr before system and climate adjustments.
    pub baseline_energy_intensity: f64,
    /// Keyed by lowercase ISO country code; keys are lowercased on load.
    #[serde(deserialize_with = "lowercase_keys")]
    pub country_cost_factor: HashMap<String, f64>,
    pub default_country_cost_factor: f64,
    /// USD per sqft.
    pub base_sale_price: f64,

    // Materials
    pub material_rates: MaterialRates,
    pub material_mass: MaterialMass,
    /// Envelope wall mass, kg per m².
    pub envelope_density: HashMap<Envelope, f64>,
    /// Envelope carbon, kg CO₂e per kg.
    pub envelope_carbon: HashMap<Envelope, f64>,
    pub r_value: HashMap<Envelope, f64>,

    // Fabrication, risk, money, scoring
    /// sqft per hour.
    pub fabricator_speed: HashMap<Fabricator, f64>,
    pub risk: RiskWeights,
    pub financial: FinancialRates,
    pub score: ScoreWeights,
}

impl Default for AnalyticsTables {
    fn default() -> Self {
        use EnergySystem as Es;
        use RoomCategory as C;

        let by_category = |v: [f64; 7]| -> HashMap<RoomCategory, f64> {
            [C::Living, C::Sleeping, C::Culinary, C::Wellness, C::Flex, C::Utility, C::Service]
                .into_iter()
                .zip(v)
                .collect()
        };
        let by_envelope = |v: [f64; 4]| -> HashMap<Envelope, f64> {
            Envelope::ALL.into_iter().zip(v).collect()
        };
        let by_energy = |v: [f64; 4]| -> HashMap<EnergySystem, f64> {
            [Es::Hybrid, Es::Geothermal, Es::Grid, Es::Microgrid]
                .into_iter()
                .zip(v)
                .collect()
        };

        Self {
            category_cost: by_category([215.0, 185.0, 255.0, 230.0, 198.0, 160.0, 150.0]),
            category_energy: by_category([12.0, 8.0, 15.0, 11.0, 9.0, 7.0, 6.0]),
            category_carbon: by_category([32.0, 26.0, 35.0, 28.0, 27.0, 24.0, 20.0]),
            sustainability_cost_factor: Sustainability::ALL
                .into_iter()
                .zip([1.0, 1.08, 1.05, 1.22])
                .collect(),
            palette_cost_factor: Palette::ALL
                .into_iter()
                .zip([0.95, 1.02, 1.08, 1.14])
                .collect(),
            room_envelope_carbon_factor: by_envelope([1.0, 0.86, 0.74, 0.92]),
            room_energy_system_factor: by_energy([0.88, 0.78, 1.0, 0.82]),
            orientation_comfort: Orientation::ALL
                .into_iter()
                .zip([0.0, 3.0, 2.0, -2.0])
                .collect(),

            envelope_cost_factor: by_envelope([1.0, 0.85, 0.72, 0.92]),
            energy_system_multiplier: by_energy([0.82, 0.65, 1.05, 0.78]),
            baseline_energy_intensity: 14.0,
            country_cost_factor: [
                ("us", 1.28),
                ("ca", 1.12),
                ("gb", 1.45),
                ("au", 1.25),
                ("de", 1.32),
                ("fr", 1.3),
                ("jp", 1.38),
                ("sg", 1.65),
            ]
            .into_iter()
            .map(|(code, factor)| (code.to_string(), factor))
            .collect(),
            default_country_cost_factor: 1.1,
            base_sale_price: 240.0,

            material_rates: MaterialRates::default(),
            material_mass: MaterialMass::default(),
            envelope_density: by_envelope([480.0, 330.0, 400.0, 260.0]),
            envelope_carbon: by_envelope([0.108, 0.103, 0.07, 0.154]),
            r_value: by_envelope([28.0, 32.0, 30.0, 26.0]),

            fabricator_speed: Fabricator::ALL
                .into_iter()
                .zip([48.0, 55.0, 38.0])
                .collect(),
            risk: RiskWeights::default(),
            financial: FinancialRates::default(),
            score: ScoreWeights::default(),
        }
    }
}

impl AnalyticsTables {
    /// Parse tables from JSON; absent sections keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TablesError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tables from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TablesError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Regional construction cost factor for an ISO country code.
    pub fn country_factor(&self, country_code: Option<&str>) -> f64 {
        match country_code {
            Some(code) => lookup(
                &self.country_cost_factor,
                &code.to_lowercase(),
                self.default_country_cost_factor,
                "country cost factor",
            ),
            None => self.default_country_cost_factor,
        }
    }
}

fn lowercase_keys<'de, D>(deserializer: D) -> Result<HashMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, f64>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(code, factor)| (code.to_lowercase(), factor))
        .collect())
}

/// Errors that can occur while loading tables or presets
#[derive(Debug)]
pub enum TablesError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for TablesError {
    fn from(e: std::io::Error) -> Self {
        TablesError::Io(e)
    }
}

impl From<serde_json::Error> for TablesError {
    fn from(e: serde_json::Error) -> Self {
        TablesError::Json(e)
    }
}

impl std::fmt::Display for TablesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TablesError::Io(e) => write!(f, "IO error: {}", e),
            TablesError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for TablesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TablesError::Io(e) => Some(e),
            TablesError::Json(e) => Some(e),
        }
    }
}
