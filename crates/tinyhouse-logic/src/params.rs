//! Design parameters, the caller-facing input to layout generation.
//!
//! The parameter set mirrors the studio's configuration panel: target
//! area, storeys, bedroom/bathroom counts and the material/system
//! choices that drive the analytics tables. Validation is advisory;
//! [`generate_layout`](crate::layout::generate_layout) accepts any
//! parameter set and produces degenerate geometry for nonsense input
//! rather than failing.
//!
//! ```
//! use tinyhouse_logic::params::{validate_params, DesignParameters};
//!
//! let params = DesignParameters::default();
//! assert!(validate_params(&params).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::site::Environment;

/// Square feet per square metre.
pub const SQFT_PER_SQM: f64 = 10.7639;

// ============================================================================
// CHOICE ENUMS
// ============================================================================

/// Wall/envelope build-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Envelope {
    Standard,
    Hempcrete,
    Recycled,
    MassTimber,
}

/// Primary energy plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnergySystem {
    Hybrid,
    Geothermal,
    Grid,
    Microgrid,
}

/// Water supply strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaterStrategy {
    Rainwater,
    Municipal,
    Offgrid,
}

/// Printing rig used to fabricate the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fabricator {
    Gantry,
    Arm,
    Swarm,
}

/// Sustainability tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sustainability {
    Balanced,
    Carbon,
    Energy,
    Luxury,
}

/// Interior aesthetic palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Palette {
    Minimal,
    Industrial,
    Organic,
    Futuristic,
}

/// Site orientation of the main glazing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    Balanced,
    Southern,
    Eastern,
    Western,
}

impl Envelope {
    pub const ALL: [Envelope; 4] = [
        Self::Standard,
        Self::Hempcrete,
        Self::Recycled,
        Self::MassTimber,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Hempcrete => "hempcrete",
            Self::Recycled => "recycled",
            Self::MassTimber => "mass-timber",
        }
    }
}

impl EnergySystem {
    pub const ALL: [EnergySystem; 4] = [
        Self::Hybrid,
        Self::Geothermal,
        Self::Grid,
        Self::Microgrid,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hybrid => "hybrid",
            Self::Geothermal => "geothermal",
            Self::Grid => "grid",
            Self::Microgrid => "microgrid",
        }
    }
}

impl WaterStrategy {
    pub const ALL: [WaterStrategy; 3] = [Self::Rainwater, Self::Municipal, Self::Offgrid];
}

impl Fabricator {
    pub const ALL: [Fabricator; 3] = [Self::Gantry, Self::Arm, Self::Swarm];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Gantry => "gantry",
            Self::Arm => "arm",
            Self::Swarm => "swarm",
        }
    }
}

impl Sustainability {
    pub const ALL: [Sustainability; 4] = [
        Self::Balanced,
        Self::Carbon,
        Self::Energy,
        Self::Luxury,
    ];
}

impl Palette {
    pub const ALL: [Palette; 4] = [
        Self::Minimal,
        Self::Industrial,
        Self::Organic,
        Self::Futuristic,
    ];
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Self::Balanced,
        Self::Southern,
        Self::Eastern,
        Self::Western,
    ];
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// Immutable input to one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignParameters {
    /// Target footprint area in square metres.
    pub area: f64,
    pub floors: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub sustainability: Sustainability,
    pub envelope: Envelope,
    pub energy_system: EnergySystem,
    pub water_strategy: WaterStrategy,
    pub fabricator: Fabricator,
    pub palette: Palette,
    /// Budget ceiling in USD.
    pub budget: f64,
    pub orientation: Orientation,
    /// Manual environment override (`None` = derive from location).
    #[serde(default)]
    pub environment: Option<Environment>,
}

impl Default for DesignParameters {
    fn default() -> Self {
        Self {
            area: 60.0,
            floors: 1,
            bedrooms: 2,
            bathrooms: 1,
            sustainability: Sustainability::Balanced,
            envelope: Envelope::Standard,
            energy_system: EnergySystem::Grid,
            water_strategy: WaterStrategy::Municipal,
            fabricator: Fabricator::Gantry,
            palette: Palette::Minimal,
            budget: 180_000.0,
            orientation: Orientation::Balanced,
            environment: None,
        }
    }
}

impl DesignParameters {
    /// Target area in square feet.
    pub fn area_sqft(&self) -> f64 {
        self.area * SQFT_PER_SQM
    }
}

/// Parameter validation problem.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// Area is zero, negative or not a number.
    NonPositiveArea(f64),
    /// Area exceeds what the row packer is tuned for.
    AreaTooLarge(f64),
    /// At least one floor is required.
    NoFloors,
    TooManyFloors(u32),
    /// Bedrooms + bathrooms exceed the catalog the packer can place.
    TooManyRooms(u32),
    /// Budget is negative or not finite.
    InvalidBudget(f64),
}

pub const MAX_AREA_SQM: f64 = 400.0;
pub const MAX_FLOORS: u32 = 4;
pub const MAX_WET_AND_SLEEPING_ROOMS: u32 = 12;

/// Validate a parameter set, returning every problem found.
pub fn validate_params(params: &DesignParameters) -> Vec<ParamError> {
    let mut errors = Vec::new();

    if params.area.is_nan() || params.area <= 0.0 {
        errors.push(ParamError::NonPositiveArea(params.area));
    } else if params.area > MAX_AREA_SQM {
        errors.push(ParamError::AreaTooLarge(params.area));
    }

    if params.floors == 0 {
        errors.push(ParamError::NoFloors);
    } else if params.floors > MAX_FLOORS {
        errors.push(ParamError::TooManyFloors(params.floors));
    }

    let rooms = params.bedrooms.saturating_add(params.bathrooms);
    if rooms > MAX_WET_AND_SLEEPING_ROOMS {
        errors.push(ParamError::TooManyRooms(rooms));
    }

    if !params.budget.is_finite() || params.budget < 0.0 {
        errors.push(ParamError::InvalidBudget(params.budget));
    }

    errors
}

/// Produce a valid random parameter set from a seed.
pub fn randomize_params(seed: u64) -> DesignParameters {
    let hash = |s: u64, i: u64| -> u64 {
        let mut h = s.wrapping_mul(6364136223846793005).wrapping_add(i);
        h ^= h >> 33;
        h = h.wrapping_mul(0xff51afd7ed558ccd);
        h ^= h >> 33;
        h
    };
    let pick = |i: u64, len: usize| (hash(seed, i) % len as u64) as usize;

    DesignParameters {
        area: 25.0 + (hash(seed, 0) % 126) as f64, // 25–150 m²
        floors: 1 + (hash(seed, 1) % 2) as u32,
        bedrooms: (hash(seed, 2) % 4) as u32,
        bathrooms: 1 + (hash(seed, 3) % 2) as u32,
        sustainability: Sustainability::ALL[pick(4, 4)],
        envelope: Envelope::ALL[pick(5, 4)],
        energy_system: EnergySystem::ALL[pick(6, 4)],
        water_strategy: WaterStrategy::ALL[pick(7, 3)],
        fabricator: Fabricator::ALL[pick(8, 3)],
        palette: Palette::ALL[pick(9, 4)],
        budget: 80_000.0 + (hash(seed, 10) % 170) as f64 * 1_000.0,
        orientation: Orientation::ALL[pick(11, 4)],
        environment: None,
    }
}
