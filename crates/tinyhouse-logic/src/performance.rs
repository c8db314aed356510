//! Per-room cost, energy, carbon and comfort baselines.

use serde::{Deserialize, Serialize};

use crate::category::RoomCategory;
use crate::layout::{Features, Room};
use crate::params::{DesignParameters, EnergySystem, Sustainability};
use crate::tables::{
    lookup, AnalyticsTables, FALLBACK_CATEGORY_CARBON, FALLBACK_CATEGORY_COST,
    FALLBACK_CATEGORY_ENERGY, FALLBACK_ROOM_ENERGY_SYSTEM, FALLBACK_SUSTAINABILITY_COST,
};

/// Comfort index bounds.
pub const COMFORT_MIN: f64 = 60.0;
pub const COMFORT_MAX: f64 = 96.0;

/// Comfort used when a design has no rooms to average over.
pub const DEFAULT_COMFORT: f64 = 72.0;

/// Derived performance of one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPerformance {
    pub room_id: String,
    pub category: RoomCategory,
    pub area_sqft: f64,
    /// USD per sqft.
    pub cost_per_sqft: f64,
    /// kWh per sqft·yr.
    pub energy_intensity: f64,
    /// kg CO₂e per sqft.
    pub carbon_intensity: f64,
    /// 60–96.
    pub comfort_score: f64,
    pub total_cost: f64,
    pub energy_use: f64,
    pub carbon_total: f64,
}

/// Evaluate one room against the per-category baselines.
pub fn evaluate_room(
    room: &Room,
    params: &DesignParameters,
    features: &Features,
    tables: &AnalyticsTables,
) -> RoomPerformance {
    let area_sqft = room.area_sqft();
    let category = room.category;

    let cost_per_sqft = lookup(&tables.category_cost, &category, FALLBACK_CATEGORY_COST, "category cost")
        * lookup(
            &tables.sustainability_cost_factor,
            &params.sustainability,
            FALLBACK_SUSTAINABILITY_COST,
            "sustainability cost",
        )
        * lookup(&tables.palette_cost_factor, &params.palette, 1.0, "palette cost");

    // Daylighting offsets up to 22% of the lighting/conditioning load.
    let energy_intensity = lookup(
        &tables.category_energy,
        &category,
        FALLBACK_CATEGORY_ENERGY,
        "category energy",
    ) * lookup(
        &tables.room_energy_system_factor,
        &params.energy_system,
        FALLBACK_ROOM_ENERGY_SYSTEM,
        "room energy system",
    ) * (1.0 - (features.glazing_ratio * 0.28).min(0.22));

    let carbon_tier = if params.sustainability == Sustainability::Carbon {
        0.92
    } else {
        1.0
    };
    let carbon_intensity = lookup(
        &tables.category_carbon,
        &category,
        FALLBACK_CATEGORY_CARBON,
        "category carbon",
    ) * lookup(
        &tables.room_envelope_carbon_factor,
        &params.envelope,
        1.0,
        "room envelope carbon",
    ) * carbon_tier;

    let comfort_score = comfort(room, params, features, tables);

    RoomPerformance {
        room_id: room.id.clone(),
        category,
        area_sqft,
        cost_per_sqft,
        energy_intensity,
        carbon_intensity,
        comfort_score,
        total_cost: cost_per_sqft * area_sqft,
        energy_use: energy_intensity * area_sqft,
        carbon_total: carbon_intensity * area_sqft,
    }
}

fn comfort(
    room: &Room,
    params: &DesignParameters,
    features: &Features,
    tables: &AnalyticsTables,
) -> f64 {
    let sleeping_bonus = if room.category == RoomCategory::Sleeping {
        3.0
    } else {
        0.0
    };
    let tier_bonus = match params.sustainability {
        Sustainability::Luxury => 6.0,
        Sustainability::Energy => 5.0,
        _ => 3.0,
    };
    let grid_penalty = if params.energy_system == EnergySystem::Grid {
        2.0
    } else {
        0.0
    };
    let base = 68.0 + features.glazing_ratio * 22.0 + sleeping_bonus;
    let orientation = lookup(
        &tables.orientation_comfort,
        &params.orientation,
        0.0,
        "orientation comfort",
    );
    (base + tier_bonus + orientation - grid_penalty).clamp(COMFORT_MIN, COMFORT_MAX)
}

/// Area-weighted mean comfort; [`DEFAULT_COMFORT`] for an empty list.
pub fn weighted_comfort(rooms: &[RoomPerformance], total_area_sqft: f64) -> f64 {
    if rooms.is_empty() {
        return DEFAULT_COMFORT;
    }
    let weighted: f64 = rooms.iter().map(|r| r.comfort_score * r.area_sqft).sum();
    weighted / total_area_sqft.max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Facade, Lighting, RoofType, Shading};
    use crate::params::{Orientation, Palette};

    fn room(category: RoomCategory, width: f64, length: f64) -> Room {
        Room {
            id: "module-0".into(),
            width,
            length,
            height: 3.0,
            center_x: 0.0,
            center_z: 0.0,
            room_type: category.name().into(),
            category,
        }
    }

    fn features(glazing_ratio: f64) -> Features {
        Features {
            glazing_ratio,
            roof_type: RoofType::Gable,
            facade: Facade::CeramicPanels,
            lighting: Lighting::SmartDimmable,
            shading: Shading::Electrochromic,
        }
    }

    #[test]
    fn kitchen_baseline() {
        let tables = AnalyticsTables::default();
        let params = DesignParameters::default(); // balanced, minimal, grid
        let perf = evaluate_room(&room(RoomCategory::Culinary, 3.0, 4.0), &params, &features(0.5), &tables);

        assert!((perf.area_sqft - 12.0 * 10.7639).abs() < 1e-9);
        assert!((perf.cost_per_sqft - 255.0 * 0.95).abs() < 1e-9);
        // 15 × 1.0 × (1 − 0.14)
        assert!((perf.energy_intensity - 12.9).abs() < 1e-9);
        assert!((perf.carbon_intensity - 35.0).abs() < 1e-9);
        assert!((perf.total_cost - perf.cost_per_sqft * perf.area_sqft).abs() < 1e-9);
    }

    #[test]
    fn daylight_offset_capped() {
        let tables = AnalyticsTables::default();
        let params = DesignParameters::default();
        let perf = evaluate_room(&room(RoomCategory::Flex, 2.0, 2.0), &params, &features(0.9), &tables);
        // min(0.22, 0.9 × 0.28) = 0.22
        assert!((perf.energy_intensity - 9.0 * 0.78).abs() < 1e-9);
    }

    #[test]
    fn carbon_tier_discount() {
        let tables = AnalyticsTables::default();
        let params = DesignParameters {
            sustainability: Sustainability::Carbon,
            ..Default::default()
        };
        let perf = evaluate_room(&room(RoomCategory::Living, 3.0, 3.0), &params, &features(0.3), &tables);
        assert!((perf.carbon_intensity - 32.0 * 0.92).abs() < 1e-9);
    }

    #[test]
    fn comfort_clamped() {
        let tables = AnalyticsTables::default();
        let params = DesignParameters {
            sustainability: Sustainability::Luxury,
            orientation: Orientation::Southern,
            energy_system: EnergySystem::Geothermal,
            palette: Palette::Futuristic,
            ..Default::default()
        };
        let perf = evaluate_room(&room(RoomCategory::Sleeping, 3.0, 3.0), &params, &features(0.6), &tables);
        // 68 + 13.2 + 3 + 6 + 3 = 93.2
        assert!((perf.comfort_score - 93.2).abs() < 1e-9);

        for g in [0.0, 0.25, 0.6, 5.0] {
            let p = evaluate_room(&room(RoomCategory::Utility, 2.0, 2.0), &params, &features(g), &tables);
            assert!((COMFORT_MIN..=COMFORT_MAX).contains(&p.comfort_score));
        }
    }

    #[test]
    fn missing_table_entries_use_fallbacks() {
        let mut tables = AnalyticsTables::default();
        tables.category_cost.clear();
        tables.sustainability_cost_factor.clear();
        tables.palette_cost_factor.clear();
        tables.category_energy.clear();
        tables.room_energy_system_factor.clear();
        let params = DesignParameters::default();
        let perf = evaluate_room(&room(RoomCategory::Flex, 1.0, 1.0), &params, &features(0.0), &tables);
        assert!((perf.cost_per_sqft - 200.0 * 1.05).abs() < 1e-9);
        assert!((perf.energy_intensity - 10.0 * 0.95).abs() < 1e-9);
    }

    #[test]
    fn weighted_comfort_defaults_when_empty() {
        assert_eq!(weighted_comfort(&[], 0.0), DEFAULT_COMFORT);
    }

    #[test]
    fn weighted_comfort_is_area_weighted() {
        let tables = AnalyticsTables::default();
        let params = DesignParameters::default();
        let a = evaluate_room(&room(RoomCategory::Sleeping, 1.0, 1.0), &params, &features(0.3), &tables);
        let b = evaluate_room(&room(RoomCategory::Utility, 3.0, 3.0), &params, &features(0.3), &tables);
        let total = a.area_sqft + b.area_sqft;
        let mean = weighted_comfort(&[a.clone(), b.clone()], total);
        let expected = (a.comfort_score * a.area_sqft + b.comfort_score * b.area_sqft) / total;
        assert!((mean - expected).abs() < 1e-9);
    }
}
