//! Full analytics record for one design.
//!
//! [`compute_analytics`] chains every derivation stage over a design and
//! an optional site context. Each stage is a pure function in its own
//! module; this one only wires their inputs together:
//!
//! 1. Per-room performance → room cost, room energy, weighted comfort
//! 2. Climate risk (needs the site environment for coastal exposure)
//! 3. Market value (needs the risk score)
//! 4. Material costs (needs the regional cost factor from the market)
//! 5. Energy, per-sqft metrics, timeline, financials
//! 6. Optimisation score
//!
//! Missing site data never fails: climate falls back to "Data Pending",
//! location to the default cost factor and "Niche" pressure.
//!
//! ```
//! use tinyhouse_logic::analytics::compute_analytics;
//! use tinyhouse_logic::layout::generate_layout;
//! use tinyhouse_logic::params::DesignParameters;
//! use tinyhouse_logic::tables::AnalyticsTables;
//!
//! let design = generate_layout(42, &DesignParameters::default());
//! let analytics = compute_analytics(&design, None, &AnalyticsTables::default());
//! assert_eq!(analytics.market.pressure.label(), "Niche");
//! assert!(analytics.risk.is_pending());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::RoomCategory;
use crate::climate::{assess_climate, climate_strategies, RiskAssessment};
use crate::finance::{build_financials, build_timeline, FinancialProjection, Timeline};
use crate::format::{format_count, format_usd, Insight};
use crate::layout::Design;
use crate::market::{estimate_market_value, projected_roi, MarketEstimate};
use crate::materials::{build_material_costs, MaterialCosts};
use crate::params::{EnergySystem, Palette, WaterStrategy, SQFT_PER_SQM};
use crate::performance::{evaluate_room, weighted_comfort, RoomPerformance};
use crate::scoring::{compute_score, OptimizationScore, ScoreInputs};
use crate::site::{environment_from_location, Climate, Environment, SiteContext};
use crate::tables::{lookup, AnalyticsTables, FALLBACK_R_VALUE};

/// Degree days at which the climate energy factor is neutral.
pub const NEUTRAL_DEGREE_DAYS: f64 = 3000.0;

/// Everything derived from one design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    /// Gross floor area, m².
    pub floor_area: f64,
    pub area_sqft: f64,
    pub rooms: Vec<RoomPerformance>,
    /// Room area per category, m².
    pub category_areas: BTreeMap<RoomCategory, f64>,
    pub comfort_score: f64,
    /// kg CO₂e.
    pub embodied_carbon: f64,
    /// kWh per year.
    pub energy_use: f64,
    pub materials: MaterialCosts,
    /// Σ room cost or material cost, whichever is larger. USD.
    pub build_cost: f64,
    pub cost_per_sqft: f64,
    pub carbon_per_sqft: f64,
    pub energy_per_sqft: f64,
    pub environment: Environment,
    pub market: MarketEstimate,
    /// Percent return on material cost.
    pub roi: f64,
    pub risk: RiskAssessment,
    pub timeline: Timeline,
    pub financial: FinancialProjection,
    pub systems: Vec<Insight>,
    pub envelope: Vec<Insight>,
    pub strategies: Vec<Insight>,
    pub highlights: Vec<String>,
    pub program_profile: String,
    pub optimization: OptimizationScore,
}

impl Analytics {
    /// Composite 0–100 score used for ranking.
    pub fn score(&self) -> f64 {
        self.optimization.score
    }

    pub fn market_insights(&self) -> Vec<Insight> {
        vec![
            Insight::new("Est. Sale Value", format_usd(self.market.sale_value)),
            Insight::new("Projected ROI", format!("{:.1}%", self.roi)),
            Insight::new("Local Build Pressure", self.market.pressure.label()),
        ]
    }

    pub fn optimization_insights(&self) -> Vec<Insight> {
        let mut rows = vec![
            Insight::new("Total Build Cost", format_usd(self.build_cost)),
            Insight::new("Cost per Sqft", format_usd(self.cost_per_sqft)),
            Insight::new(
                "Energy Intensity",
                format!("{:.0} kWh/yr·sqft", self.energy_per_sqft),
            ),
            Insight::new("Comfort Index", format!("{:.0}/100", self.comfort_score)),
        ];
        rows.extend(self.optimization.insights());
        rows
    }
}

/// Climate adjustment to annual energy: `1 + (dd − 3000) / 12000`.
///
/// Neutral when the climate is unknown or reports zero degree days.
pub fn climate_energy_factor(climate: Option<&Climate>) -> f64 {
    match climate {
        Some(c) if c.degree_days > 0 => {
            1.0 + (c.degree_days as f64 - NEUTRAL_DEGREE_DAYS) / 12000.0
        }
        _ => 1.0,
    }
}

/// Compute every analytics stage for a design.
pub fn compute_analytics(
    design: &Design,
    site: Option<&SiteContext>,
    tables: &AnalyticsTables,
) -> Analytics {
    let params = &design.params;
    let climate = site.and_then(|s| s.climate.as_ref());
    let location = site.and_then(|s| s.location.as_ref());

    let floor_area = design.floor_area();
    let area_sqft = floor_area * SQFT_PER_SQM;

    // Rooms
    let rooms: Vec<RoomPerformance> = design
        .rooms
        .iter()
        .map(|room| evaluate_room(room, params, &design.features, tables))
        .filter(|perf| perf.total_cost.is_finite())
        .collect();
    let program_area: f64 = rooms.iter().map(|r| r.area_sqft).sum();
    let program_area = if program_area > 0.0 {
        program_area
    } else {
        area_sqft
    };
    let room_cost: f64 = rooms.iter().map(|r| r.total_cost).sum();
    let room_energy: f64 = rooms.iter().map(|r| r.energy_use).sum();
    let comfort_score = weighted_comfort(&rooms, program_area);

    // Risk, market, materials
    let environment = environment_from_location(location, params.environment);
    let risk = assess_climate(climate, environment == Environment::Coastal, &tables.risk);
    let market = estimate_market_value(area_sqft, location, risk.score, tables);
    let materials = build_material_costs(design, market.cost_factor, tables);
    let build_cost = if room_cost > 0.0 {
        room_cost.max(materials.total_cost)
    } else {
        materials.total_cost
    };

    // Energy
    let base_energy = if room_energy > 0.0 {
        room_energy
    } else {
        let multiplier = lookup(
            &tables.energy_system_multiplier,
            &params.energy_system,
            1.0,
            "energy system multiplier",
        );
        area_sqft * tables.baseline_energy_intensity * multiplier
    };
    let energy_use = base_energy * climate_energy_factor(climate);

    let embodied_carbon = materials.embodied_carbon_kg;
    let denom = area_sqft.max(1.0);
    let cost_per_sqft = build_cost / denom;
    let carbon_per_sqft = embodied_carbon / denom;
    let energy_per_sqft = energy_use / denom;

    let timeline = build_timeline(
        floor_area,
        design.floors,
        params.fabricator,
        risk.score,
        tables,
    );
    let financial = build_financials(materials.total_cost, market.sale_value, risk.score, tables);
    let roi = projected_roi(market.sale_value, materials.total_cost);

    let optimization = compute_score(
        &ScoreInputs {
            budget: params.budget,
            build_cost,
            energy_per_sqft,
            carbon_per_sqft,
            risk_score: risk.score,
        },
        &tables.score,
    );

    let highlights = vec![
        format!("{} roof", design.features.roof_type.label()),
        format!("{:.0}% glazing", design.features.glazing_ratio * 100.0),
        format!("{} energy hub", params.energy_system.label()),
        format!("{} envelope", params.envelope.label()),
        format!("{} USD/sqft build cost", format_count(cost_per_sqft)),
        format!("{:.0} comfort score", comfort_score),
    ];

    Analytics {
        floor_area,
        area_sqft,
        category_areas: design.category_areas(),
        comfort_score,
        embodied_carbon,
        energy_use,
        build_cost,
        cost_per_sqft,
        carbon_per_sqft,
        energy_per_sqft,
        environment,
        roi,
        systems: systems_lines(design, energy_use),
        envelope: envelope_lines(design, climate, tables),
        strategies: climate_strategies(&risk, design),
        highlights,
        program_profile: design.program_profile(),
        rooms,
        materials,
        market,
        risk,
        timeline,
        financial,
        optimization,
    }
}

fn systems_lines(design: &Design, energy_use: f64) -> Vec<Insight> {
    let params = &design.params;
    let heat_pump = if params.energy_system == EnergySystem::Geothermal {
        "Geothermal Heat Pump"
    } else {
        "Inverter Mini-Split"
    };
    let panel = if params.energy_system == EnergySystem::Microgrid {
        "Dual-fed microgrid"
    } else {
        "Smart load center"
    };
    let water = match params.water_strategy {
        WaterStrategy::Rainwater => "Rainwater cistern + UV purification",
        WaterStrategy::Municipal => "High-efficiency municipal hookup",
        WaterStrategy::Offgrid => "Atmospheric water generator",
    };

    vec![
        Insight::new(
            "HVAC",
            format!("{heat_pump} · {:.0} SEER", energy_use / 120.0),
        ),
        Insight::new(
            "Electrical",
            format!("{panel} with {:.0}kWh storage", energy_use / 365.0),
        ),
        Insight::new("Water", water),
        Insight::new("Automation", "AI habitat assistant + adaptive shading"),
    ]
}

fn envelope_lines(
    design: &Design,
    climate: Option<&Climate>,
    tables: &AnalyticsTables,
) -> Vec<Insight> {
    let r_value = lookup(
        &tables.r_value,
        &design.params.envelope,
        FALLBACK_R_VALUE,
        "r-value",
    );
    let vapor = if climate.is_some_and(|c| c.humidity > 70.0) {
        "Smart vapor control"
    } else {
        "Breathable membrane"
    };
    let acoustic = if design.params.palette == Palette::Industrial {
        "Reverberant acoustic panels"
    } else {
        "Acoustic felt baffles"
    };

    vec![
        Insight::new("R-Value", format!("R-{r_value:.0}")),
        Insight::new(
            "Air Tightness",
            format!("{:.1} ACH50", 1.5 * (design.features.glazing_ratio + 0.6)),
        ),
        Insight::new("Vapor Strategy", vapor),
        Insight::new("Acoustic", acoustic),
    ]
}
