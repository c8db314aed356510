//! Financial rollup and fabrication timeline.
//!
//! Both stages scale with the climate risk score: insurance moves from
//! the minimum to the maximum premium rate as risk rises, and the
//! schedule gains a resilience buffer.

use serde::{Deserialize, Serialize};

use crate::format::{format_usd, Insight};
use crate::params::{Fabricator, SQFT_PER_SQM};
use crate::tables::{lookup, AnalyticsTables, FALLBACK_FABRICATOR_SPEED};

// ============================================================================
// FINANCIALS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProjection {
    pub material_cost: f64,
    pub soft_costs: f64,
    pub insurance_premium: f64,
    pub contingency: f64,
    pub maintenance: f64,
    /// Sum of the five cost lines above.
    pub total_project_cost: f64,
    pub sale_value: f64,
    /// Sale value minus total project cost.
    pub net_margin: f64,
}

impl FinancialProjection {
    pub fn insights(&self) -> Vec<Insight> {
        vec![
            Insight::new("Total Material Cost", format_usd(self.material_cost)),
            Insight::new("Soft Costs + Labor", format_usd(self.soft_costs)),
            Insight::new("Climate Insurance", format_usd(self.insurance_premium)),
            Insight::new("Contingency", format_usd(self.contingency)),
            Insight::new("Lifecycle Maintenance (10yr)", format_usd(self.maintenance)),
            Insight::new("Total Project Cost", format_usd(self.total_project_cost)),
            Insight::new("Projected Sale", format_usd(self.sale_value)),
            Insight::new("Net Margin", format_usd(self.net_margin)),
        ]
    }
}

/// Insurance premium rate, interpolated by risk score.
pub fn insurance_rate(risk_score: f64, tables: &AnalyticsTables) -> f64 {
    let f = &tables.financial;
    f.insurance_min + (f.insurance_max - f.insurance_min) * risk_score.clamp(0.0, 1.0)
}

pub fn build_financials(
    material_cost: f64,
    sale_value: f64,
    risk_score: f64,
    tables: &AnalyticsTables,
) -> FinancialProjection {
    let f = &tables.financial;
    let soft_costs = material_cost * f.soft_costs;
    let insurance_premium = material_cost * insurance_rate(risk_score, tables);
    let contingency = material_cost * f.contingency;
    let maintenance = material_cost * f.maintenance;
    let total_project_cost =
        material_cost + soft_costs + insurance_premium + contingency + maintenance;

    FinancialProjection {
        material_cost,
        soft_costs,
        insurance_premium,
        contingency,
        maintenance,
        total_project_cost,
        sale_value,
        net_margin: sale_value - total_project_cost,
    }
}

// ============================================================================
// TIMELINE
// ============================================================================

/// Fixed mobilisation/handover days added to every schedule.
pub const BASE_SCHEDULE_DAYS: f64 = 6.0;
/// Printer shifts per day.
pub const PRINT_HOURS_PER_DAY: f64 = 12.0;
/// Post-processing days per storey.
pub const FINISHING_DAYS_PER_FLOOR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub fabricator: Fabricator,
    pub print_hours: f64,
    pub finishing_days: f64,
    /// Systems fit-out labour.
    pub fit_out_crew_hours: f64,
    pub resilience_buffer_days: f64,
    pub total_days: u32,
}

impl Timeline {
    pub fn insights(&self) -> Vec<Insight> {
        vec![
            Insight::new("Print Duration", format!("{:.1} hrs", self.print_hours)),
            Insight::new("Post-Processing", format!("{:.1} days", self.finishing_days)),
            Insight::new(
                "Systems Fit-Out",
                format!("{:.1} crew hrs", self.fit_out_crew_hours),
            ),
            Insight::new(
                "Resilience Buffer",
                format!("{:.1} days", self.resilience_buffer_days),
            ),
            Insight::new(
                "Total Schedule",
                format!("{} days ({})", self.total_days, self.fabricator.label()),
            ),
        ]
    }
}

/// Printer hours for a gross floor area in sqft (two passes).
pub fn print_hours(area_sqft: f64, fabricator: Fabricator, tables: &AnalyticsTables) -> f64 {
    let speed = lookup(
        &tables.fabricator_speed,
        &fabricator,
        FALLBACK_FABRICATOR_SPEED,
        "fabricator speed",
    );
    area_sqft / speed.max(f64::EPSILON) * 2.0
}

pub fn build_timeline(
    floor_area: f64,
    floors: u32,
    fabricator: Fabricator,
    risk_score: f64,
    tables: &AnalyticsTables,
) -> Timeline {
    let print_hours = print_hours(floor_area * SQFT_PER_SQM, fabricator, tables);
    let finishing_days = floors as f64 * FINISHING_DAYS_PER_FLOOR;
    let resilience_buffer_days =
        tables.financial.resilience_buffer_days * risk_score.clamp(0.0, 1.0);
    let total_days = (print_hours / PRINT_HOURS_PER_DAY
        + finishing_days
        + BASE_SCHEDULE_DAYS
        + resilience_buffer_days)
        .ceil()
        .max(0.0) as u32;

    Timeline {
        fabricator,
        print_hours,
        finishing_days,
        fit_out_crew_hours: floor_area * 0.3,
        resilience_buffer_days,
        total_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollup_adds_up() {
        let tables = AnalyticsTables::default();
        let f = build_financials(100_000.0, 200_000.0, 0.0, &tables);
        assert!((f.soft_costs - 35_000.0).abs() < 1e-6);
        assert!((f.insurance_premium - 2_000.0).abs() < 1e-6);
        assert!((f.contingency - 10_000.0).abs() < 1e-6);
        assert!((f.maintenance - 12_000.0).abs() < 1e-6);
        assert!((f.total_project_cost - 159_000.0).abs() < 1e-6);
        assert!((f.net_margin - 41_000.0).abs() < 1e-6);
    }

    #[test]
    fn insurance_scales_with_risk() {
        let tables = AnalyticsTables::default();
        assert!((insurance_rate(0.0, &tables) - 0.02).abs() < 1e-12);
        assert!((insurance_rate(0.5, &tables) - 0.06).abs() < 1e-12);
        assert!((insurance_rate(1.0, &tables) - 0.10).abs() < 1e-12);
        assert!((insurance_rate(7.0, &tables) - 0.10).abs() < 1e-12);
    }

    #[test]
    fn negative_margin_possible() {
        let tables = AnalyticsTables::default();
        let f = build_financials(100_000.0, 50_000.0, 1.0, &tables);
        assert!(f.net_margin < 0.0);
        assert!(f.insights()[7].value.starts_with("-$"));
    }

    #[test]
    fn fabricator_speeds_differ() {
        let tables = AnalyticsTables::default();
        let gantry = print_hours(960.0, Fabricator::Gantry, &tables);
        let arm = print_hours(960.0, Fabricator::Arm, &tables);
        let swarm = print_hours(960.0, Fabricator::Swarm, &tables);
        assert!((gantry - 40.0).abs() < 1e-9);
        assert!(arm < gantry && gantry < swarm);
    }

    #[test]
    fn timeline_total_days() {
        let tables = AnalyticsTables::default();
        // 60 m² → 645.834 sqft / 48 × 2 = 26.91 h → 2.24 days
        let t = build_timeline(60.0, 1, Fabricator::Gantry, 0.0, &tables);
        assert!((t.print_hours - 645.834 / 24.0).abs() < 1e-9);
        assert_eq!(t.finishing_days, 1.5);
        assert_eq!(t.total_days, 10); // ceil(2.24 + 1.5 + 6)
    }

    #[test]
    fn risk_adds_buffer() {
        let tables = AnalyticsTables::default();
        let calm = build_timeline(60.0, 1, Fabricator::Gantry, 0.0, &tables);
        let risky = build_timeline(60.0, 1, Fabricator::Gantry, 1.0, &tables);
        assert_eq!(risky.resilience_buffer_days, 5.0);
        assert_eq!(risky.total_days, calm.total_days + 5);
    }

    #[test]
    fn zero_area_timeline() {
        let tables = AnalyticsTables::default();
        let t = build_timeline(0.0, 0, Fabricator::Swarm, 0.0, &tables);
        assert_eq!(t.total_days, 6);
        assert_eq!(t.insights().len(), 5);
    }
}
