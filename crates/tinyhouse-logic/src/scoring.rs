//! Composite optimisation score used to rank sweep candidates.
//!
//! Four sub-scores, each clamped to [0, 1]:
//!
//! | Sub-score | Formula | Weight |
//! |-----------|---------|--------|
//! | Cost efficiency | min(budget / cost, 1.2) / 1.2 | 0.35 |
//! | Energy performance | 1 − kWh/sqft·yr ÷ 45 | 0.25 |
//! | Carbon profile | 1 − kg CO₂e/sqft ÷ 65 | 0.20 |
//! | Resilience | 1 − risk score | 0.20 |
//!
//! The weighted sum is scaled to 0–100.

use serde::{Deserialize, Serialize};

use crate::format::Insight;
use crate::tables::ScoreWeights;

/// Raw metrics the score is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub budget: f64,
    pub build_cost: f64,
    pub energy_per_sqft: f64,
    pub carbon_per_sqft: f64,
    pub risk_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationScore {
    /// 0–100.
    pub score: f64,
    pub cost_efficiency: f64,
    pub energy_performance: f64,
    pub carbon_profile: f64,
    pub resilience: f64,
}

impl OptimizationScore {
    pub fn insights(&self) -> Vec<Insight> {
        let pct = |v: f64| format!("{:.0}%", v * 100.0);
        vec![
            Insight::new("Optimization Score", format!("{:.1}/100", self.score)),
            Insight::new("Cost Efficiency", pct(self.cost_efficiency)),
            Insight::new("Energy Performance", pct(self.energy_performance)),
            Insight::new("Carbon Profile", pct(self.carbon_profile)),
            Insight::new("Resilience", pct(self.resilience)),
        ]
    }
}

/// Clamp to [0, 1], mapping NaN to 0.
fn unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

pub fn compute_score(inputs: &ScoreInputs, weights: &ScoreWeights) -> OptimizationScore {
    let cap = weights.cost_ratio_cap.max(f64::EPSILON);
    let cost_ratio = (inputs.budget.max(0.0) / inputs.build_cost.max(1.0)).min(cap);
    let cost_efficiency = unit(cost_ratio / cap);
    let energy_performance =
        unit(1.0 - inputs.energy_per_sqft / weights.energy_reference.max(f64::EPSILON));
    let carbon_profile =
        unit(1.0 - inputs.carbon_per_sqft / weights.carbon_reference.max(f64::EPSILON));
    let resilience = unit(1.0 - inputs.risk_score);

    let weighted = weights.cost * cost_efficiency
        + weights.energy * energy_performance
        + weights.carbon * carbon_profile
        + weights.resilience * resilience;

    OptimizationScore {
        score: (unit(weighted) * 100.0).clamp(0.0, 100.0),
        cost_efficiency,
        energy_performance,
        carbon_profile,
        resilience,
    }
}
