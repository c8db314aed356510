//! Market value estimate and local build pressure.

use serde::{Deserialize, Serialize};

use crate::site::Location;
use crate::tables::AnalyticsTables;

/// Local demand bucket derived from population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketPressure {
    HighDemand,
    Emerging,
    Niche,
}

impl MarketPressure {
    /// > 1.5M "High Demand", > 400K "Emerging", otherwise (or unknown) "Niche".
    pub fn from_population(population: Option<u64>) -> Self {
        match population {
            Some(p) if p > 1_500_000 => Self::HighDemand,
            Some(p) if p > 400_000 => Self::Emerging,
            _ => Self::Niche,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::HighDemand => "High Demand",
            Self::Emerging => "Emerging",
            Self::Niche => "Niche",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEstimate {
    /// USD.
    pub sale_value: f64,
    /// Regional construction cost factor.
    pub cost_factor: f64,
    /// Multiplier in [1 − discount, 1] applied for climate exposure.
    pub resilience_modifier: f64,
    pub pressure: MarketPressure,
}

/// Estimate sale value: area × base price × regional factor × resilience.
pub fn estimate_market_value(
    area_sqft: f64,
    location: Option<&Location>,
    risk_score: f64,
    tables: &AnalyticsTables,
) -> MarketEstimate {
    let cost_factor =
        tables.country_factor(location.and_then(|l| l.country_code.as_deref()));
    let resilience_modifier =
        1.0 - tables.financial.resilience_discount * risk_score.clamp(0.0, 1.0);
    MarketEstimate {
        sale_value: area_sqft * tables.base_sale_price * cost_factor * resilience_modifier,
        cost_factor,
        resilience_modifier,
        pressure: MarketPressure::from_population(location.and_then(|l| l.population)),
    }
}

/// Return on material cost, in percent.
pub fn projected_roi(sale_value: f64, material_cost: f64) -> f64 {
    sale_value / material_cost.max(1.0) * 100.0 - 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(code: &str, population: u64) -> Location {
        Location {
            country_code: Some(code.into()),
            population: Some(population),
            latitude: 0.0,
            longitude: 0.0,
            elevation: 0.0,
        }
    }

    #[test]
    fn pressure_buckets() {
        assert_eq!(MarketPressure::from_population(None), MarketPressure::Niche);
        assert_eq!(MarketPressure::from_population(Some(400_000)), MarketPressure::Niche);
        assert_eq!(MarketPressure::from_population(Some(400_001)), MarketPressure::Emerging);
        assert_eq!(MarketPressure::from_population(Some(1_500_000)), MarketPressure::Emerging);
        assert_eq!(MarketPressure::from_population(Some(1_500_001)), MarketPressure::HighDemand);
    }

    #[test]
    fn no_location_uses_default_factor() {
        let tables = AnalyticsTables::default();
        let m = estimate_market_value(1000.0, None, 0.0, &tables);
        assert_eq!(m.cost_factor, 1.1);
        assert!((m.sale_value - 1000.0 * 240.0 * 1.1).abs() < 1e-6);
        assert_eq!(m.pressure, MarketPressure::Niche);
    }

    #[test]
    fn country_and_population_apply() {
        let tables = AnalyticsTables::default();
        let loc = city("JP", 2_000_000);
        let m = estimate_market_value(500.0, Some(&loc), 0.0, &tables);
        assert_eq!(m.cost_factor, 1.38);
        assert_eq!(m.pressure, MarketPressure::HighDemand);
    }

    #[test]
    fn risk_discounts_up_to_twelve_percent() {
        let tables = AnalyticsTables::default();
        let safe = estimate_market_value(1000.0, None, 0.0, &tables);
        let risky = estimate_market_value(1000.0, None, 1.0, &tables);
        assert!((risky.sale_value / safe.sale_value - 0.88).abs() < 1e-12);
        let beyond = estimate_market_value(1000.0, None, 3.0, &tables);
        assert_eq!(beyond.sale_value, risky.sale_value);
    }

    #[test]
    fn roi_guards_zero_cost() {
        assert!((projected_roi(150.0, 100.0) - 50.0).abs() < 1e-12);
        assert!(projected_roi(10.0, 0.0).is_finite());
    }
}
