//! Bill of materials: quantity, cost, mass and embodied carbon per line.
//!
//! Six lines cover the printed shell and its fit-out. Quantities come
//! from the design geometry; unit costs are the base rate scaled by the
//! regional cost factor (and, for the envelope, the envelope factor).

use serde::{Deserialize, Serialize};

use crate::format::format_usd;
use crate::layout::Design;
use crate::tables::{lookup, AnalyticsTables};

/// Foundation slab depth, metres.
pub const FOUNDATION_DEPTH: f64 = 0.35;
/// Share of gross floor area that receives interior fit-out.
pub const FIT_OUT_SHARE: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    Foundation,
    Envelope,
    Roof,
    Glazing,
    InteriorFitOut,
    Systems,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 6] = [
        Self::Foundation,
        Self::Envelope,
        Self::Roof,
        Self::Glazing,
        Self::InteriorFitOut,
        Self::Systems,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Foundation => "3D Print Concrete",
            Self::Envelope => "Envelope Shell",
            Self::Roof => "Roof Assembly",
            Self::Glazing => "Glazing Package",
            Self::InteriorFitOut => "Interior Fit-Out",
            Self::Systems => "Systems Integration",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Foundation => "m³",
            Self::Systems => "cores",
            _ => "m²",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub kind: MaterialKind,
    pub quantity: f64,
    /// USD per unit.
    pub unit_cost: f64,
    /// USD.
    pub total: f64,
    pub mass_kg: f64,
    /// kg CO₂e.
    pub carbon_kg: f64,
}

impl MaterialLine {
    fn new(kind: MaterialKind, quantity: f64, unit_cost: f64, density: f64, carbon: f64) -> Self {
        let mass_kg = quantity * density;
        Self {
            kind,
            quantity,
            unit_cost,
            total: unit_cost * quantity,
            mass_kg,
            carbon_kg: mass_kg * carbon,
        }
    }

    /// "12.3 m³", "148 m²", "2 cores".
    pub fn quantity_label(&self) -> String {
        match self.kind {
            MaterialKind::Foundation => format!("{:.1} {}", self.quantity, self.kind.unit()),
            _ => format!("{:.0} {}", self.quantity, self.kind.unit()),
        }
    }

    /// Display unit cost, averaged over at least one unit.
    pub fn unit_cost_label(&self) -> String {
        format_usd(self.total / self.quantity.max(1.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCosts {
    pub lines: Vec<MaterialLine>,
    /// Σ unit cost × quantity, USD.
    pub total_cost: f64,
    pub total_mass_kg: f64,
    pub embodied_carbon_kg: f64,
}

impl MaterialCosts {
    pub fn line(&self, kind: MaterialKind) -> Option<&MaterialLine> {
        self.lines.iter().find(|l| l.kind == kind)
    }
}

/// Build the six material lines for a design.
pub fn build_material_costs(
    design: &Design,
    cost_factor: f64,
    tables: &AnalyticsTables,
) -> MaterialCosts {
    let rates = &tables.material_rates;
    let mass = &tables.material_mass;
    let envelope = design.params.envelope;

    let footprint_area = design.footprint.area();
    let wall_area = design.wall_area();
    let envelope_factor = lookup(&tables.envelope_cost_factor, &envelope, 1.0, "envelope cost");

    let lines = vec![
        MaterialLine::new(
            MaterialKind::Foundation,
            footprint_area * FOUNDATION_DEPTH,
            rates.foundation * cost_factor,
            mass.foundation_density,
            mass.foundation_carbon,
        ),
        MaterialLine::new(
            MaterialKind::Envelope,
            wall_area,
            rates.envelope * cost_factor * envelope_factor,
            lookup(&tables.envelope_density, &envelope, 480.0, "envelope density"),
            lookup(&tables.envelope_carbon, &envelope, 0.108, "envelope carbon"),
        ),
        MaterialLine::new(
            MaterialKind::Roof,
            footprint_area,
            rates.roof * cost_factor,
            mass.roof_density,
            mass.roof_carbon,
        ),
        MaterialLine::new(
            MaterialKind::Glazing,
            wall_area * design.features.glazing_ratio,
            rates.glazing * cost_factor,
            mass.glazing_density,
            mass.glazing_carbon,
        ),
        MaterialLine::new(
            MaterialKind::InteriorFitOut,
            design.floor_area() * FIT_OUT_SHARE,
            rates.finish * cost_factor,
            mass.finish_density,
            mass.finish_carbon,
        ),
        MaterialLine::new(
            MaterialKind::Systems,
            design.connectors.len() as f64,
            rates.systems * cost_factor * rates.systems_core_multiplier,
            mass.systems_density,
            mass.systems_carbon,
        ),
    ];

    MaterialCosts {
        total_cost: lines.iter().map(|l| l.total).sum(),
        total_mass_kg: lines.iter().map(|l| l.mass_kg).sum(),
        embodied_carbon_kg: lines.iter().map(|l| l.carbon_kg).sum(),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::generate_layout;
    use crate::params::{DesignParameters, Envelope};

    #[test]
    fn six_lines_in_order() {
        let design = generate_layout(42, &DesignParameters::default());
        let costs = build_material_costs(&design, 1.1, &AnalyticsTables::default());
        let kinds: Vec<MaterialKind> = costs.lines.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, MaterialKind::ALL.to_vec());
    }

    #[test]
    fn totals_are_line_sums() {
        let design = generate_layout(42, &DesignParameters::default());
        let costs = build_material_costs(&design, 1.1, &AnalyticsTables::default());
        let sum: f64 = costs.lines.iter().map(|l| l.unit_cost * l.quantity).sum();
        assert!((costs.total_cost - sum).abs() < 1e-6);
        let carbon: f64 = costs.lines.iter().map(|l| l.carbon_kg).sum();
        assert!((costs.embodied_carbon_kg - carbon).abs() < 1e-6);
    }

    #[test]
    fn quantities_follow_geometry() {
        let design = generate_layout(3, &DesignParameters::default());
        let costs = build_material_costs(&design, 1.0, &AnalyticsTables::default());
        let foundation = costs.line(MaterialKind::Foundation).unwrap();
        assert!((foundation.quantity - 60.0 * 0.35).abs() < 1e-9);
        let roof = costs.line(MaterialKind::Roof).unwrap();
        assert!((roof.quantity - 60.0).abs() < 1e-9);
        let shell = costs.line(MaterialKind::Envelope).unwrap();
        assert!((shell.quantity - design.wall_area()).abs() < 1e-9);
        let systems = costs.line(MaterialKind::Systems).unwrap();
        assert_eq!(systems.quantity, design.connectors.len() as f64);
        assert!((systems.unit_cost - 45.0 * 80.0).abs() < 1e-9);
    }

    #[test]
    fn regional_factor_scales_cost() {
        let design = generate_layout(9, &DesignParameters::default());
        let tables = AnalyticsTables::default();
        let base = build_material_costs(&design, 1.0, &tables);
        let sg = build_material_costs(&design, 1.65, &tables);
        assert!((sg.total_cost - base.total_cost * 1.65).abs() < 1e-6);
        // Mass does not depend on price.
        assert!((sg.total_mass_kg - base.total_mass_kg).abs() < 1e-9);
    }

    #[test]
    fn recycled_envelope_cheaper_and_lower_carbon() {
        let tables = AnalyticsTables::default();
        let standard = generate_layout(11, &DesignParameters::default());
        let recycled = generate_layout(
            11,
            &DesignParameters {
                envelope: Envelope::Recycled,
                ..Default::default()
            },
        );
        let a = build_material_costs(&standard, 1.0, &tables);
        let b = build_material_costs(&recycled, 1.0, &tables);
        let shell_a = a.line(MaterialKind::Envelope).unwrap();
        let shell_b = b.line(MaterialKind::Envelope).unwrap();
        assert!(shell_b.unit_cost < shell_a.unit_cost);
        assert!(shell_b.carbon_kg < shell_a.carbon_kg);
    }

    #[test]
    fn missing_envelope_factor_is_neutral() {
        let mut tables = AnalyticsTables::default();
        tables.envelope_cost_factor.clear();
        let design = generate_layout(
            5,
            &DesignParameters {
                envelope: Envelope::Hempcrete,
                ..Default::default()
            },
        );
        let costs = build_material_costs(&design, 1.0, &tables);
        assert_eq!(costs.line(MaterialKind::Envelope).unwrap().unit_cost, 32.0);
    }

    #[test]
    fn labels() {
        let design = generate_layout(42, &DesignParameters::default());
        let costs = build_material_costs(&design, 1.0, &AnalyticsTables::default());
        assert_eq!(costs.lines[0].quantity_label(), "21.0 m³");
        assert!(costs.lines[5].quantity_label().ends_with("cores"));
        assert!(costs.lines[0].unit_cost_label().starts_with('$'));
    }
}
