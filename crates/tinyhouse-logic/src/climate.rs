//! Climate risk assessment and mitigation strategies.
//!
//! Four independent hazard axes are thresholded from the site climate
//! record. Each level carries a weight; the mean weight is the design's
//! risk score in [0, 1], which the market, financial, timeline and
//! scoring stages consume. Without a climate record the assessment is a
//! single "Data Pending" placeholder at a fixed default score.
//!
//! | Hazard | High | Medium |
//! |--------|------|--------|
//! | Flooding & storm surge | precipitation > 1400 mm or coastal site | > 900 mm |
//! | Extreme heat | > 28 °C | > 22 °C |
//! | High winds | > 12 m/s | > 8 m/s |
//! | Wildfire | humidity < 40 % and precipitation < 600 mm | humidity < 55 % |
//!
//! "Coastal site" means the design's resolved environment is
//! [`Environment::Coastal`](crate::site::Environment::Coastal), either by
//! manual override or from [`environment_from_location`](crate::site::environment_from_location)'s
//! coastline heuristic (listed countries, |longitude| < 50°). The climate
//! record carries no sea-level or distance-to-shore field, so that
//! environment is the only coastline signal available, and it raises flood
//! exposure to High regardless of rainfall. Inland sites in a listed
//! country (Madrid, Milan) are classified coastal too.

use serde::{Deserialize, Serialize};

use crate::format::Insight;
use crate::layout::Design;
use crate::site::Climate;
use crate::tables::RiskWeights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn weight(&self, weights: &RiskWeights) -> f64 {
        match self {
            Self::Low => weights.low,
            Self::Medium => weights.medium,
            Self::High => weights.high,
        }
    }

    /// Bucket a risk score into a level.
    pub fn from_score(score: f64, weights: &RiskWeights) -> Self {
        if score < weights.low_threshold {
            Self::Low
        } else if score < weights.medium_threshold {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// Hazard axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    /// Placeholder when no climate record is available.
    DataPending,
    Flooding,
    ExtremeHeat,
    HighWinds,
    Wildfire,
}

impl Hazard {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DataPending => "Data Pending",
            Self::Flooding => "Flooding & Storm Surge",
            Self::ExtremeHeat => "Extreme Heat",
            Self::HighWinds => "High Winds",
            Self::Wildfire => "Wildfire",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateRisk {
    pub hazard: Hazard,
    pub level: RiskLevel,
    pub description: String,
}

/// All hazards plus the aggregate score and its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risks: Vec<ClimateRisk>,
    /// Mean level weight, [0, 1].
    pub score: f64,
    pub label: RiskLevel,
}

impl RiskAssessment {
    pub fn is_pending(&self) -> bool {
        self.risks.iter().any(|r| r.hazard == Hazard::DataPending)
    }

    pub fn level_of(&self, hazard: Hazard) -> Option<RiskLevel> {
        self.risks.iter().find(|r| r.hazard == hazard).map(|r| r.level)
    }
}

pub fn flood_level(climate: &Climate, coastal: bool) -> RiskLevel {
    if climate.precipitation > 1400.0 || coastal {
        RiskLevel::High
    } else if climate.precipitation > 900.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn heat_level(climate: &Climate) -> RiskLevel {
    if climate.temperature > 28.0 {
        RiskLevel::High
    } else if climate.temperature > 22.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn wind_level(climate: &Climate) -> RiskLevel {
    if climate.wind > 12.0 {
        RiskLevel::High
    } else if climate.wind > 8.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn wildfire_level(climate: &Climate) -> RiskLevel {
    if climate.humidity < 40.0 && climate.precipitation < 600.0 {
        RiskLevel::High
    } else if climate.humidity < 55.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Assess climate hazards. `coastal` forces high flood exposure.
pub fn assess_climate(
    climate: Option<&Climate>,
    coastal: bool,
    weights: &RiskWeights,
) -> RiskAssessment {
    let Some(climate) = climate else {
        return RiskAssessment {
            risks: vec![ClimateRisk {
                hazard: Hazard::DataPending,
                level: RiskLevel::Medium,
                description: "Run a generation to synchronize site-specific climate analytics."
                    .to_string(),
            }],
            score: weights.pending,
            label: RiskLevel::from_score(weights.pending, weights),
        };
    };

    let risks = vec![
        ClimateRisk {
            hazard: Hazard::Flooding,
            level: flood_level(climate, coastal),
            description: format!(
                "Annual rainfall {}mm with prevailing {:.1}m/s winds.",
                climate.precipitation, climate.wind
            ),
        },
        ClimateRisk {
            hazard: Hazard::ExtremeHeat,
            level: heat_level(climate),
            description: format!(
                "Average temperature {:.1}°C and {} heating degree days.",
                climate.temperature, climate.degree_days
            ),
        },
        ClimateRisk {
            hazard: Hazard::HighWinds,
            level: wind_level(climate),
            description: format!(
                "Gust potential {:.1}m/s; design roof uplift anchors accordingly.",
                climate.wind
            ),
        },
        ClimateRisk {
            hazard: Hazard::Wildfire,
            level: wildfire_level(climate),
            description: format!(
                "Relative humidity {}% with vegetation index {}.",
                climate.humidity,
                climate.vegetation.label()
            ),
        },
    ];

    let score = (risks.iter().map(|r| r.level.weight(weights)).sum::<f64>()
        / risks.len() as f64)
        .clamp(0.0, 1.0);

    RiskAssessment {
        label: RiskLevel::from_score(score, weights),
        risks,
        score,
    }
}

/// Mitigation strategy rows driven by the hazard levels.
pub fn climate_strategies(assessment: &RiskAssessment, design: &Design) -> Vec<Insight> {
    let at_least = |hazard: Hazard, level: RiskLevel| {
        assessment
            .level_of(hazard)
            .is_some_and(|found| found >= level)
    };

    vec![
        Insight::new(
            "Structure",
            format!("{} shell + hurricane straps", design.params.envelope.label()),
        ),
        Insight::new(
            "Drainage",
            if at_least(Hazard::Flooding, RiskLevel::High) {
                "Elevated plinth + perimeter swales"
            } else {
                "Permeable landscape"
            },
        ),
        Insight::new(
            "Cooling",
            if at_least(Hazard::ExtremeHeat, RiskLevel::Medium) {
                "Phase-change insulation + radiant cooling"
            } else {
                "Passive cross ventilation"
            },
        ),
        Insight::new(
            "Fire Resistance",
            if at_least(Hazard::Wildfire, RiskLevel::High) {
                "Intumescent coatings + ember screens"
            } else {
                "Fire-resistant landscaping"
            },
        ),
        Insight::new(
            "Energy Backup",
            if at_least(Hazard::HighWinds, RiskLevel::High) {
                "Storm-mode battery reserve"
            } else {
                "Standard resilience kit"
            },
        ),
    ]
}
