//! Pure design logic for the tiny-house studio.
//!
//! This crate contains the seeded layout generator and the analytics
//! pipeline, independent of any renderer, UI, or network client. Functions
//! take plain data and return results, so the whole pipeline is
//! unit-testable and can be driven from a CLI harness, a server, or a
//! browser front end alike. Site data (geocoding, climate) is resolved by
//! the host and passed in as an optional [`site::SiteContext`].
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`analytics`] | Full per-design analytics record and its stage wiring |
//! | [`batch`] | Candidate sweeps, ranking, top-K retention |
//! | [`category`] | Room-type → program category classification |
//! | [`climate`] | Hazard thresholds, risk score, mitigation strategies |
//! | [`finance`] | Financial rollup and fabrication timeline |
//! | [`format`] | Insight rows and en-US currency formatting |
//! | [`layout`] | Seeded footprint, room packing, cores, features |
//! | [`market`] | Sale value, regional cost factor, build pressure |
//! | [`materials`] | Bill of materials with mass and embodied carbon |
//! | [`params`] | Design parameters, validation, randomisation |
//! | [`performance`] | Per-room cost, energy, carbon, comfort |
//! | [`rng`] | Deterministic layout random stream |
//! | [`scoring`] | Composite 0–100 optimisation score |
//! | [`site`] | Climate/location records and environment selection |
//! | [`tables`] | Injectable lookup tables with JSON loading |

pub mod analytics;
pub mod batch;
pub mod category;
pub mod climate;
pub mod finance;
pub mod format;
pub mod layout;
pub mod market;
pub mod materials;
pub mod params;
pub mod performance;
pub mod rng;
pub mod scoring;
pub mod site;
pub mod tables;
