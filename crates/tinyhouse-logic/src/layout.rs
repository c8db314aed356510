//! Seeded layout generation: footprint, room packing, cores and features.
//!
//! `generate_layout` is a pure function of `(seed, params)`: every random
//! decision is drawn from a single [`LayoutRng`] stream in a fixed order,
//! so the same inputs always reproduce the same geometry and features.
//! Only the display id is drawn from thread-local entropy.
//!
//! Rooms are placed by a greedy shelf packer: left to right along x,
//! wrapping to a new row once the cursor passes the footprint's half
//! width. The packed extent is an approximation of the footprint and may
//! overhang it; analytics work from room sums, not the nominal footprint.
//!
//! ```
//! use tinyhouse_logic::layout::generate_layout;
//! use tinyhouse_logic::params::DesignParameters;
//!
//! let params = DesignParameters::default();
//! let a = generate_layout(42, &params);
//! let b = generate_layout(42, &params);
//! assert_eq!(a.rooms, b.rooms);
//! assert!((a.footprint.area() - 60.0).abs() < 0.01);
//! ```

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::category::{classify_room, RoomCategory};
use crate::params::{DesignParameters, SQFT_PER_SQM};
use crate::rng::LayoutRng;

/// Storey height in metres.
pub const STOREY_HEIGHT: f64 = 3.0;

/// Generic room types appended after bedrooms and baths in the type catalog.
pub const GENERIC_ROOM_TYPES: [&str; 8] = [
    "Great Room",
    "Kitchen",
    "Dining Nook",
    "Flex Studio",
    "Workspace",
    "Library",
    "Mudroom",
    "Utility",
];

// ============================================================================
// DESIGN RECORD
// ============================================================================

/// Nominal building footprint in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f64,
    pub length: f64,
}

impl Footprint {
    pub fn area(&self) -> f64 {
        self.width * self.length
    }
}

/// One packed room module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub width: f64,
    pub length: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_z: f64,
    #[serde(rename = "type")]
    pub room_type: String,
    pub category: RoomCategory,
}

impl Room {
    pub fn area(&self) -> f64 {
        self.width * self.length
    }

    pub fn area_sqft(&self) -> f64 {
        self.area() * SQFT_PER_SQM
    }

    /// Perimeter wall area (all four sides, full height).
    pub fn wall_area(&self) -> f64 {
        (self.width + self.length) * 2.0 * self.height
    }
}

/// Vertical circulation / mechanical core kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectorKind {
    Atrium,
    Service,
}

/// A core placed independently of the room packing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    pub x: f64,
    pub z: f64,
    pub radius: f64,
    pub kind: ConnectorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoofType {
    Butterfly,
    MonoPitch,
    Gable,
    GreenRoof,
    SolarCanopy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facade {
    EngineeredTimber,
    BasaltComposite,
    UpcycledAluminum,
    CeramicPanels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lighting {
    DynamicCircadian,
    SmartDimmable,
    DaylightHarvesting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shading {
    Electrochromic,
    KineticLouvers,
    RetractableAwning,
}

impl RoofType {
    pub const ALL: [RoofType; 5] = [
        Self::Butterfly,
        Self::MonoPitch,
        Self::Gable,
        Self::GreenRoof,
        Self::SolarCanopy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Butterfly => "Butterfly",
            Self::MonoPitch => "Mono-Pitch",
            Self::Gable => "Gable",
            Self::GreenRoof => "Green Roof",
            Self::SolarCanopy => "Solar Canopy",
        }
    }
}

impl Facade {
    pub const ALL: [Facade; 4] = [
        Self::EngineeredTimber,
        Self::BasaltComposite,
        Self::UpcycledAluminum,
        Self::CeramicPanels,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::EngineeredTimber => "Engineered Timber",
            Self::BasaltComposite => "Basalt Composite",
            Self::UpcycledAluminum => "Upcycled Aluminum",
            Self::CeramicPanels => "Ceramic Panels",
        }
    }
}

impl Lighting {
    pub const ALL: [Lighting; 3] = [
        Self::DynamicCircadian,
        Self::SmartDimmable,
        Self::DaylightHarvesting,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::DynamicCircadian => "Dynamic Circadian",
            Self::SmartDimmable => "Smart Dimmable",
            Self::DaylightHarvesting => "Daylight Harvesting",
        }
    }
}

impl Shading {
    pub const ALL: [Shading; 3] = [
        Self::Electrochromic,
        Self::KineticLouvers,
        Self::RetractableAwning,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Electrochromic => "Electrochromic",
            Self::KineticLouvers => "Kinetic Louvers",
            Self::RetractableAwning => "Retractable Awning",
        }
    }
}

/// Qualitative feature selection for a design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Features {
    /// Window-to-wall ratio in [0.25, 0.60).
    pub glazing_ratio: f64,
    pub roof_type: RoofType,
    pub facade: Facade,
    pub lighting: Lighting,
    pub shading: Shading,
}

/// One generated floor-plan candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// Display-only identifier; not derived from the seed.
    pub id: String,
    pub seed: u32,
    pub footprint: Footprint,
    /// Rooms in packing order.
    pub rooms: Vec<Room>,
    pub connectors: Vec<Connector>,
    pub features: Features,
    pub floors: u32,
    pub params: DesignParameters,
}

impl Design {
    /// Gross floor area across all storeys, in m².
    pub fn floor_area(&self) -> f64 {
        self.footprint.area() * self.floors as f64
    }

    /// Sum of room perimeter wall areas, in m².
    pub fn wall_area(&self) -> f64 {
        self.rooms.iter().map(Room::wall_area).sum()
    }

    /// Room area per program category, in m².
    pub fn category_areas(&self) -> BTreeMap<RoomCategory, f64> {
        let mut areas = BTreeMap::new();
        for room in &self.rooms {
            *areas.entry(room.category).or_insert(0.0) += room.area();
        }
        areas
    }

    /// "2BR/1BA · 1-level" style summary.
    pub fn program_profile(&self) -> String {
        format!(
            "{}BR/{}BA · {}-level",
            self.params.bedrooms, self.params.bathrooms, self.floors
        )
    }
}

// ============================================================================
// GENERATION
// ============================================================================

/// Generate a design from a seed and parameters.
pub fn generate_layout(seed: u32, params: &DesignParameters) -> Design {
    let mut rng = LayoutRng::new(seed);
    let floors = params.floors;

    let footprint = draw_footprint(&mut rng, params.area);
    let rooms = pack_rooms(&mut rng, params, footprint);
    let connectors = place_connectors(&mut rng, floors, footprint);
    let features = select_features(&mut rng);

    let design = Design {
        id: random_design_id(),
        seed,
        footprint,
        rooms,
        connectors,
        features,
        floors,
        params: params.clone(),
    };

    log::debug!(
        "Generated {} (seed {}): {:.1}×{:.1} m, {} rooms, {} cores",
        design.id,
        seed,
        footprint.width,
        footprint.length,
        design.rooms.len(),
        design.connectors.len()
    );

    design
}

/// Randomized aspect ratio around the square baseline, area preserved.
///
/// A non-positive or non-finite area collapses to a 0×0 footprint.
fn draw_footprint(rng: &mut LayoutRng, area: f64) -> Footprint {
    let length = (area * (rng.next_f64() * 0.4 + 0.8)).sqrt();
    if !(length > 0.0 && length.is_finite()) {
        return Footprint {
            width: 0.0,
            length: 0.0,
        };
    }
    Footprint {
        width: area / length,
        length,
    }
}

/// Room type catalog: numbered bedrooms, then baths, then generic types.
pub fn room_type_catalog(params: &DesignParameters) -> Vec<String> {
    let bedrooms = (1..=params.bedrooms).map(|i| format!("Bedroom {i}"));
    let baths = (0..params.bathrooms).map(|i| {
        if i == 0 {
            "Primary Bath".to_string()
        } else {
            "Guest Bath".to_string()
        }
    });
    bedrooms
        .chain(baths)
        .chain(GENERIC_ROOM_TYPES.iter().map(|s| s.to_string()))
        .collect()
}

/// Greedy shelf packing of room modules, left to right in rows.
fn pack_rooms(rng: &mut LayoutRng, params: &DesignParameters, footprint: Footprint) -> Vec<Room> {
    let Footprint {
        width: base_width,
        length: base_length,
    } = footprint;
    let height = STOREY_HEIGHT * params.floors as f64;

    let requested = params.bedrooms as f64 + params.bathrooms as f64 + 2.0;
    let modules = ((requested * (rng.next_f64() * 0.4 + 0.9)).round() as usize).max(4);
    let module_width = base_width / draw_divisor(rng);
    let module_length = base_length / draw_divisor(rng);

    let catalog = room_type_catalog(params);
    let mut rooms = Vec::with_capacity(modules);
    let mut x = -base_width / 2.0;
    let mut z = -base_length / 2.0;

    for i in 0..modules {
        let width = module_width * (rng.next_f64() * 0.6 + 0.6);
        let length = module_length * (rng.next_f64() * 0.6 + 0.6);
        let room_type = rng
            .choose(&catalog)
            .cloned()
            .unwrap_or_else(|| GENERIC_ROOM_TYPES[0].to_string());
        let category = classify_room(&room_type);

        rooms.push(Room {
            id: format!("module-{i}"),
            width,
            length,
            height,
            center_x: x + width / 2.0,
            center_z: z + length / 2.0,
            room_type,
            category,
        });

        x += width;
        if x > base_width / 2.0 {
            x = -base_width / 2.0;
            z += module_length;
        }
    }

    rooms
}

/// Integer footprint divisor, 2..=5.
fn draw_divisor(rng: &mut LayoutRng) -> f64 {
    (rng.next_f64() * 3.0 + 2.0).round().max(2.0)
}

fn place_connectors(rng: &mut LayoutRng, floors: u32, footprint: Footprint) -> Vec<Connector> {
    let count = ((rng.next_f64() * 2.0 + floors as f64).round() as usize).max(1);
    (0..count)
        .map(|idx| {
            let x = (rng.next_f64() - 0.5) * footprint.width * 0.6;
            let z = (rng.next_f64() - 0.5) * footprint.length * 0.6;
            let radius = rng.next_f64() * 0.8 + 0.6;
            let kind = if rng.next_f64() > 0.6 {
                ConnectorKind::Atrium
            } else {
                ConnectorKind::Service
            };
            Connector {
                id: format!("core-{idx}"),
                x,
                z,
                radius,
                kind,
            }
        })
        .collect()
}

fn select_features(rng: &mut LayoutRng) -> Features {
    let glazing_ratio = 0.25 + rng.next_f64() * 0.35;
    let roof_type = RoofType::ALL[rng.index(RoofType::ALL.len())];
    let facade = Facade::ALL[rng.index(Facade::ALL.len())];
    let lighting = Lighting::ALL[rng.index(Lighting::ALL.len())];
    let shading = Shading::ALL[rng.index(Shading::ALL.len())];
    Features {
        glazing_ratio,
        roof_type,
        facade,
        lighting,
        shading,
    }
}

fn random_design_id() -> String {
    const ID_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| ID_CHARS[rng.gen_range(0..ID_CHARS.len())] as char)
        .collect();
    format!("Design-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_params() -> DesignParameters {
        DesignParameters::default()
    }

    #[test]
    fn footprint_preserves_area() {
        for seed in [0, 1, 42, 9_999, u32::MAX] {
            let design = generate_layout(seed, &scenario_params());
            assert!(
                (design.footprint.area() - 60.0).abs() < 1e-9,
                "seed {seed}: area {}",
                design.footprint.area()
            );
        }
    }

    #[test]
    fn aspect_ratio_in_range() {
        for seed in 0..200 {
            let fp = generate_layout(seed, &scenario_params()).footprint;
            // length² ∈ [0.8, 1.2) × area
            let ratio = fp.length * fp.length / 60.0;
            assert!((0.8..1.2).contains(&ratio), "seed {seed}: {ratio}");
        }
    }

    #[test]
    fn zero_area_collapses_footprint() {
        let params = DesignParameters {
            area: 0.0,
            ..scenario_params()
        };
        let design = generate_layout(1, &params);
        assert_eq!(design.footprint.width, 0.0);
        assert_eq!(design.footprint.length, 0.0);
        for room in &design.rooms {
            assert!(room.width.is_finite() && room.length.is_finite());
            assert!(room.center_x.is_finite() && room.center_z.is_finite());
        }
    }

    #[test]
    fn deterministic_geometry_and_features() {
        let params = scenario_params();
        let a = generate_layout(1234, &params);
        let b = generate_layout(1234, &params);
        assert_eq!(a.footprint, b.footprint);
        assert_eq!(a.rooms, b.rooms);
        assert_eq!(a.connectors, b.connectors);
        assert_eq!(a.features, b.features);
    }

    #[test]
    fn at_least_four_rooms() {
        let params = DesignParameters {
            bedrooms: 0,
            bathrooms: 0,
            ..scenario_params()
        };
        for seed in 0..100 {
            assert!(generate_layout(seed, &params).rooms.len() >= 4);
        }
    }

    #[test]
    fn room_count_tracks_program() {
        // modules = round((b + ba + 2) × [0.9, 1.3))
        let params = DesignParameters {
            bedrooms: 4,
            bathrooms: 2,
            ..scenario_params()
        };
        for seed in 0..100 {
            let n = generate_layout(seed, &params).rooms.len();
            assert!((7..=11).contains(&n), "seed {seed}: {n} rooms");
        }
    }

    #[test]
    fn rooms_have_catalog_types_and_matching_category() {
        let params = scenario_params();
        let catalog = room_type_catalog(&params);
        let design = generate_layout(77, &params);
        for room in &design.rooms {
            assert!(catalog.contains(&room.room_type), "{}", room.room_type);
            assert_eq!(room.category, classify_room(&room.room_type));
        }
    }

    #[test]
    fn catalog_layout() {
        let params = DesignParameters {
            bedrooms: 2,
            bathrooms: 3,
            ..scenario_params()
        };
        let catalog = room_type_catalog(&params);
        assert_eq!(catalog.len(), 13);
        assert_eq!(catalog[0], "Bedroom 1");
        assert_eq!(catalog[1], "Bedroom 2");
        assert_eq!(catalog[2], "Primary Bath");
        assert_eq!(catalog[3], "Guest Bath");
        assert_eq!(catalog[4], "Guest Bath");
        assert_eq!(catalog[5], "Great Room");
        assert_eq!(catalog[12], "Utility");
    }

    #[test]
    fn room_heights_follow_floors() {
        let params = DesignParameters {
            floors: 2,
            ..scenario_params()
        };
        let design = generate_layout(5, &params);
        assert!(design.rooms.iter().all(|r| (r.height - 6.0).abs() < 1e-12));
    }

    #[test]
    fn first_room_starts_at_corner() {
        let design = generate_layout(8, &scenario_params());
        let fp = design.footprint;
        let first = &design.rooms[0];
        assert!((first.center_x - (-fp.width / 2.0 + first.width / 2.0)).abs() < 1e-12);
        assert!((first.center_z - (-fp.length / 2.0 + first.length / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn rows_wrap_past_half_width() {
        // Replay the cursor: a room starts a new row only after the cursor
        // passed +W/2, and the row advance is one module length.
        for seed in 0..50 {
            let design = generate_layout(seed, &scenario_params());
            let half_w = design.footprint.width / 2.0;
            let mut x = -half_w;
            for room in &design.rooms {
                let start_x = room.center_x - room.width / 2.0;
                assert!((start_x - x).abs() < 1e-9, "seed {seed}: cursor mismatch");
                x += room.width;
                if x > half_w {
                    x = -half_w;
                }
            }
        }
    }

    #[test]
    fn connectors_within_core_zone() {
        for seed in 0..100 {
            let design = generate_layout(seed, &scenario_params());
            let fp = design.footprint;
            assert!(!design.connectors.is_empty());
            for c in &design.connectors {
                assert!(c.x.abs() <= fp.width * 0.3 + 1e-12);
                assert!(c.z.abs() <= fp.length * 0.3 + 1e-12);
                assert!((0.6..1.4).contains(&c.radius));
            }
        }
    }

    #[test]
    fn connector_count_tracks_floors() {
        let params = DesignParameters {
            floors: 3,
            ..scenario_params()
        };
        for seed in 0..50 {
            let n = generate_layout(seed, &params).connectors.len();
            assert!((3..=5).contains(&n), "seed {seed}: {n} cores");
        }
    }

    #[test]
    fn both_connector_kinds_appear() {
        let mut atrium = 0;
        let mut service = 0;
        for seed in 0..200 {
            for c in generate_layout(seed, &scenario_params()).connectors {
                match c.kind {
                    ConnectorKind::Atrium => atrium += 1,
                    ConnectorKind::Service => service += 1,
                }
            }
        }
        assert!(atrium > 0 && service > atrium, "atrium {atrium}, service {service}");
    }

    #[test]
    fn glazing_in_range() {
        for seed in 0..200 {
            let g = generate_layout(seed, &scenario_params()).features.glazing_ratio;
            assert!((0.25..0.60).contains(&g), "seed {seed}: {g}");
        }
    }

    #[test]
    fn different_seeds_differ() {
        let params = scenario_params();
        let a = generate_layout(1, &params);
        let b = generate_layout(2, &params);
        assert!(a.rooms != b.rooms || a.features != b.features);
    }

    #[test]
    fn degenerate_area_does_not_panic() {
        for area in [0.0, -10.0, f64::NAN] {
            let params = DesignParameters {
                area,
                floors: 0,
                ..scenario_params()
            };
            let design = generate_layout(3, &params);
            assert!(design.rooms.len() >= 4);
            assert!(!design.connectors.is_empty());
        }
    }

    #[test]
    fn design_id_format() {
        let design = generate_layout(1, &scenario_params());
        assert!(design.id.starts_with("Design-"));
        assert_eq!(design.id.len(), "Design-".len() + 6);
    }

    #[test]
    fn category_areas_sum_to_room_area() {
        let design = generate_layout(21, &scenario_params());
        let by_category: f64 = design.category_areas().values().sum();
        let total: f64 = design.rooms.iter().map(Room::area).sum();
        assert!((by_category - total).abs() < 1e-9);
    }

    #[test]
    fn program_profile_label() {
        let design = generate_layout(1, &scenario_params());
        assert_eq!(design.program_profile(), "2BR/1BA · 1-level");
    }
}
