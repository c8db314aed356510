//! Room program categories and keyword classification.
//!
//! A room's free-text type ("Primary Bath", "Dining Nook") maps to one of
//! seven program categories. The rules are evaluated top to bottom and the
//! first rule with a matching keyword wins, so "Bedroom Studio" is
//! Sleeping, not Flex.

use serde::{Deserialize, Serialize};

/// Program category of a room, used for colour-coding and baseline lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoomCategory {
    Living,
    Sleeping,
    Culinary,
    Wellness,
    Flex,
    Utility,
    Service,
}

impl RoomCategory {
    pub const ALL: [RoomCategory; 7] = [
        Self::Living,
        Self::Sleeping,
        Self::Culinary,
        Self::Wellness,
        Self::Flex,
        Self::Utility,
        Self::Service,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Living => "Living",
            Self::Sleeping => "Sleeping",
            Self::Culinary => "Culinary",
            Self::Wellness => "Wellness",
            Self::Flex => "Flex",
            Self::Utility => "Utility",
            Self::Service => "Service",
        }
    }

    /// Display colour (0xRRGGBB) for program-mode rendering.
    pub fn program_color(&self) -> u32 {
        match self {
            Self::Living => 0x60a5fa,
            Self::Sleeping => 0xf472b6,
            Self::Culinary => 0xf59e0b,
            Self::Wellness => 0x34d399,
            Self::Flex => 0xa855f7,
            Self::Utility => 0x38bdf8,
            Self::Service => 0x94a3b8,
        }
    }
}

/// Ordered classification rules: (keywords, category).
const RULES: &[(&[&str], RoomCategory)] = &[
    (&["bed"], RoomCategory::Sleeping),
    (&["bath"], RoomCategory::Wellness),
    (&["kitchen", "dining"], RoomCategory::Culinary),
    (&["great", "living", "lounge"], RoomCategory::Living),
    (&["workspace", "studio", "library"], RoomCategory::Flex),
    (&["utility", "mudroom"], RoomCategory::Utility),
    (&["atrium", "service", "core"], RoomCategory::Service),
];

/// Classify a room type. Unmatched or empty types fall back to Flex.
pub fn classify_room(room_type: &str) -> RoomCategory {
    let normalized = room_type.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| normalized.contains(k)))
        .map_or(RoomCategory::Flex, |(_, category)| *category)
}
