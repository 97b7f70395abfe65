//! Facility description: the single input of every fee calculation
//!
//! A [`FacilityDescription`] is an immutable snapshot of the attributes the
//! rate schedules are keyed on. Collecting it from a form or file is the
//! caller's job; [`RawFacilityInput`] covers the common case of loosely-typed
//! input that must be clamped to the engine's domain first.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Ways a facility plays music
///
/// Non-exclusive: a facility may select both, either or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicUse {
    /// Instructor-led group fitness classes
    Group,

    /// Background music on the gym floor, lobby and common areas
    Ambient,
}

impl MusicUse {
    /// Parse a music use from user input
    ///
    /// Accepts the canonical names plus the labels the intake form uses
    /// ("instructor-led", "background"). Case insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "group" | "group_fitness" | "instructor-led" | "instructor_led" => Some(MusicUse::Group),
            "ambient" | "background" => Some(MusicUse::Ambient),
            _ => None,
        }
    }

    /// Human-readable category name used in line item descriptions
    pub fn display_name(&self) -> &'static str {
        match self {
            MusicUse::Group => "Group Fitness Classes",
            MusicUse::Ambient => "Ambient Music",
        }
    }
}

impl std::fmt::Display for MusicUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One studio or class room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Room {
    pub classes_per_week: u32,
    pub class_capacity: u32,
}

impl Room {
    pub fn new(classes_per_week: u32, class_capacity: u32) -> Self {
        Self { classes_per_week, class_capacity }
    }

    /// Participant capacity this room contributes per week
    pub fn weekly_participants(&self) -> u64 {
        u64::from(self.classes_per_week) * u64::from(self.class_capacity)
    }
}

/// Facility attributes the fee engine is keyed on
///
/// `total_members` and `square_footage` are per location. `rooms` only
/// matters when [`MusicUse::Group`] is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityDescription {
    pub location_count: u32,
    pub total_members: u32,
    #[serde(default)]
    pub rooms: Vec<Room>,
    pub square_footage: u32,
    #[serde(default)]
    pub music_use_types: BTreeSet<MusicUse>,
    #[serde(default)]
    pub is_association_member: bool,
    #[serde(default)]
    pub is_bundled_platform_user: bool,
}

impl Default for FacilityDescription {
    fn default() -> Self {
        Self {
            location_count: 1,
            total_members: 0,
            rooms: Vec::new(),
            square_footage: 0,
            music_use_types: BTreeSet::new(),
            is_association_member: false,
            is_bundled_platform_user: false,
        }
    }
}

impl FacilityDescription {
    pub fn has_group(&self) -> bool {
        self.music_use_types.contains(&MusicUse::Group)
    }

    pub fn has_ambient(&self) -> bool {
        self.music_use_types.contains(&MusicUse::Ambient)
    }

    /// Total weekly participant capacity across all rooms
    ///
    /// Computed regardless of selected music uses; callers decide whether it
    /// applies. Saturates instead of overflowing.
    pub fn total_weekly_participants(&self) -> u64 {
        self.rooms
            .iter()
            .fold(0u64, |total, room| total.saturating_add(room.weekly_participants()))
    }

    /// Derived copy with the bundled-platform flag forced to `bundled`
    ///
    /// Scenario computation uses this so the caller's value is never touched.
    pub fn with_bundled_platform(&self, bundled: bool) -> Self {
        Self {
            is_bundled_platform_user: bundled,
            ..self.clone()
        }
    }
}

/// Loosely-typed facility input as collected from a form or file
///
/// Counts are signed and optional because that is what user input looks
/// like. [`RawFacilityInput::into_facility`] clamps everything to the
/// engine's domain floor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFacilityInput {
    #[serde(default)]
    pub location_count: Option<i64>,
    #[serde(default)]
    pub total_members: Option<i64>,
    #[serde(default)]
    pub rooms: Vec<RawRoom>,
    #[serde(default)]
    pub square_footage: Option<i64>,
    #[serde(default)]
    pub music_use_types: Vec<String>,
    #[serde(default)]
    pub is_association_member: bool,
    #[serde(default)]
    pub is_bundled_platform_user: bool,
}

/// Loosely-typed room input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRoom {
    #[serde(default)]
    pub classes_per_week: Option<i64>,
    #[serde(default)]
    pub class_capacity: Option<i64>,
}

/// Clamp a signed, possibly missing count into `u32`
fn clamp_count(value: Option<i64>) -> u32 {
    value.unwrap_or(0).clamp(0, i64::from(u32::MAX)) as u32
}

impl RawFacilityInput {
    /// Parse raw input from a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse raw input from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Clamp to domain and build a [`FacilityDescription`]
    ///
    /// - negative or missing counts become 0
    /// - a location count of 0 becomes 1
    /// - duplicate music use entries collapse
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unrecognised music use name.
    pub fn into_facility(self) -> Result<FacilityDescription> {
        let mut music_use_types = BTreeSet::new();
        for name in &self.music_use_types {
            let music_use = MusicUse::parse(name)
                .ok_or_else(|| Error::InvalidInput(format!("unknown music use type '{}'", name)))?;
            music_use_types.insert(music_use);
        }

        let rooms = self
            .rooms
            .iter()
            .map(|room| Room {
                classes_per_week: clamp_count(room.classes_per_week),
                class_capacity: clamp_count(room.class_capacity),
            })
            .collect();

        Ok(FacilityDescription {
            location_count: clamp_count(self.location_count).max(1),
            total_members: clamp_count(self.total_members),
            rooms,
            square_footage: clamp_count(self.square_footage),
            music_use_types,
            is_association_member: self.is_association_member,
            is_bundled_platform_user: self.is_bundled_platform_user,
        })
    }
}
