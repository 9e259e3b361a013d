#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Value types produced by building-plan text extraction.
//!
//! Every extractor in `plan_extract` returns one of the records defined
//! here. They are plain, serializable data: created by one extraction call,
//! never mutated afterwards, and owned entirely by the caller. Field names
//! serialize to the JSON shape consumed by the compliance engine.

use std::ops::{Range, RangeInclusive};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Semantic classification of a measurement found in plan text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DimensionKind {
    /// Height of structural lintels above datum
    LintelLevel,
    /// Height at which roof timbers bear on the wall
    WallPlateLevel,
    /// Maximum height of the roof
    MaxRoofHeight,
    /// Explicit ceiling height
    CeilingHeight,
    /// Clear (unobstructed) room height
    ClearHeight,
    /// Floor-to-ceiling height
    FloorToCeiling,
    /// A height mention with no structural qualifier
    GeneralHeight,
    /// Any measurement that is not otherwise classified
    Dimension,
}

impl DimensionKind {
    /// Returns the interval, in meters, inside which a value of this kind
    /// is considered plausible.
    #[must_use]
    pub const fn plausible_range(self) -> RangeInclusive<f64> {
        match self {
            Self::LintelLevel => 1.5..=3.0,
            Self::WallPlateLevel => 2.0..=4.0,
            Self::MaxRoofHeight => 2.5..=10.0,
            Self::CeilingHeight | Self::ClearHeight | Self::FloorToCeiling => 2.0..=5.0,
            Self::GeneralHeight => 0.1..=10.0,
            Self::Dimension => 0.1..=50.0,
        }
    }

    /// Whether `meters` falls inside [`Self::plausible_range`].
    #[must_use]
    pub fn is_plausible(self, meters: f64) -> bool {
        self.plausible_range().contains(&meters)
    }

    /// Whether this kind is one of the three structural heights.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(
            self,
            Self::LintelLevel | Self::WallPlateLevel | Self::MaxRoofHeight
        )
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::LintelLevel,
            Self::WallPlateLevel,
            Self::MaxRoofHeight,
            Self::CeilingHeight,
            Self::ClearHeight,
            Self::FloorToCeiling,
            Self::GeneralHeight,
            Self::Dimension,
        ]
    }
}

/// Length unit in which a pattern's number is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LengthUnit {
    Meters,
    Millimeters,
}

impl LengthUnit {
    /// Converts `value`, written in this unit, to meters.
    #[must_use]
    pub fn to_meters(self, value: f64) -> f64 {
        match self {
            Self::Meters => value,
            Self::Millimeters => value / 1000.0,
        }
    }
}

/// A classified measurement, always stored in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: DimensionKind,
    #[serde(rename = "rawText")]
    pub raw_text: String,
    /// Byte span of `raw_text` in the source text.
    #[serde(skip)]
    pub span: Range<usize>,
}

/// Which side of an opening a schedule-item measurement describes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DimensionRole {
    Width,
    Height,
}

/// A width or height measured on a single schedule item, in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDimension {
    #[serde(rename = "type")]
    pub role: DimensionRole,
    pub value: f64,
    #[serde(rename = "rawText")]
    pub raw_text: String,
}

/// The kind of schedule an item belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemCategory {
    Window,
    Door,
    Ironmongery,
}

/// Frame or leaf material recognized in a schedule entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Material {
    Aluminum,
    Timber,
    Upvc,
    Steel,
    Glass,
}

/// Certified fire-resistance duration of a door.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum FireRating {
    /// 30 minutes
    #[serde(rename = "FR30")]
    #[strum(serialize = "FR30")]
    Fr30,
    /// 60 minutes
    #[serde(rename = "FR60")]
    #[strum(serialize = "FR60")]
    Fr60,
    /// 90 minutes
    #[serde(rename = "FR90")]
    #[strum(serialize = "FR90")]
    Fr90,
    /// Marked as fire rated without a stated duration
    #[serde(rename = "Fire Rated (unspecified)")]
    #[strum(serialize = "Fire Rated (unspecified)")]
    Unspecified,
}

/// Kind of door hardware named in an ironmongery entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum HardwareType {
    #[serde(rename = "hinge")]
    #[strum(serialize = "hinge")]
    Hinge,
    #[serde(rename = "handle")]
    #[strum(serialize = "handle")]
    Handle,
    #[serde(rename = "lock")]
    #[strum(serialize = "lock")]
    Lock,
    #[serde(rename = "door closer")]
    #[strum(serialize = "door closer")]
    DoorCloser,
    #[serde(rename = "door stop")]
    #[strum(serialize = "door stop")]
    DoorStop,
    #[serde(rename = "other")]
    #[strum(serialize = "other")]
    Other,
}

/// One window or door entry found in plan text.
///
/// `fire_rating` is only ever populated for doors, and the ventilation and
/// natural-light flags only for windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    /// Upper-cased tag of the entry (e.g. `"WO1"`).
    pub id: String,
    /// Entry text following the tag, up to the next `,`, `;` or newline.
    pub details: String,
    pub dimensions: Vec<ItemDimension>,
    #[serde(rename = "hasDimensions")]
    pub has_dimensions: bool,
    pub material: Option<Material>,
    pub location: Option<String>,
    #[serde(rename = "fireRating", default)]
    pub fire_rating: Option<FireRating>,
    #[serde(rename = "hasVentilationDetails", default)]
    pub has_ventilation_details: bool,
    #[serde(rename = "hasNaturalLightDetails", default)]
    pub has_natural_light_details: bool,
    /// Heuristic score in `[0, 1]` for how fully the entry is specified.
    #[serde(default)]
    pub confidence: f64,
    #[serde(skip)]
    pub span: Range<usize>,
}

/// One entry of an ironmongery (door hardware) schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IronmongeryItem {
    pub id: String,
    pub details: String,
    #[serde(rename = "hardwareType")]
    pub hardware_type: HardwareType,
    #[serde(skip)]
    pub span: Range<usize>,
}

/// Window, door and ironmongery schedules detected in one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInfo {
    #[serde(rename = "hasSchedule")]
    pub has_schedule: bool,
    pub has_window_schedule: bool,
    pub has_door_schedule: bool,
    pub has_ironmongery_schedule: bool,
    pub windows: Vec<ScheduleItem>,
    pub doors: Vec<ScheduleItem>,
    pub ironmongery: Vec<IronmongeryItem>,
    /// Weighted share of items carrying dimensions, material and location.
    pub schedule_completeness: f64,
    pub ventilation_requirements_met: bool,
    pub natural_light_requirements_met: bool,
    pub has_ventilation_info: bool,
    pub has_natural_light_info: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl ScheduleInfo {
    /// An empty result carrying the message of a failed extraction.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Structural heights read from elevations and sections, in meters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralHeights {
    pub lintel_level: Option<f64>,
    pub wall_plate_level: Option<f64>,
    pub max_roof_height: Option<f64>,
    pub has_structural_heights: bool,
    pub can_determine_room_height: bool,
    /// Wall-plate level when known, otherwise lintel level plus 0.3 m.
    pub implied_room_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl StructuralHeights {
    /// An empty result carrying the message of a failed extraction.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Qualitative report on how well a set of schedules is put together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// Overall score clamped to `[0, 1]`.
    pub score: f64,
    pub issues: Vec<String>,
    pub strengths: Vec<String>,
}

/// Coarse grade of how usable an OCR/PDF text dump is for extraction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TextQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

/// Everything extracted from a single document, as persisted alongside the
/// source document record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub dimensions: Vec<Dimension>,
    pub areas: Vec<f64>,
    pub floor_counts: Vec<u32>,
    pub window_identifiers: Vec<String>,
    pub door_identifiers: Vec<String>,
    pub schedule: ScheduleInfo,
    pub schedule_quality: QualityAssessment,
    pub structural_heights: StructuralHeights,
    pub text_quality: TextQuality,
}
