//! Keyword tables for material, location, fire-rating and hardware lookup.
//!
//! The tables live in `vocabulary.toml`, embedded at compile time and
//! parsed once on first use. Lookups are case-insensitive substring
//! matches, and each ordered list resolves to its first matching entry.

use std::sync::LazyLock;

use plan_extract_models::{FireRating, HardwareType, ItemCategory, Material};
use serde::Deserialize;

use crate::ExtractError;

/// Embedded vocabulary source.
const VOCABULARY_TOML: &str = include_str!("../vocabulary.toml");

/// The full set of keyword tables.
#[derive(Debug, Clone, Deserialize)]
pub struct Vocabulary {
    /// Incremented whenever a table changes.
    pub version: u32,
    /// Words that cancel a directly following category keyword ("no door").
    pub negations: Vec<String>,
    /// Room names recognized as a schedule item's location, in lookup order.
    pub rooms: Vec<String>,
    /// Phrases the positional location patterns capture but which are not
    /// locations.
    pub location_false_positives: Vec<String>,
    /// Terms whose presence suggests readable architectural text.
    pub architectural_terms: Vec<String>,
    pub categories: CategoryTables,
    pub materials: MaterialTables,
    pub fire_ratings: Vec<FireRatingEntry>,
    pub hardware: Vec<HardwareEntry>,
}

/// Category keywords and fallback identifiers for windows and doors.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryTables {
    pub window: CategoryKeywords,
    pub door: CategoryKeywords,
}

/// Keywords announcing a category, and the identifiers assumed when the
/// category is mentioned without any tag.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryKeywords {
    pub keywords: Vec<String>,
    pub defaults: Vec<String>,
}

/// Material vocabularies per item type.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialTables {
    pub window: Vec<MaterialEntry>,
    pub door: Vec<MaterialEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialEntry {
    pub material: Material,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FireRatingEntry {
    pub rating: FireRating,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HardwareEntry {
    pub hardware_type: HardwareType,
    pub keywords: Vec<String>,
}

static VOCABULARY: LazyLock<Result<Vocabulary, String>> =
    LazyLock::new(|| Vocabulary::from_toml_str(VOCABULARY_TOML).map_err(|e| e.to_string()));

/// Returns the embedded vocabulary.
///
/// # Errors
///
/// Returns [`ExtractError::Vocabulary`] if the embedded tables failed to
/// parse.
pub fn vocabulary() -> Result<&'static Vocabulary, ExtractError> {
    loaded(&VOCABULARY)
}

pub(crate) fn loaded(parsed: &Result<Vocabulary, String>) -> Result<&Vocabulary, ExtractError> {
    parsed
        .as_ref()
        .map_err(|e| ExtractError::Vocabulary(e.clone()))
}

impl Vocabulary {
    /// Parses a vocabulary from TOML.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if `toml_str` is not a valid vocabulary.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::de::from_str(toml_str)
    }

    /// Keyword table for a window or door category. Ironmongery has none.
    #[must_use]
    pub const fn category(&self, category: ItemCategory) -> Option<&CategoryKeywords> {
        match category {
            ItemCategory::Window => Some(&self.categories.window),
            ItemCategory::Door => Some(&self.categories.door),
            ItemCategory::Ironmongery => None,
        }
    }

    /// First material from the category's vocabulary named in `text`.
    #[must_use]
    pub fn material_in(&self, category: ItemCategory, text: &str) -> Option<Material> {
        let entries = match category {
            ItemCategory::Window => &self.materials.window,
            ItemCategory::Door => &self.materials.door,
            ItemCategory::Ironmongery => return None,
        };
        let lower = text.to_lowercase();
        entries
            .iter()
            .find(|entry| contains_any(&lower, &entry.keywords))
            .map(|entry| entry.material)
    }

    /// First fire rating named in `text`.
    #[must_use]
    pub fn fire_rating_in(&self, text: &str) -> Option<FireRating> {
        let lower = text.to_lowercase();
        self.fire_ratings
            .iter()
            .find(|entry| contains_any(&lower, &entry.keywords))
            .map(|entry| entry.rating)
    }

    /// Hardware type named in `text`, [`HardwareType::Other`] when none is.
    #[must_use]
    pub fn hardware_type_in(&self, text: &str) -> HardwareType {
        let lower = text.to_lowercase();
        self.hardware
            .iter()
            .find(|entry| contains_any(&lower, &entry.keywords))
            .map_or(HardwareType::Other, |entry| entry.hardware_type)
    }

    /// First known room name appearing in `text`.
    #[must_use]
    pub fn room_in(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.rooms
            .iter()
            .find(|room| lower.contains(room.as_str()))
            .map(String::as_str)
    }

    /// Whether a captured location phrase is a known false positive.
    #[must_use]
    pub fn is_false_location(&self, location: &str) -> bool {
        self.location_false_positives
            .iter()
            .any(|phrase| phrase == location)
    }
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn vocab() -> &'static Vocabulary {
        vocabulary().unwrap()
    }

    #[test]
    fn embedded_vocabulary_parses() {
        assert_eq!(vocab().version, 1);
    }

    #[test]
    fn window_material_order_is_stable() {
        let materials: Vec<Material> = vocab()
            .materials
            .window
            .iter()
            .map(|entry| entry.material)
            .collect();
        assert_eq!(
            materials,
            vec![
                Material::Aluminum,
                Material::Timber,
                Material::Upvc,
                Material::Steel
            ]
        );
    }

    #[test]
    fn door_material_order_is_stable() {
        let materials: Vec<Material> = vocab()
            .materials
            .door
            .iter()
            .map(|entry| entry.material)
            .collect();
        assert_eq!(
            materials,
            vec![
                Material::Timber,
                Material::Steel,
                Material::Aluminum,
                Material::Glass,
                Material::Upvc
            ]
        );
    }

    #[test]
    fn keywords_are_lowercase() {
        let v = vocab();
        let all_keywords = v
            .materials
            .window
            .iter()
            .chain(&v.materials.door)
            .flat_map(|entry| entry.keywords.iter())
            .chain(v.fire_ratings.iter().flat_map(|entry| entry.keywords.iter()))
            .chain(v.hardware.iter().flat_map(|entry| entry.keywords.iter()))
            .chain(&v.rooms);
        for keyword in all_keywords {
            assert_eq!(keyword, &keyword.to_lowercase(), "keyword {keyword} not lowercase");
        }
    }

    #[test]
    fn room_names_are_unique() {
        let mut seen = BTreeSet::new();
        for room in &vocab().rooms {
            assert!(seen.insert(room), "Duplicate room name: {room}");
        }
    }

    #[test]
    fn material_lookup_respects_category_order() {
        let v = vocab();
        // Windows check aluminium before timber, doors check timber first.
        let text = "Timber sub-frame with aluminium sash";
        assert_eq!(
            v.material_in(ItemCategory::Window, text),
            Some(Material::Aluminum)
        );
        assert_eq!(v.material_in(ItemCategory::Door, text), Some(Material::Timber));
        assert_eq!(v.material_in(ItemCategory::Window, "glass panel"), None);
        assert_eq!(v.material_in(ItemCategory::Door, "glass panel"), Some(Material::Glass));
        assert_eq!(v.material_in(ItemCategory::Ironmongery, "steel"), None);
    }

    #[test]
    fn fire_rating_lookup() {
        let v = vocab();
        assert_eq!(v.fire_rating_in("FD FR30 self closing"), Some(FireRating::Fr30));
        assert_eq!(v.fire_rating_in("60 minute door"), Some(FireRating::Fr60));
        assert_eq!(v.fire_rating_in("FR 90"), Some(FireRating::Fr90));
        assert_eq!(
            v.fire_rating_in("Fire-Rated leaf"),
            Some(FireRating::Unspecified)
        );
        assert_eq!(v.fire_rating_in("hollow core"), None);
    }

    #[test]
    fn hardware_lookup_falls_back_to_other() {
        let v = vocab();
        assert_eq!(v.hardware_type_in("Lever handle on rose"), HardwareType::Handle);
        assert_eq!(v.hardware_type_in("100mm butt hinges"), HardwareType::Hinge);
        assert_eq!(v.hardware_type_in("overhead closer"), HardwareType::DoorCloser);
        assert_eq!(v.hardware_type_in("floor stop"), HardwareType::DoorStop);
        assert_eq!(v.hardware_type_in("kick plate"), HardwareType::Other);
    }

    #[test]
    fn room_lookup_and_false_positives() {
        let v = vocab();
        assert_eq!(v.room_in("Serves the KITCHEN"), Some("kitchen"));
        assert_eq!(v.room_in("garage"), None);
        assert!(v.is_false_location("the door"));
        assert!(!v.is_false_location("master bedroom"));
    }

    #[test]
    fn category_tables_expose_defaults() {
        let v = vocab();
        let window = v.category(ItemCategory::Window).unwrap();
        assert_eq!(window.defaults, vec!["W1", "W2"]);
        let door = v.category(ItemCategory::Door).unwrap();
        assert_eq!(door.defaults, vec!["D1", "D2"]);
        assert!(v.category(ItemCategory::Ironmongery).is_none());
    }
}
