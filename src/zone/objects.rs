//! # Zone Objects
//!
//! Objects that occupy zone cells and the catalog that classifies blueprints.

use crate::config;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Broad classification of a blueprint.
///
/// Generation only cares about a handful of distinctions: whether an
/// object blocks like a wall, whether it is a creature that may be swept
/// out of a build area, and whether it is ground cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Solid structure, blocks movement and counts for wall checks
    Wall,
    /// Passable opening in a wall
    Door,
    /// Ground cover
    Floor,
    /// Anything with a combat part
    Creature,
    /// Fixtures such as campfires, seating and lights
    Furniture,
    /// Storage that holds loot
    Container,
    /// Invisible builder hints
    Marker,
    /// Zone-wide logic objects
    Widget,
    /// Everything else
    Item,
}

impl ObjectKind {
    pub fn is_wall(self) -> bool {
        self == ObjectKind::Wall
    }

    pub fn is_combat(self) -> bool {
        self == ObjectKind::Creature
    }
}

/// An instance of a blueprint placed in a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameObject {
    pub blueprint: String,
    pub kind: ObjectKind,
}

impl GameObject {
    pub fn new(blueprint: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            blueprint: blueprint.into(),
            kind,
        }
    }

    pub fn is_wall(&self) -> bool {
        self.kind.is_wall()
    }
}

/// Maps blueprint names to their object kind.
///
/// Unknown blueprints are treated as plain items. The default catalog knows
/// the blueprints used by the built-in fort profiles and population tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintCatalog {
    #[serde(default)]
    kinds: HashMap<String, ObjectKind>,
}

impl BlueprintCatalog {
    /// Creates an empty catalog.
    pub fn empty() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    /// Registers or overrides the kind of a blueprint.
    pub fn register(&mut self, blueprint: impl Into<String>, kind: ObjectKind) {
        self.kinds.insert(blueprint.into(), kind);
    }

    /// Looks up the kind of a blueprint.
    ///
    /// # Examples
    ///
    /// ```
    /// use palisade::{BlueprintCatalog, ObjectKind};
    ///
    /// let catalog = BlueprintCatalog::default();
    /// assert_eq!(catalog.kind_of("WoodWall"), ObjectKind::Wall);
    /// assert_eq!(catalog.kind_of("Chest3"), ObjectKind::Container);
    /// assert_eq!(catalog.kind_of("Mystery Trinket"), ObjectKind::Item);
    /// ```
    pub fn kind_of(&self, blueprint: &str) -> ObjectKind {
        if let Some(kind) = self.kinds.get(blueprint) {
            return *kind;
        }

        // Numbered crate variants share the base crate's kind
        let base = blueprint.trim_end_matches(|c: char| c.is_ascii_digit());
        if base != blueprint {
            if let Some(kind) = self.kinds.get(base) {
                return *kind;
            }
        }

        ObjectKind::Item
    }

    /// Creates a new object for the blueprint.
    pub fn create(&self, blueprint: &str) -> GameObject {
        GameObject::new(blueprint, self.kind_of(blueprint))
    }

    /// Merges another catalog's entries over this one.
    pub fn extend(&mut self, other: &BlueprintCatalog) {
        for (blueprint, kind) in &other.kinds {
            self.kinds.insert(blueprint.clone(), *kind);
        }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for BlueprintCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();

        for wall in ["WoodWall", "MetalWall", "StoneWall", "Fulcrete"] {
            catalog.register(wall, ObjectKind::Wall);
        }
        catalog.register(config::DOOR_BLUEPRINT, ObjectKind::Door);
        catalog.register(config::FLOOR_BLUEPRINT, ObjectKind::Floor);
        catalog.register(config::CANYON_MARKER_BLUEPRINT, ObjectKind::Marker);
        catalog.register(config::CAMPFIRE_BLUEPRINT, ObjectKind::Furniture);
        catalog.register(config::SEATING_BLUEPRINT, ObjectKind::Furniture);
        catalog.register(config::CRATE_BLUEPRINT, ObjectKind::Container);
        catalog.register("Sconce", ObjectKind::Furniture);
        catalog.register("ChaingunTurret", ObjectKind::Creature);
        catalog.register("Watervine", ObjectKind::Widget);
        catalog.register("PowerGrid", ObjectKind::Widget);

        for creature in [
            "Watervine Farmer",
            "Joppa Guard",
            "Snapjaw Scavenger",
            "Glowfish",
            "Chrome Pyramid",
            "Waydroid",
            "Mechanimist Convert",
        ] {
            catalog.register(creature, ObjectKind::Creature);
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_classification() {
        let catalog = BlueprintCatalog::default();
        assert!(catalog.create("MetalWall").is_wall());
        assert_eq!(catalog.kind_of("Door"), ObjectKind::Door);
        assert_eq!(catalog.kind_of("DirtFloor"), ObjectKind::Floor);
        assert!(catalog.kind_of("Snapjaw Scavenger").is_combat());
        assert_eq!(catalog.kind_of("Chest"), ObjectKind::Container);
        assert_eq!(catalog.kind_of("Chest7"), ObjectKind::Container);
    }

    #[test]
    fn test_catalog_override_and_extend() {
        let mut catalog = BlueprintCatalog::default();
        let mut extra = BlueprintCatalog::empty();
        extra.register("Bramble", ObjectKind::Wall);
        extra.register("Sconce", ObjectKind::Item);
        catalog.extend(&extra);

        assert_eq!(catalog.kind_of("Bramble"), ObjectKind::Wall);
        assert_eq!(catalog.kind_of("Sconce"), ObjectKind::Item);
    }

    #[test]
    fn test_catalog_deserializes_from_json() {
        let json = r#"{ "kinds": { "Palisade": "Wall", "Rat": "Creature" } }"#;
        let catalog: BlueprintCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.kind_of("Palisade"), ObjectKind::Wall);
        assert_eq!(catalog.kind_of("Rat"), ObjectKind::Creature);
    }
}
