//! # Population Tables
//!
//! Weighted tables that turn a table name and zone tier into blueprints,
//! and the placement routine that finds room for each result.

use crate::{config, GameObject, IntRange, PalisadeResult, Position, Rect, Zone};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Maximum depth of `@Table` references followed during resolution.
const MAX_TABLE_DEPTH: usize = 8;

/// One resolved blueprint and where it would like to be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationResult {
    pub blueprint: String,
    #[serde(default)]
    pub hint: String,
}

/// Resolves population table names into blueprints.
pub trait PopulationResolver {
    /// Generates results for a table, scoped by a tier variable.
    fn generate(
        &self,
        table: &str,
        tier_key: &str,
        tier_value: &str,
        rng: &mut dyn rand::RngCore,
    ) -> Vec<PopulationResult>;
}

/// A weighted entry in a population table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationEntry {
    /// Blueprint name, or `@Name` to roll on another table
    pub blueprint: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Copies produced when this entry is picked
    #[serde(default = "default_number")]
    pub number: IntRange,
    #[serde(default)]
    pub hint: String,
    /// Zone tiers this entry is available in
    #[serde(default)]
    pub tiers: Option<IntRange>,
}

fn default_weight() -> u32 {
    1
}

fn default_number() -> IntRange {
    IntRange::single(1)
}

impl PopulationEntry {
    pub fn new(blueprint: impl Into<String>, weight: u32) -> Self {
        Self {
            blueprint: blueprint.into(),
            weight,
            number: default_number(),
            hint: String::new(),
            tiers: None,
        }
    }

    pub fn with_number(mut self, number: IntRange) -> Self {
        self.number = number;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn with_tiers(mut self, tiers: IntRange) -> Self {
        self.tiers = Some(tiers);
        self
    }
}

/// A named table: a number of weighted rolls over its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationTable {
    #[serde(default = "default_number")]
    pub rolls: IntRange,
    pub entries: Vec<PopulationEntry>,
}

impl PopulationTable {
    pub fn new(rolls: IntRange, entries: Vec<PopulationEntry>) -> Self {
        Self { rolls, entries }
    }
}

/// In-memory population tables keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationTables {
    pub tables: HashMap<String, PopulationTable>,
}

impl PopulationTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, table: PopulationTable) {
        self.tables.insert(name.into(), table);
    }

    pub fn get(&self, name: &str) -> Option<&PopulationTable> {
        self.tables.get(name)
    }

    /// Loads tables from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> PalisadeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Tables used by the built-in fort profiles.
    pub fn builtin() -> Self {
        let mut tables = Self::new();

        tables.insert(
            "Joppa Outskirts",
            PopulationTable::new(
                IntRange::new(2, 4),
                vec![
                    PopulationEntry::new("Watervine Farmer", 6)
                        .with_number(IntRange::new(1, 3))
                        .with_hint("Inside"),
                    PopulationEntry::new("Joppa Guard", 3).with_hint("Inside"),
                    PopulationEntry::new("Glowfish", 2).with_hint("Outside"),
                    PopulationEntry::new("@Joppa Outskirts Scavengers", 1),
                ],
            ),
        );
        tables.insert(
            "Joppa Outskirts Scavengers",
            PopulationTable::new(
                IntRange::single(1),
                vec![PopulationEntry::new("Snapjaw Scavenger", 1)
                    .with_number(IntRange::new(1, 2))
                    .with_hint("Outside")
                    .with_tiers(IntRange::new(1, 3))],
            ),
        );
        tables.insert(
            "RuinsZoneGlobals-Robots",
            PopulationTable::new(
                IntRange::new(2, 5),
                vec![
                    PopulationEntry::new("Waydroid", 5).with_hint("Inside"),
                    PopulationEntry::new("Chrome Pyramid", 2)
                        .with_hint("Outside")
                        .with_tiers(IntRange::new(2, 8)),
                    PopulationEntry::new("Mechanimist Convert", 2).with_hint("Inside"),
                    PopulationEntry::new("Scrap Metal", 4).with_number(IntRange::new(1, 4)),
                ],
            ),
        );

        tables
    }

    fn resolve(
        &self,
        table: &str,
        tier: Option<i32>,
        depth: usize,
        rng: &mut dyn rand::RngCore,
        out: &mut Vec<PopulationResult>,
    ) {
        if depth > MAX_TABLE_DEPTH {
            log::warn!("population table '{}' nests too deeply, stopping", table);
            return;
        }

        let Some(definition) = self.tables.get(table) else {
            log::warn!("unknown population table '{}'", table);
            return;
        };

        let available: Vec<&PopulationEntry> = definition
            .entries
            .iter()
            .filter(|entry| entry.weight > 0)
            .filter(|entry| match (entry.tiers, tier) {
                (Some(range), Some(tier)) => range.contains(tier),
                _ => true,
            })
            .collect();

        if available.is_empty() {
            return;
        }

        let Ok(weights) = WeightedIndex::new(available.iter().map(|entry| entry.weight)) else {
            return;
        };

        let rolls = definition.rolls.roll(rng);
        for _ in 0..rolls {
            let entry = available[weights.sample(rng)];
            let copies = entry.number.roll(rng);

            for _ in 0..copies {
                match entry.blueprint.strip_prefix('@') {
                    Some(nested) => self.resolve(nested, tier, depth + 1, rng, out),
                    None => out.push(PopulationResult {
                        blueprint: entry.blueprint.clone(),
                        hint: entry.hint.clone(),
                    }),
                }
            }
        }
    }
}

impl PopulationResolver for PopulationTables {
    fn generate(
        &self,
        table: &str,
        tier_key: &str,
        tier_value: &str,
        rng: &mut dyn rand::RngCore,
    ) -> Vec<PopulationResult> {
        let tier = if tier_key == config::ZONE_TIER_KEY {
            tier_value.trim().parse::<i32>().ok()
        } else {
            None
        };

        let mut results = Vec::new();
        self.resolve(table, tier, 0, rng, &mut results);
        results
    }
}

/// Where an object prefers to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementHint {
    Anywhere,
    /// Inside a structure footprint registered on the zone
    Inside,
    /// Outside every registered structure
    Outside,
    /// On the outermost ring of the zone
    Edge,
    /// Exactly at the supplied coordinates
    Fixed,
}

impl PlacementHint {
    /// Parses a table hint; anything unrecognised means anywhere.
    ///
    /// # Examples
    ///
    /// ```
    /// use palisade::PlacementHint;
    ///
    /// assert_eq!(PlacementHint::parse("Inside"), PlacementHint::Inside);
    /// assert_eq!(PlacementHint::parse(" edge "), PlacementHint::Edge);
    /// assert_eq!(PlacementHint::parse(""), PlacementHint::Anywhere);
    /// ```
    pub fn parse(hint: &str) -> Self {
        match hint.trim().to_ascii_lowercase().as_str() {
            "inside" => PlacementHint::Inside,
            "outside" => PlacementHint::Outside,
            "edge" => PlacementHint::Edge,
            "fixed" => PlacementHint::Fixed,
            _ => PlacementHint::Anywhere,
        }
    }

    fn accepts(self, zone: &Zone, pos: Position, fixed: Position) -> bool {
        match self {
            PlacementHint::Anywhere => true,
            PlacementHint::Inside => zone.is_inside_structure(pos),
            PlacementHint::Outside => !zone.is_inside_structure(pos),
            PlacementHint::Edge => zone.is_edge(pos),
            PlacementHint::Fixed => pos == fixed,
        }
    }
}

/// Places an object somewhere in `area` that suits the hint.
///
/// Only cells without walls are considered. When nothing suits the hint the
/// placement falls back to any open cell in the area. Returns the chosen
/// position, or `None` if the area has no open cell at all.
pub fn place_object_in_area<R: Rng + ?Sized>(
    zone: &mut Zone,
    area: Rect,
    object: GameObject,
    x_hint: i32,
    y_hint: i32,
    hint: &str,
    rng: &mut R,
) -> PalisadeResult<Option<Position>> {
    let hint = PlacementHint::parse(hint);
    let fixed = Position::new(x_hint, y_hint);

    let open: Vec<Position> = area
        .positions()
        .filter(|pos| zone.is_open(*pos))
        .collect();

    let preferred: Vec<Position> = open
        .iter()
        .copied()
        .filter(|pos| hint.accepts(zone, *pos, fixed))
        .collect();

    let candidates = if preferred.is_empty() { &open } else { &preferred };
    if candidates.is_empty() {
        log::warn!(
            "no open cell in {:?} for {}, skipping",
            area,
            object.blueprint
        );
        return Ok(None);
    }

    let pos = candidates[rng.gen_range(0..candidates.len())];
    zone.add_object(pos, object)?;
    Ok(Some(pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils::create_rng;

    #[test]
    fn test_builtin_tables_resolve() {
        let tables = PopulationTables::builtin();
        let mut rng = create_rng(4);

        let results = tables.generate("RuinsZoneGlobals-Robots", "zonetier", "3", &mut rng);
        assert!(!results.is_empty());
        let known = ["Waydroid", "Chrome Pyramid", "Mechanimist Convert", "Scrap Metal"];
        assert!(results.iter().all(|r| known.contains(&r.blueprint.as_str())));
    }

    #[test]
    fn test_unknown_table_is_empty() {
        let tables = PopulationTables::builtin();
        let results = tables.generate("No Such Table", "zonetier", "1", &mut create_rng(1));
        assert!(results.is_empty());
    }

    #[test]
    fn test_tier_filtering() {
        let mut tables = PopulationTables::new();
        tables.insert(
            "Tiered",
            PopulationTable::new(
                IntRange::single(20),
                vec![
                    PopulationEntry::new("Low", 1).with_tiers(IntRange::new(1, 2)),
                    PopulationEntry::new("High", 1).with_tiers(IntRange::new(5, 8)),
                ],
            ),
        );

        let low = tables.generate("Tiered", "zonetier", "1", &mut create_rng(2));
        assert_eq!(low.len(), 20);
        assert!(low.iter().all(|r| r.blueprint == "Low"));

        let none = tables.generate("Tiered", "zonetier", "3", &mut create_rng(2));
        assert!(none.is_empty());

        // Without a tier variable every entry is eligible
        let any = tables.generate("Tiered", "other", "3", &mut create_rng(2));
        assert_eq!(any.len(), 20);
    }

    #[test]
    fn test_nested_tables_and_copies() {
        let mut tables = PopulationTables::new();
        tables.insert(
            "Outer",
            PopulationTable::new(
                IntRange::single(1),
                vec![PopulationEntry::new("@Inner", 1).with_number(IntRange::single(2))],
            ),
        );
        tables.insert(
            "Inner",
            PopulationTable::new(
                IntRange::single(1),
                vec![PopulationEntry::new("Rat", 1)
                    .with_number(IntRange::single(3))
                    .with_hint("Edge")],
            ),
        );

        let results = tables.generate("Outer", "zonetier", "1", &mut create_rng(0));
        assert_eq!(results.len(), 6);
        assert!(results.iter().all(|r| r.blueprint == "Rat" && r.hint == "Edge"));
    }

    #[test]
    fn test_self_referencing_table_terminates() {
        let mut tables = PopulationTables::new();
        tables.insert(
            "Loop",
            PopulationTable::new(IntRange::single(1), vec![PopulationEntry::new("@Loop", 1)]),
        );
        assert!(tables
            .generate("Loop", "zonetier", "1", &mut create_rng(0))
            .is_empty());
    }

    #[test]
    fn test_tables_deserialize_with_defaults() {
        let json = r#"{
            "tables": {
                "Camp": { "entries": [ { "blueprint": "Tent" } ] }
            }
        }"#;
        let tables: PopulationTables = serde_json::from_str(json).unwrap();
        let camp = tables.get("Camp").unwrap();
        assert_eq!(camp.rolls, IntRange::single(1));
        assert_eq!(camp.entries[0].weight, 1);
        assert_eq!(camp.entries[0].number, IntRange::single(1));
    }

    #[test]
    fn test_placement_respects_hint() {
        let mut zone = Zone::new(20, 20, 1);
        let footprint = Rect::new(5, 5, 12, 12);
        zone.mark_structure(footprint);
        let whole = zone.area();
        let mut rng = create_rng(6);

        for _ in 0..20 {
            let object = zone.catalog().create("Waydroid");
            let pos = place_object_in_area(&mut zone, whole, object, 0, 0, "Inside", &mut rng)
                .unwrap()
                .unwrap();
            assert!(footprint.contains(pos));
        }

        let object = zone.catalog().create("Glowfish");
        let pos = place_object_in_area(&mut zone, whole, object, 0, 0, "Edge", &mut rng)
            .unwrap()
            .unwrap();
        assert!(zone.is_edge(pos));
    }

    #[test]
    fn test_fixed_placement_and_fallback() {
        let mut zone = Zone::new(10, 10, 1);
        let mut rng = create_rng(2);

        let area = zone.area();
        let object = zone.catalog().create("Chest");
        let pos = place_object_in_area(&mut zone, area, object, 3, 4, "Fixed", &mut rng).unwrap();
        assert_eq!(pos, Some(Position::new(3, 4)));

        // Fixed spot walled off: fall back to any open cell
        zone.add_blueprint(Position::new(6, 6), "WoodWall").unwrap();
        let object = zone.catalog().create("Chest");
        let pos = place_object_in_area(&mut zone, area, object, 6, 6, "Fixed", &mut rng)
            .unwrap()
            .unwrap();
        assert_ne!(pos, Position::new(6, 6));
    }

    #[test]
    fn test_placement_without_open_cells() {
        let mut zone = Zone::new(6, 6, 1);
        let area = Rect::new(1, 1, 2, 2);
        zone.fill_box(area, "WoodWall").unwrap();

        let object = zone.catalog().create("Chest");
        let pos = place_object_in_area(&mut zone, area, object, 0, 0, "", &mut create_rng(0)).unwrap();
        assert!(pos.is_none());
    }
}
