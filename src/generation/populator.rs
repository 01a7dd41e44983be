//! # Zone Population
//!
//! Fills a built fort with inhabitants, widgets, campfires and storage.

use crate::{
    config, place_object_in_area, LayoutConfig, PalisadeError, PalisadeResult,
    PopulationResolver, Position, Room, Zone,
};
use rand::Rng;

/// Splits a comma-separated list, dropping blank entries.
fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}

/// Populates zones and furnishes rooms.
#[derive(Debug, Clone)]
pub struct ZonePopulator<'a> {
    config: &'a LayoutConfig,
}

impl<'a> ZonePopulator<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Resolves each table in a comma-separated list against the zone tier
    /// and places every result somewhere in the zone.
    ///
    /// Returns how many objects were placed.
    pub fn populate_zone<P, R>(
        &self,
        zone: &mut Zone,
        tables: &str,
        resolver: &P,
        rng: &mut R,
    ) -> PalisadeResult<usize>
    where
        P: PopulationResolver + ?Sized,
        R: Rng,
    {
        let tier = zone.tier.to_string();
        let area = zone.area();
        let mut placed = 0;

        for table in split_list(tables) {
            let results = resolver.generate(table, config::ZONE_TIER_KEY, &tier, rng);
            log::debug!("table '{}' produced {} results", table, results.len());

            for result in results {
                let object = zone.catalog().create(&result.blueprint);
                if place_object_in_area(zone, area, object, 0, 0, &result.hint, rng)?.is_some() {
                    placed += 1;
                }
            }
        }

        Ok(placed)
    }

    /// Adds each comma-separated widget blueprint at the zone origin.
    pub fn place_widgets(&self, zone: &mut Zone, widgets: &str) -> PalisadeResult<usize> {
        let mut placed = 0;
        for widget in split_list(widgets) {
            zone.add_blueprint(Position::origin(), widget)?;
            placed += 1;
        }
        Ok(placed)
    }

    /// Scatters storage containers inside every room with a floor.
    ///
    /// Containers may stack on the same cell. A variant chance outside
    /// [0, 1] is rejected before anything is placed.
    pub fn add_storage_crates<R: Rng + ?Sized>(
        &self,
        zone: &mut Zone,
        rooms: &[Room],
        rng: &mut R,
    ) -> PalisadeResult<Vec<Position>> {
        if !(0.0..=1.0).contains(&self.config.crate_variant_chance) {
            return Err(PalisadeError::InvalidConfig(format!(
                "crate_variant_chance {} is not a probability",
                self.config.crate_variant_chance
            )));
        }

        let mut crates = Vec::new();

        for room in rooms {
            if room.width() < 3 || room.height() < 3 {
                continue;
            }

            let interior = room.interior();
            let count = self.config.crate_count.roll(rng);
            for _ in 0..count {
                let pos = Position::new(
                    rng.gen_range(interior.x1..=interior.x2),
                    rng.gen_range(interior.y1..=interior.y2),
                );
                let blueprint = self.crate_blueprint(rng);
                zone.add_blueprint(pos, &blueprint)?;
                crates.push(pos);
            }
        }

        Ok(crates)
    }

    fn crate_blueprint<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        if self.config.crate_variants >= 1 && rng.gen_bool(self.config.crate_variant_chance) {
            let variant = rng.gen_range(1..=self.config.crate_variants);
            format!("{}{}", config::CRATE_BLUEPRINT, variant)
        } else {
            config::CRATE_BLUEPRINT.to_string()
        }
    }

    /// Puts a campfire ringed by seating in the middle of each large room.
    ///
    /// Returns the campfire positions.
    pub fn add_campfires_and_seating(
        &self,
        zone: &mut Zone,
        rooms: &[Room],
    ) -> PalisadeResult<Vec<Position>> {
        let min = self.config.campfire_min_dimension;
        let mut campfires = Vec::new();

        for room in rooms {
            if room.width() < min || room.height() < min {
                continue;
            }

            let center = room.center();
            zone.add_blueprint(center, config::CAMPFIRE_BLUEPRINT)?;
            for seat in center.diagonal_positions() {
                zone.add_blueprint(seat, config::SEATING_BLUEPRINT)?;
            }
            campfires.push(center);
        }

        Ok(campfires)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils::create_rng;
    use crate::{IntRange, PopulationEntry, PopulationTable, PopulationTables, Rect};

    #[test]
    fn test_split_list() {
        let entries: Vec<&str> = split_list(" A, ,B ,, C ").collect();
        assert_eq!(entries, vec!["A", "B", "C"]);
        assert_eq!(split_list("").count(), 0);
    }

    #[test]
    fn test_populate_zone_places_results() {
        let config = LayoutConfig::new();
        let populator = ZonePopulator::new(&config);
        let mut tables = PopulationTables::new();
        tables.insert(
            "Farm",
            PopulationTable::new(
                IntRange::single(4),
                vec![PopulationEntry::new("Watervine Farmer", 1)],
            ),
        );

        let mut zone = Zone::standard(2);
        let placed = populator
            .populate_zone(&mut zone, "Farm, Missing,", &tables, &mut create_rng(3))
            .unwrap();

        assert_eq!(placed, 4);
        assert_eq!(zone.count_blueprint("Watervine Farmer"), 4);
    }

    #[test]
    fn test_empty_table_list_is_a_no_op() {
        let config = LayoutConfig::new();
        let populator = ZonePopulator::new(&config);
        let mut zone = Zone::standard(1);

        let placed = populator
            .populate_zone(&mut zone, "", &PopulationTables::builtin(), &mut create_rng(1))
            .unwrap();
        assert_eq!(placed, 0);
        assert!(zone.cells().all(|cell| cell.is_empty()));
    }

    #[test]
    fn test_widgets_at_origin() {
        let config = LayoutConfig::new();
        let populator = ZonePopulator::new(&config);
        let mut zone = Zone::standard(1);

        assert_eq!(populator.place_widgets(&mut zone, "Watervine, PowerGrid").unwrap(), 2);
        let origin = zone.get_cell(Position::origin()).unwrap();
        assert!(origin.has_blueprint("Watervine"));
        assert!(origin.has_blueprint("PowerGrid"));
        assert_eq!(populator.place_widgets(&mut zone, " ").unwrap(), 0);
    }

    #[test]
    fn test_crates_stay_inside_rooms() {
        let config = LayoutConfig::new();
        let populator = ZonePopulator::new(&config);
        let rooms = vec![
            Room::new(0, Rect::new(5, 5, 14, 12), false),
            Room::new(1, Rect::new(20, 5, 22, 7), false),
        ];

        for seed in 0..30 {
            let mut zone = Zone::standard(1);
            let crates = populator
                .add_storage_crates(&mut zone, &rooms, &mut create_rng(seed))
                .unwrap();

            for room in &rooms {
                let inside = crates.iter().filter(|pos| room.interior().contains(**pos)).count();
                assert!((1..=3).contains(&inside), "seed {}", seed);
            }
            assert!(crates
                .iter()
                .all(|pos| rooms.iter().any(|room| room.interior().contains(*pos))));
        }
    }

    #[test]
    fn test_crate_variants() {
        let config = LayoutConfig::new();
        let populator = ZonePopulator::new(&config);
        let mut rng = create_rng(17);
        let mut plain = 0;

        for _ in 0..400 {
            let blueprint = populator.crate_blueprint(&mut rng);
            if blueprint == "Chest" {
                plain += 1;
                continue;
            }
            let variant: i32 = blueprint.trim_start_matches("Chest").parse().unwrap();
            assert!((1..=7).contains(&variant));
        }
        assert!(plain > 100 && plain < 300);
    }

    #[test]
    fn test_crates_reject_bad_variant_chance() {
        let rooms = vec![Room::new(0, Rect::new(5, 5, 15, 12), false)];

        for chance in [2.0, -0.5, f64::NAN] {
            let mut config = LayoutConfig::new();
            config.crate_variant_chance = chance;
            let populator = ZonePopulator::new(&config);
            let mut zone = Zone::standard(1);

            let result = populator.add_storage_crates(&mut zone, &rooms, &mut create_rng(3));
            assert!(matches!(result, Err(PalisadeError::InvalidConfig(_))));
            assert!(zone.cells().all(|cell| cell.is_empty()));
        }
    }

    #[test]
    fn test_small_rooms_get_no_crates() {
        let config = LayoutConfig::new();
        let populator = ZonePopulator::new(&config);
        let rooms = vec![Room::new(0, Rect::new(5, 5, 6, 20), false)];
        let mut zone = Zone::standard(1);

        let crates = populator
            .add_storage_crates(&mut zone, &rooms, &mut create_rng(0))
            .unwrap();
        assert!(crates.is_empty());
    }

    #[test]
    fn test_campfire_and_seating() {
        let config = LayoutConfig::new();
        let populator = ZonePopulator::new(&config);
        let rooms = vec![
            Room::new(0, Rect::new(10, 4, 20, 12), false),
            Room::new(1, Rect::new(30, 4, 34, 12), false),
        ];
        let mut zone = Zone::standard(1);

        let campfires = populator.add_campfires_and_seating(&mut zone, &rooms).unwrap();
        assert_eq!(campfires, vec![Position::new(15, 8)]);
        assert_eq!(zone.count_blueprint("Campfire"), 1);
        assert_eq!(zone.count_blueprint("Floor Cushion"), 4);
        for seat in Position::new(15, 8).diagonal_positions() {
            assert!(zone.get_cell(seat).unwrap().has_blueprint("Floor Cushion"));
        }
    }
}
