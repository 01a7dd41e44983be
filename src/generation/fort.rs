//! # Fort Maker
//!
//! Sequences the generation steps into one build over a zone.
//!
//! A build runs the same linear sequence every time:
//!
//! 1. Search for a footprint (the only step that can fail)
//! 2. Clear the footprint, optionally dropping combat objects
//! 3. Lay floor, raise the outer wall, register the structure
//! 4. Strip walls from canyon marker cells
//! 5. Pack rooms, stamp interior partitions, give rooms doors
//! 6. Populate from tables, add widgets, open fort entrances
//! 7. Furnish rooms with campfires and storage
//!
//! Faction flavour comes from a [`FortProfile`] and optional post-build
//! decoration, both applied only after the sequence succeeds.

use crate::generation::ZoneBuilder;
use crate::{
    config, ConnectivityDoorPlacer, LayoutConfig, PalisadeError, PalisadeResult,
    PopulationResolver, PopulationTables, Position, Rect, Room, RoomLayoutPlanner,
    RoomStructureBuilder, Zone, ZonePopulator,
};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Independent per-cell rolls for turrets and power sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerimeterDefenses {
    pub turret_blueprint: String,
    /// Chance per zone edge cell
    pub turret_chance: f64,
    pub power_blueprint: String,
    /// Chance per zone cell
    pub power_chance: f64,
}

impl PerimeterDefenses {
    pub fn new() -> Self {
        Self {
            turret_blueprint: "ChaingunTurret".to_string(),
            turret_chance: 0.5,
            power_blueprint: "Sconce".to_string(),
            power_chance: 0.05,
        }
    }

    /// Rolls turrets along the zone edge, then power sources over every
    /// cell. Returns the number of turrets and power sources placed.
    ///
    /// Chances outside [0, 1] are rejected before the zone is touched.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        zone: &mut Zone,
        rng: &mut R,
    ) -> PalisadeResult<(usize, usize)> {
        self.validate()?;
        let positions: Vec<Position> = zone.positions().collect();

        let mut turrets = 0;
        for &pos in &positions {
            if zone.is_edge(pos) && rng.gen_bool(self.turret_chance) {
                zone.add_blueprint(pos, &self.turret_blueprint)?;
                turrets += 1;
            }
        }

        let mut power = 0;
        for &pos in &positions {
            if rng.gen_bool(self.power_chance) {
                zone.add_blueprint(pos, &self.power_blueprint)?;
                power += 1;
            }
        }

        log::debug!("defenses placed {} turrets and {} power sources", turrets, power);
        Ok((turrets, power))
    }

    /// Checks that both chances are probabilities.
    pub fn validate(&self) -> PalisadeResult<()> {
        for (name, chance) in [
            ("turret_chance", self.turret_chance),
            ("power_chance", self.power_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(PalisadeError::InvalidConfig(format!(
                    "{} {} is not a probability",
                    name, chance
                )));
            }
        }
        Ok(())
    }
}

impl Default for PerimeterDefenses {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything that distinguishes one faction's fort from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FortProfile {
    /// Faction owning the fort, used for logging
    pub faction: String,
    /// Remove combat objects from the footprint before building
    pub clear_combat_objects: bool,
    pub wall_blueprint: String,
    /// Comma-separated population tables
    pub zone_table: String,
    /// Comma-separated widget blueprints
    pub widgets: String,
    pub layout: LayoutConfig,
    pub defenses: Option<PerimeterDefenses>,
}

impl FortProfile {
    /// The Joppa farming fort.
    ///
    /// # Examples
    ///
    /// ```
    /// use palisade::FortProfile;
    ///
    /// let profile = FortProfile::joppa();
    /// assert_eq!(profile.wall_blueprint, "WoodWall");
    /// assert!(profile.validate().is_ok());
    /// ```
    pub fn joppa() -> Self {
        Self {
            faction: "Joppa".to_string(),
            clear_combat_objects: true,
            wall_blueprint: "WoodWall".to_string(),
            zone_table: "Joppa Outskirts".to_string(),
            widgets: "Watervine".to_string(),
            layout: LayoutConfig::new(),
            defenses: Some(PerimeterDefenses::new()),
        }
    }

    /// The robot-held ruin.
    pub fn robots() -> Self {
        Self {
            faction: "Robots".to_string(),
            wall_blueprint: "MetalWall".to_string(),
            zone_table: "RuinsZoneGlobals-Robots".to_string(),
            widgets: "PowerGrid".to_string(),
            ..Self::joppa()
        }
    }

    /// A bare shell with no rooms, population or defenses.
    pub fn for_testing() -> Self {
        Self {
            faction: "Test".to_string(),
            clear_combat_objects: false,
            wall_blueprint: "WoodWall".to_string(),
            zone_table: String::new(),
            widgets: String::new(),
            layout: LayoutConfig::shell_only(),
            defenses: None,
        }
    }

    /// Looks up a built-in profile by name.
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "joppa" => Some(Self::joppa()),
            "robots" | "robot" => Some(Self::robots()),
            _ => None,
        }
    }

    /// Loads and validates a profile from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> PalisadeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let profile: Self = serde_json::from_str(&text)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> PalisadeResult<()> {
        if self.wall_blueprint.trim().is_empty() {
            return Err(PalisadeError::InvalidConfig(
                "wall_blueprint cannot be empty".to_string(),
            ));
        }

        self.layout.validate()?;

        if let Some(defenses) = &self.defenses {
            defenses.validate()?;
        }

        Ok(())
    }
}

impl Default for FortProfile {
    fn default() -> Self {
        Self::joppa()
    }
}

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FortLayout {
    pub footprint: Rect,
    pub rooms: Vec<Room>,
    pub room_doors: Vec<Position>,
    pub fort_doors: Vec<Position>,
    pub crates: Vec<Position>,
    pub campfires: Vec<Position>,
    /// Objects placed from population tables
    pub population: usize,
    pub turrets: usize,
    pub power_sources: usize,
}

/// Caller-supplied work run over the zone after a successful build.
pub type Decoration = Box<dyn Fn(&mut Zone, &FortLayout, &mut StdRng) -> PalisadeResult<()>>;

/// Builds a fort into a zone.
pub struct FortMaker<P: PopulationResolver = PopulationTables> {
    profile: FortProfile,
    resolver: P,
    decoration: Option<Decoration>,
}

impl FortMaker<PopulationTables> {
    /// Creates a fort maker resolving population from the built-in tables.
    pub fn new(profile: FortProfile) -> Self {
        Self::with_resolver(profile, PopulationTables::builtin())
    }
}

impl<P: PopulationResolver> FortMaker<P> {
    pub fn with_resolver(profile: FortProfile, resolver: P) -> Self {
        Self {
            profile,
            resolver,
            decoration: None,
        }
    }

    /// Adds a decoration step run after every successful build.
    pub fn with_decoration<F>(mut self, decoration: F) -> Self
    where
        F: Fn(&mut Zone, &FortLayout, &mut StdRng) -> PalisadeResult<()> + 'static,
    {
        self.decoration = Some(Box::new(decoration));
        self
    }

    pub fn profile(&self) -> &FortProfile {
        &self.profile
    }

    /// Runs the full build sequence.
    ///
    /// Fails with [`PalisadeError::GenerationFailed`] when no footprint
    /// fits the zone, in which case the zone is left untouched. Every
    /// later step is best effort.
    pub fn build(&self, zone: &mut Zone, rng: &mut StdRng) -> PalisadeResult<FortLayout> {
        self.profile.validate()?;

        let layout_config = &self.profile.layout;
        let wall = self.profile.wall_blueprint.as_str();
        let planner = RoomLayoutPlanner::new(layout_config);

        let footprint = planner
            .generate_footprint(zone.width, zone.height, rng)
            .ok_or_else(|| {
                PalisadeError::GenerationFailed(format!(
                    "no fort footprint fits a {}x{} zone",
                    zone.width, zone.height
                ))
            })?;
        log::debug!("{} fort footprint {:?}", self.profile.faction, footprint);

        zone.clear_box(footprint)?;
        if self.profile.clear_combat_objects {
            clear_combat_objects(zone, footprint)?;
        }

        zone.fill_box(footprint, config::FLOOR_BLUEPRINT)?;
        zone.fill_hollow_box(footprint, wall)?;
        zone.mark_structure(footprint);
        remove_canyon_markers(zone, footprint)?;

        let mut rooms = planner.plan_rooms(zone, footprint, wall, rng)?;
        RoomStructureBuilder::new(layout_config).build(zone, &mut rooms, wall, rng)?;

        let doors = ConnectivityDoorPlacer::new(layout_config.door_attempts);
        let room_doors = doors.add_room_doors(zone, &rooms, &footprint, rng)?;

        let populator = ZonePopulator::new(layout_config);
        let population =
            populator.populate_zone(zone, &self.profile.zone_table, &self.resolver, rng)?;
        populator.place_widgets(zone, &self.profile.widgets)?;

        let fort_doors = doors.add_fort_doors(zone, &footprint, rng)?;
        let campfires = populator.add_campfires_and_seating(zone, &rooms)?;
        let crates = populator.add_storage_crates(zone, &rooms, rng)?;

        let mut layout = FortLayout {
            footprint,
            rooms,
            room_doors,
            fort_doors,
            crates,
            campfires,
            population,
            turrets: 0,
            power_sources: 0,
        };

        if let Some(defenses) = &self.profile.defenses {
            let (turrets, power_sources) = defenses.apply(zone, rng)?;
            layout.turrets = turrets;
            layout.power_sources = power_sources;
        }

        if let Some(decoration) = &self.decoration {
            decoration(zone, &layout, rng)?;
        }

        log::info!(
            "{} fort built: {} rooms, {} room doors, {} entrances",
            self.profile.faction,
            layout.rooms.len(),
            layout.room_doors.len(),
            layout.fort_doors.len()
        );

        Ok(layout)
    }
}

impl<P: PopulationResolver> ZoneBuilder for FortMaker<P> {
    fn build_zone(&self, zone: &mut Zone, rng: &mut StdRng) -> bool {
        match self.build(zone, rng) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("{} fort abandoned: {}", self.profile.faction, e);
                false
            }
        }
    }

    fn builder_type(&self) -> &'static str {
        "FortMaker"
    }
}

impl<P: PopulationResolver> fmt::Debug for FortMaker<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FortMaker")
            .field("profile", &self.profile)
            .field("decorated", &self.decoration.is_some())
            .finish()
    }
}

fn clear_combat_objects(zone: &mut Zone, area: Rect) -> PalisadeResult<()> {
    for pos in area.positions() {
        if let Some(cell) = zone.get_cell_mut(pos) {
            cell.objects.retain(|object| !object.kind.is_combat());
        } else {
            return Err(PalisadeError::OutOfBounds(pos));
        }
    }
    Ok(())
}

/// Canyon marker cells cannot hold walls, even the fort's own.
fn remove_canyon_markers(zone: &mut Zone, area: Rect) -> PalisadeResult<usize> {
    let mut cleared = 0;
    for pos in area.positions() {
        let cell = zone
            .get_cell_mut(pos)
            .ok_or(PalisadeError::OutOfBounds(pos))?;
        if cell.has_blueprint(config::CANYON_MARKER_BLUEPRINT) {
            cleared += cell.clear_walls();
        }
    }
    if cleared > 0 {
        log::debug!("removed {} walls from canyon marker cells", cleared);
    }
    Ok(cleared)
}
