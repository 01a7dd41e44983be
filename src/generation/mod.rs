//! # Generation Module
//!
//! Procedural fort generation: footprint search, room packing, interior
//! partitions, connectivity doors and population.
//!
//! Every step takes the zone and an explicit random source. The steps are
//! sequenced by [`FortMaker`], but each is usable on its own.

pub mod boxes;
pub mod doors;
pub mod fort;
pub mod layout;
pub mod population;
pub mod populator;
pub mod reachability;
pub mod structures;
pub mod template;

pub use boxes::*;
pub use doors::*;
pub use fort::*;
pub use layout::*;
pub use population::*;
pub use populator::*;
pub use reachability::*;
pub use structures::*;
pub use template::*;

use crate::{IntRange, PalisadeError, PalisadeResult, Zone};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Size limits and retry budgets for fort layout.
///
/// Footprint and room sizes are corner-to-corner spans handed to the box
/// generator; see [`BoxRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Span of the candidate footprint along x
    pub footprint_width: IntRange,
    /// Span of the candidate footprint along y
    pub footprint_height: IntRange,
    /// Cells kept free between the footprint search bounds and the zone edge
    pub footprint_margin: i32,
    /// Number of rooms to attempt
    pub room_count: IntRange,
    /// Span of packed room candidates along x
    pub room_width: IntRange,
    /// Span of packed room candidates along y
    pub room_height: IntRange,
    /// Allowed gap between packed room candidates
    pub room_spacing: IntRange,
    /// Random draws per box before the packer gives up on it
    pub placement_attempts: u32,
    /// Rooms must exceed this area to receive interior partitions
    pub structure_min_area: i32,
    /// Rooms must exceed this width and height to receive partitions
    pub structure_min_dimension: i32,
    /// Subdivision passes for interior templates
    pub template_variant: u32,
    /// Door placement attempts per room
    pub door_attempts: u32,
    /// Storage containers per qualifying room
    pub crate_count: IntRange,
    /// Number of numbered container variants
    pub crate_variants: i32,
    /// Chance that a container uses a numbered variant
    pub crate_variant_chance: f64,
    /// Rooms need at least this width and height for a campfire
    pub campfire_min_dimension: i32,
}

impl LayoutConfig {
    /// Creates the standard fort layout configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use palisade::LayoutConfig;
    ///
    /// let config = LayoutConfig::new();
    /// assert_eq!(config.door_attempts, 1000);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new() -> Self {
        Self {
            footprint_width: IntRange::new(30, 50),
            footprint_height: IntRange::new(16, 24),
            footprint_margin: 1,
            room_count: IntRange::new(1, 8),
            room_width: IntRange::new(9, 40),
            room_height: IntRange::new(8, 14),
            room_spacing: IntRange::new(6, 999),
            placement_attempts: 100,
            structure_min_area: 25,
            structure_min_dimension: 4,
            template_variant: 1,
            door_attempts: 1000,
            crate_count: IntRange::new(1, 3),
            crate_variants: 7,
            crate_variant_chance: 0.5,
            campfire_min_dimension: 6,
        }
    }

    /// A layout that never packs rooms, leaving a bare walled shell.
    pub fn shell_only() -> Self {
        Self {
            room_count: IntRange::single(0),
            ..Self::new()
        }
    }

    /// Checks that every range is ordered and every chance is a probability.
    pub fn validate(&self) -> PalisadeResult<()> {
        let ranges = [
            ("footprint_width", self.footprint_width),
            ("footprint_height", self.footprint_height),
            ("room_count", self.room_count),
            ("room_width", self.room_width),
            ("room_height", self.room_height),
            ("room_spacing", self.room_spacing),
            ("crate_count", self.crate_count),
        ];

        for (name, range) in ranges {
            if !range.is_valid() {
                return Err(PalisadeError::InvalidConfig(format!(
                    "{} has min {} above max {}",
                    name, range.min, range.max
                )));
            }
        }

        if self.room_count.min < 0 || self.crate_count.min < 0 {
            return Err(PalisadeError::InvalidConfig(
                "counts cannot be negative".to_string(),
            ));
        }

        if self.footprint_width.min < 2 || self.footprint_height.min < 2 {
            return Err(PalisadeError::InvalidConfig(
                "footprint must span at least two cells".to_string(),
            ));
        }

        if self.footprint_margin < 0 {
            return Err(PalisadeError::InvalidConfig(
                "footprint_margin cannot be negative".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.crate_variant_chance) {
            return Err(PalisadeError::InvalidConfig(format!(
                "crate_variant_chance {} is not a probability",
                self.crate_variant_chance
            )));
        }

        if self.crate_variants < 1 {
            return Err(PalisadeError::InvalidConfig(
                "crate_variants must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Something that writes a structure into a zone.
///
/// The boolean contract matches what a host engine expects from a zone
/// builder: `true` when the structure was raised, `false` when it was
/// abandoned before touching the zone.
pub trait ZoneBuilder {
    /// Builds into the zone using the provided random number generator.
    fn build_zone(&self, zone: &mut Zone, rng: &mut StdRng) -> bool;

    /// Gets the builder type name for logging and debugging.
    fn builder_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Creates a seeded random number generator.
    pub fn create_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// Derives a session seed from a world seed and a salt.
    ///
    /// Uses 64-bit FNV-1a so the value is stable across platforms and
    /// toolchains.
    ///
    /// # Examples
    ///
    /// ```
    /// use palisade::generation::utils::session_seed;
    ///
    /// let a = session_seed("world-1", "forts");
    /// assert_eq!(a, session_seed("world-1", "forts"));
    /// assert_ne!(a, session_seed("world-2", "forts"));
    /// ```
    pub fn session_seed(world_seed: &str, salt: &str) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        world_seed
            .bytes()
            .chain(salt.bytes())
            .fold(OFFSET_BASIS, |hash, byte| {
                (hash ^ byte as u64).wrapping_mul(PRIME)
            })
    }

    /// Creates the generation stream for a world session.
    pub fn session_rng(world_seed: &str) -> StdRng {
        create_rng(session_seed(world_seed, crate::config::SESSION_SALT))
    }
}
