//! # Palisade
//!
//! Procedural fort generation for roguelike zone grids.
//!
//! ## Architecture Overview
//!
//! A build runs as one synchronous pass over a caller-owned [`Zone`]:
//!
//! - **Geometry**: positions, inclusive rectangles and random ranges
//! - **Zone**: the cell grid, its objects, and the blueprint catalog
//! - **Generation**: footprint search, room packing, template-stamped
//!   partitions, connectivity doors, and population, sequenced by
//!   [`FortMaker`]
//!
//! All randomness flows through an explicit `StdRng` handle, so a fixed
//! seed and call order reproduce the same fort.

pub mod generation;
pub mod geometry;
pub mod zone;

pub use generation::*;
pub use geometry::*;
pub use zone::*;

/// Core error type for fort generation.
#[derive(thiserror::Error, Debug)]
pub enum PalisadeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A write targeted a cell outside the zone
    #[error("Position out of bounds: ({}, {})", .0.x, .0.y)]
    OutOfBounds(Position),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Palisade codebase.
pub type PalisadeResult<T> = Result<T, PalisadeError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation constants and well-known blueprints.
pub mod config {
    /// Default zone width in cells
    pub const DEFAULT_ZONE_WIDTH: u32 = 80;

    /// Default zone height in cells
    pub const DEFAULT_ZONE_HEIGHT: u32 = 25;

    /// Ground cover laid over the whole fort
    pub const FLOOR_BLUEPRINT: &str = "DirtFloor";

    /// Door placed by templates and connectivity passes
    pub const DOOR_BLUEPRINT: &str = "Door";

    /// Marker whose cells must not keep walls
    pub const CANYON_MARKER_BLUEPRINT: &str = "CanyonMarker";

    pub const CAMPFIRE_BLUEPRINT: &str = "Campfire";

    pub const SEATING_BLUEPRINT: &str = "Floor Cushion";

    /// Base storage container; numbered variants append a digit
    pub const CRATE_BLUEPRINT: &str = "Chest";

    /// Population table tier key
    pub const ZONE_TIER_KEY: &str = "zonetier";

    /// Salt mixed into the world seed for the generation stream
    pub const SESSION_SALT: &str = "PalisadeForts";
}
