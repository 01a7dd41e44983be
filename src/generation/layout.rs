//! # Room Layout
//!
//! Footprint search and room packing.
//!
//! The footprint is the outer bound of the fort. Rooms are packed inside it
//! with a never-overlap policy; rooms that reach the footprint edge share
//! its wall, the rest are pulled in by one cell so their walls stand free.

use crate::{
    generate_boxes, BoxRequest, IntRange, LayoutConfig, OverlapPolicy, PalisadeResult, Position,
    Rect, Zone,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A walled room packed inside a fort footprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Acceptance order within the build
    pub id: u32,
    /// Outline of the room, walls included
    pub bounds: Rect,
    /// Whether the room shares at least one wall with the footprint
    pub flush: bool,
    /// Whether the room received interior partitions
    pub structured: bool,
}

impl Room {
    /// Creates a new room.
    ///
    /// # Examples
    ///
    /// ```
    /// use palisade::{Rect, Room};
    ///
    /// let room = Room::new(1, Rect::with_size(5, 5, 20, 12), false);
    /// assert_eq!(room.width(), 20);
    /// assert_eq!(room.height(), 12);
    /// assert_eq!(room.area(), 240);
    /// ```
    pub fn new(id: u32, bounds: Rect, flush: bool) -> Self {
        Self {
            id,
            bounds,
            flush,
            structured: false,
        }
    }

    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    pub fn area(&self) -> i32 {
        self.bounds.area()
    }

    pub fn center(&self) -> Position {
        self.bounds.center()
    }

    /// The floor area inside the walls; invalid when the room has no interior.
    pub fn interior(&self) -> Rect {
        self.bounds.grow(-1)
    }

    pub fn overlaps(&self, other: &Room) -> bool {
        self.bounds.intersects(&other.bounds)
    }
}

/// Packs rooms into a fort footprint.
#[derive(Debug, Clone)]
pub struct RoomLayoutPlanner<'a> {
    config: &'a LayoutConfig,
}

impl<'a> RoomLayoutPlanner<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Searches for a fort footprint inside a zone of the given size.
    ///
    /// One candidate is drawn within the zone minus the configured margin
    /// and shrunk by one cell on every side. Returns `None` when no
    /// candidate fits.
    pub fn generate_footprint<R: Rng + ?Sized>(
        &self,
        zone_width: u32,
        zone_height: u32,
        rng: &mut R,
    ) -> Option<Rect> {
        let margin = self.config.footprint_margin;
        let request = BoxRequest::new(
            OverlapPolicy::Irrelevant,
            IntRange::single(1),
            self.config.footprint_width,
            self.config.footprint_height,
            IntRange::new(margin, zone_width as i32 - 1 - margin),
            IntRange::new(margin, zone_height as i32 - 1 - margin),
        )
        .with_attempts(self.config.placement_attempts);

        let candidate = generate_boxes(&[], &request, rng).into_iter().next()?;
        let footprint = candidate.grow(-1);

        if footprint.is_valid() {
            Some(footprint)
        } else {
            None
        }
    }

    /// Packs rooms inside the footprint and raises their outlines.
    ///
    /// Candidates that are degenerate, or that would have no interior, are
    /// dropped. Each kept room's hollow outline is written to the zone as
    /// soon as it is accepted.
    pub fn plan_rooms<R: Rng + ?Sized>(
        &self,
        zone: &mut Zone,
        footprint: Rect,
        wall_blueprint: &str,
        rng: &mut R,
    ) -> PalisadeResult<Vec<Room>> {
        let request = BoxRequest::new(
            OverlapPolicy::NeverOverlap,
            self.config.room_count,
            self.config.room_width,
            self.config.room_height,
            IntRange::new(footprint.x1, footprint.x2),
            IntRange::new(footprint.y1, footprint.y2),
        )
        .with_spacing(self.config.room_spacing)
        .with_attempts(self.config.placement_attempts);

        let candidates = generate_boxes(&[], &request, rng);
        let mut rooms = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if !candidate.is_valid() || !candidate.grow(-1).is_valid() {
                log::debug!("dropping degenerate room candidate {:?}", candidate);
                continue;
            }

            let flush = candidate.shares_edge_with(&footprint);
            let bounds = if flush { candidate } else { candidate.grow(-1) };

            zone.fill_hollow_box(bounds, wall_blueprint)?;
            rooms.push(Room::new(rooms.len() as u32, bounds, flush));
        }

        log::debug!("packed {} rooms into footprint {:?}", rooms.len(), footprint);
        Ok(rooms)
    }
}
