//! # Connectivity Doors
//!
//! Punches doors through room walls and the fort perimeter.
//!
//! Door placement is best effort. A room whose walls offer no spot with
//! open ground on both sides within the attempt budget simply keeps no
//! door.

use crate::{config, PalisadeResult, Position, Rect, Room, Side, Zone};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which wall of a room a door candidate sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallAxis {
    /// Top or bottom wall
    Horizontal,
    /// Left or right wall
    Vertical,
}

/// A position on a room wall considered for a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorCandidate {
    pub position: Position,
    pub axis: WallAxis,
}

impl DoorCandidate {
    /// Draws a random non-corner position on one of the room's four walls.
    pub fn random<R: Rng + ?Sized>(room: &Rect, rng: &mut R) -> Option<Self> {
        if room.x2 - room.x1 < 2 || room.y2 - room.y1 < 2 {
            return None;
        }

        if rng.gen_range(0..=1) == 0 {
            let x = rng.gen_range((room.x1 + 1)..=(room.x2 - 1));
            let y = if rng.gen_range(0..=1) != 0 { room.y2 } else { room.y1 };
            Some(Self {
                position: Position::new(x, y),
                axis: WallAxis::Horizontal,
            })
        } else {
            let y = rng.gen_range((room.y1 + 1)..=(room.y2 - 1));
            let x = if rng.gen_range(0..=1) != 0 { room.x2 } else { room.x1 };
            Some(Self {
                position: Position::new(x, y),
                axis: WallAxis::Vertical,
            })
        }
    }

    /// Checks the candidate against the footprint boundary and the openness
    /// rule.
    ///
    /// A door may not sit on any footprint boundary coordinate. It must also
    /// join two open cells: either both horizontal neighbours or both
    /// vertical neighbours are free of walls. The rule looks at both axes
    /// regardless of which wall the candidate came from.
    pub fn is_acceptable(&self, zone: &Zone, footprint: &Rect) -> bool {
        let Position { x, y } = self.position;

        if x == footprint.x1 || x == footprint.x2 || y == footprint.y1 || y == footprint.y2 {
            return false;
        }

        let horizontal_open =
            zone.is_open(Position::new(x - 1, y)) && zone.is_open(Position::new(x + 1, y));
        let vertical_open =
            zone.is_open(Position::new(x, y - 1)) && zone.is_open(Position::new(x, y + 1));

        horizontal_open || vertical_open
    }
}

/// Places room doors and fort entrances.
#[derive(Debug, Clone)]
pub struct ConnectivityDoorPlacer {
    /// Attempts per room before giving up on its door
    pub max_attempts: u32,
    pub door_blueprint: String,
}

impl ConnectivityDoorPlacer {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            door_blueprint: config::DOOR_BLUEPRINT.to_string(),
        }
    }

    /// Gives each room at most one door, returning the door positions.
    pub fn add_room_doors<R: Rng + ?Sized>(
        &self,
        zone: &mut Zone,
        rooms: &[Room],
        footprint: &Rect,
        rng: &mut R,
    ) -> PalisadeResult<Vec<Position>> {
        let mut doors = Vec::with_capacity(rooms.len());

        for room in rooms {
            match self.find_room_door(zone, room, footprint, rng) {
                Some(pos) => {
                    self.place_door(zone, pos)?;
                    doors.push(pos);
                }
                None => log::debug!(
                    "room {} left without a door after {} attempts",
                    room.id,
                    self.max_attempts
                ),
            }
        }

        Ok(doors)
    }

    fn find_room_door<R: Rng + ?Sized>(
        &self,
        zone: &Zone,
        room: &Room,
        footprint: &Rect,
        rng: &mut R,
    ) -> Option<Position> {
        for _ in 0..self.max_attempts {
            let candidate = DoorCandidate::random(&room.bounds, rng)?;
            if candidate.is_acceptable(zone, footprint) {
                return Some(candidate.position);
            }
        }
        None
    }

    /// Opens between zero and four perimeter entrances.
    ///
    /// A draw from 1 to 15 gates each side by one bit. A gated side gets a
    /// two-cell doorway candidate; each of its cells becomes a door only if
    /// the ground directly outside holds no wall.
    pub fn add_fort_doors<R: Rng + ?Sized>(
        &self,
        zone: &mut Zone,
        footprint: &Rect,
        rng: &mut R,
    ) -> PalisadeResult<Vec<Position>> {
        let flags: u8 = rng.gen_range(1..=15);
        let mut doors = Vec::new();

        for side in Side::ALL {
            if flags & side.flag() == 0 {
                continue;
            }
            self.try_side_doorway(zone, footprint, side, rng, &mut doors)?;
        }

        log::debug!("fort door flags {:#06b} opened {} doors", flags, doors.len());
        Ok(doors)
    }

    fn try_side_doorway<R: Rng + ?Sized>(
        &self,
        zone: &mut Zone,
        footprint: &Rect,
        side: Side,
        rng: &mut R,
        doors: &mut Vec<Position>,
    ) -> PalisadeResult<()> {
        let (min, max) = match side {
            Side::North | Side::South => (footprint.x1, footprint.x2),
            Side::West | Side::East => (footprint.y1, footprint.y2),
        };

        if min + 1 > max - 2 {
            return Ok(());
        }
        let along = rng.gen_range((min + 1)..=(max - 2));

        for offset in 0..2 {
            let pos = perimeter_position(footprint, side, along + offset);
            let (dx, dy) = side.outward();
            if zone.has_wall(pos.offset(dx, dy)) {
                continue;
            }
            self.place_door(zone, pos)?;
            doors.push(pos);
        }

        Ok(())
    }

    fn place_door(&self, zone: &mut Zone, pos: Position) -> PalisadeResult<()> {
        zone.clear_cell(pos)?;
        zone.add_blueprint(pos, &self.door_blueprint)
    }
}

/// Position on a footprint side at the given coordinate along that side.
fn perimeter_position(footprint: &Rect, side: Side, along: i32) -> Position {
    match side {
        Side::North => Position::new(along, footprint.y1),
        Side::South => Position::new(along, footprint.y2),
        Side::West => Position::new(footprint.x1, along),
        Side::East => Position::new(footprint.x2, along),
    }
}
