//! # Room Structures
//!
//! Stamps interior partitions into rooms large enough to hold them.

use crate::{
    config, BuildingTemplate, LayoutConfig, PalisadeResult, Position, Room, TemplateTile, Zone,
};
use rand::Rng;

/// Lays building templates over room interiors.
#[derive(Debug, Clone)]
pub struct RoomStructureBuilder<'a> {
    config: &'a LayoutConfig,
}

impl<'a> RoomStructureBuilder<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Checks whether a room is big enough for interior partitions.
    ///
    /// Smaller rooms stay bare boxes.
    pub fn qualifies(&self, room: &Room) -> bool {
        room.area() > self.config.structure_min_area
            && room.width() > self.config.structure_min_dimension
            && room.height() > self.config.structure_min_dimension
    }

    /// Stamps partitions into every qualifying room, marking them as
    /// structured. Returns how many rooms were stamped.
    pub fn build<R: Rng + ?Sized>(
        &self,
        zone: &mut Zone,
        rooms: &mut [Room],
        wall_blueprint: &str,
        rng: &mut R,
    ) -> PalisadeResult<usize> {
        let mut stamped = 0;

        for room in rooms.iter_mut() {
            if !self.qualifies(room) {
                continue;
            }

            let template = BuildingTemplate::generate(
                room.width(),
                room.height(),
                self.config.template_variant,
                true,
                rng,
            );
            stamp_template(zone, room, &template, wall_blueprint)?;
            room.structured = true;
            stamped += 1;
        }

        log::debug!("stamped interior structure into {} rooms", stamped);
        Ok(stamped)
    }
}

/// Writes a template's interior over a room.
///
/// The template's outermost ring lines up with the room outline, which is
/// already walled, so only inner cells are written.
pub fn stamp_template(
    zone: &mut Zone,
    room: &Room,
    template: &BuildingTemplate,
    wall_blueprint: &str,
) -> PalisadeResult<()> {
    for x in 1..template.width - 1 {
        for y in 1..template.height - 1 {
            let pos = Position::new(room.bounds.x1 + x, room.bounds.y1 + y);
            match template.get(x, y) {
                TemplateTile::Wall => zone.add_blueprint(pos, wall_blueprint)?,
                TemplateTile::Door => zone.add_blueprint(pos, config::DOOR_BLUEPRINT)?,
                TemplateTile::Floor | TemplateTile::Empty => {}
            }
        }
    }
    Ok(())
}
