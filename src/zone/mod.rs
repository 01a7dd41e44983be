//! # Zone Module
//!
//! The cell grid that generation writes into.
//!
//! A zone is a fixed-size grid of cells, each holding an ordered stack of
//! objects. Builders query cells for walls, add and remove objects, and
//! register the footprints of structures they raise so later placement can
//! tell inside from outside.

pub mod objects;

pub use objects::*;

use crate::{config, PalisadeError, PalisadeResult, Position, Rect};

/// A single grid location and the objects standing on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    pub objects: Vec<GameObject>,
}

impl Cell {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            objects: Vec::new(),
        }
    }

    /// Checks if any object in the cell is a wall.
    pub fn has_wall(&self) -> bool {
        self.objects.iter().any(GameObject::is_wall)
    }

    pub fn has_blueprint(&self, blueprint: &str) -> bool {
        self.objects.iter().any(|object| object.blueprint == blueprint)
    }

    pub fn has_kind(&self, kind: ObjectKind) -> bool {
        self.objects.iter().any(|object| object.kind == kind)
    }

    pub fn count_blueprint(&self, blueprint: &str) -> usize {
        self.objects
            .iter()
            .filter(|object| object.blueprint == blueprint)
            .count()
    }

    pub fn add_object(&mut self, object: GameObject) {
        self.objects.push(object);
    }

    /// Removes the first object with the given blueprint, returning it.
    pub fn remove_object(&mut self, blueprint: &str) -> Option<GameObject> {
        let index = self
            .objects
            .iter()
            .position(|object| object.blueprint == blueprint)?;
        Some(self.objects.remove(index))
    }

    /// Removes every object of the given kind, returning how many went.
    pub fn remove_kind(&mut self, kind: ObjectKind) -> usize {
        let before = self.objects.len();
        self.objects.retain(|object| object.kind != kind);
        before - self.objects.len()
    }

    pub fn clear_walls(&mut self) -> usize {
        self.remove_kind(ObjectKind::Wall)
    }

    /// Removes everything from the cell.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// A rectangular grid of cells.
#[derive(Debug, Clone)]
pub struct Zone {
    pub width: u32,
    pub height: u32,
    /// Difficulty tier used when resolving population tables
    pub tier: u32,
    cells: Vec<Cell>,
    /// Footprints of structures raised in this zone
    pub structures: Vec<Rect>,
    catalog: BlueprintCatalog,
}

impl Zone {
    /// Creates an empty zone using the default blueprint catalog.
    ///
    /// # Examples
    ///
    /// ```
    /// use palisade::{Position, Zone};
    ///
    /// let zone = Zone::new(80, 25, 1);
    /// assert_eq!(zone.cells().count(), 80 * 25);
    /// assert!(zone.is_edge(Position::new(0, 10)));
    /// assert!(!zone.is_edge(Position::new(10, 10)));
    /// ```
    pub fn new(width: u32, height: u32, tier: u32) -> Self {
        Self::with_catalog(width, height, tier, BlueprintCatalog::default())
    }

    pub fn with_catalog(width: u32, height: u32, tier: u32, catalog: BlueprintCatalog) -> Self {
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                cells.push(Cell::new(Position::new(x, y)));
            }
        }

        Self {
            width,
            height,
            tier,
            cells,
            structures: Vec::new(),
            catalog,
        }
    }

    /// Creates a zone with the default dimensions.
    pub fn standard(tier: u32) -> Self {
        Self::new(config::DEFAULT_ZONE_WIDTH, config::DEFAULT_ZONE_HEIGHT, tier)
    }

    pub fn catalog(&self) -> &BlueprintCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut BlueprintCatalog {
        &mut self.catalog
    }

    /// The rectangle covering the whole zone.
    pub fn area(&self) -> Rect {
        Rect::new(0, 0, self.width as i32 - 1, self.height as i32 - 1)
    }

    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    /// Checks if a position lies on the outermost ring of the zone.
    pub fn is_edge(&self, pos: Position) -> bool {
        self.is_valid_position(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x == self.width as i32 - 1
                || pos.y == self.height as i32 - 1)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.is_valid_position(pos) {
            Some((pos.y as u32 * self.width + pos.x as u32) as usize)
        } else {
            None
        }
    }

    pub fn get_cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|index| &self.cells[index])
    }

    pub fn get_cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        match self.index(pos) {
            Some(index) => Some(&mut self.cells[index]),
            None => None,
        }
    }

    fn cell_or_err(&mut self, pos: Position) -> PalisadeResult<&mut Cell> {
        self.get_cell_mut(pos).ok_or(PalisadeError::OutOfBounds(pos))
    }

    /// Checks if the cell at `pos` holds a wall. Positions outside the zone
    /// hold nothing.
    pub fn has_wall(&self, pos: Position) -> bool {
        self.get_cell(pos).map(Cell::has_wall).unwrap_or(false)
    }

    /// Checks if the cell exists and holds no wall.
    pub fn is_open(&self, pos: Position) -> bool {
        self.get_cell(pos).map(|cell| !cell.has_wall()).unwrap_or(false)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Iterates all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().map(|cell| cell.position)
    }

    /// Places an existing object instance.
    pub fn add_object(&mut self, pos: Position, object: GameObject) -> PalisadeResult<()> {
        self.cell_or_err(pos)?.add_object(object);
        Ok(())
    }

    /// Creates an object from the catalog and places it.
    pub fn add_blueprint(&mut self, pos: Position, blueprint: &str) -> PalisadeResult<()> {
        let object = self.catalog.create(blueprint);
        self.add_object(pos, object)
    }

    pub fn remove_object(&mut self, pos: Position, blueprint: &str) -> Option<GameObject> {
        self.get_cell_mut(pos)?.remove_object(blueprint)
    }

    pub fn clear_cell(&mut self, pos: Position) -> PalisadeResult<()> {
        self.cell_or_err(pos)?.clear();
        Ok(())
    }

    /// Empties every cell of the box.
    ///
    /// Builder markers and combat objects stay behind; removing creatures is
    /// a separate, opt-in step. Registered structures the box touches are
    /// forgotten, since their walls no longer stand intact.
    pub fn clear_box(&mut self, area: Rect) -> PalisadeResult<()> {
        for pos in area.positions() {
            self.cell_or_err(pos)?
                .objects
                .retain(|object| object.kind == ObjectKind::Marker || object.kind.is_combat());
        }
        self.structures.retain(|footprint| !footprint.intersects(&area));
        Ok(())
    }

    /// Adds the blueprint to every cell of the box.
    pub fn fill_box(&mut self, area: Rect, blueprint: &str) -> PalisadeResult<()> {
        for pos in area.positions() {
            self.add_blueprint(pos, blueprint)?;
        }
        Ok(())
    }

    /// Adds the blueprint to every outline cell of the box.
    pub fn fill_hollow_box(&mut self, area: Rect, blueprint: &str) -> PalisadeResult<()> {
        for pos in area.border_positions() {
            self.add_blueprint(pos, blueprint)?;
        }
        Ok(())
    }

    /// Records the footprint of a structure raised in this zone.
    ///
    /// Entries live until a `clear_box` touches them.
    pub fn mark_structure(&mut self, footprint: Rect) {
        self.structures.push(footprint);
    }

    pub fn is_inside_structure(&self, pos: Position) -> bool {
        self.structures.iter().any(|footprint| footprint.contains(pos))
    }

    /// Counts cells holding the blueprint anywhere in the zone.
    pub fn count_blueprint(&self, blueprint: &str) -> usize {
        self.cells
            .iter()
            .map(|cell| cell.count_blueprint(blueprint))
            .sum()
    }

    /// Plain glyph dump of the grid, one line per row.
    ///
    /// Intended for debugging output, not for display.
    pub fn to_glyph_map(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for row in self.cells.chunks(self.width as usize) {
            for cell in row {
                out.push(glyph_for(cell));
            }
            out.push('\n');
        }
        out
    }
}

fn glyph_for(cell: &Cell) -> char {
    let priority = [
        (ObjectKind::Wall, '#'),
        (ObjectKind::Door, '+'),
        (ObjectKind::Creature, 'c'),
        (ObjectKind::Container, '='),
        (ObjectKind::Furniture, '&'),
        (ObjectKind::Widget, '*'),
        (ObjectKind::Item, '%'),
        (ObjectKind::Floor, '.'),
    ];

    priority
        .iter()
        .find(|(kind, _)| cell.has_kind(*kind))
        .map(|(_, glyph)| *glyph)
        .unwrap_or(' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_creation() {
        let zone = Zone::new(10, 6, 2);
        assert_eq!(zone.cells().count(), 60);
        assert_eq!(zone.area(), Rect::new(0, 0, 9, 5));
        assert_eq!(zone.tier, 2);
        assert_eq!(
            zone.get_cell(Position::new(3, 4)).map(|cell| cell.position),
            Some(Position::new(3, 4))
        );
        assert!(zone.get_cell(Position::new(10, 0)).is_none());
        assert!(zone.get_cell(Position::new(-1, 0)).is_none());
    }

    #[test]
    fn test_edge_detection() {
        let zone = Zone::new(10, 6, 0);
        assert!(zone.is_edge(Position::new(0, 0)));
        assert!(zone.is_edge(Position::new(9, 3)));
        assert!(zone.is_edge(Position::new(4, 5)));
        assert!(!zone.is_edge(Position::new(4, 4)));
        assert!(!zone.is_edge(Position::new(10, 3)));
    }

    #[test]
    fn test_wall_queries_and_clearing() {
        let mut zone = Zone::new(10, 10, 0);
        let pos = Position::new(3, 3);

        zone.add_blueprint(pos, "DirtFloor").unwrap();
        zone.add_blueprint(pos, "WoodWall").unwrap();
        assert!(zone.has_wall(pos));
        assert!(!zone.is_open(pos));

        let cell = zone.get_cell_mut(pos).unwrap();
        assert_eq!(cell.clear_walls(), 1);
        assert!(cell.has_blueprint("DirtFloor"));
        assert!(zone.is_open(pos));

        zone.clear_cell(pos).unwrap();
        assert!(zone.get_cell(pos).unwrap().is_empty());
        assert!(!zone.is_open(Position::new(30, 30)));
    }

    #[test]
    fn test_out_of_bounds_writes_fail() {
        let mut zone = Zone::new(5, 5, 0);
        let result = zone.add_blueprint(Position::new(5, 0), "WoodWall");
        assert!(matches!(result, Err(PalisadeError::OutOfBounds(_))));
    }

    #[test]
    fn test_box_operations() {
        let mut zone = Zone::new(12, 12, 0);
        let area = Rect::new(2, 2, 6, 5);

        zone.fill_box(area, "DirtFloor").unwrap();
        zone.fill_hollow_box(area, "WoodWall").unwrap();

        assert_eq!(zone.count_blueprint("DirtFloor"), 20);
        assert_eq!(zone.count_blueprint("WoodWall"), 14);
        assert!(zone.has_wall(Position::new(2, 3)));
        assert!(!zone.has_wall(Position::new(3, 3)));

        zone.add_blueprint(Position::new(4, 4), "CanyonMarker").unwrap();
        zone.add_blueprint(Position::new(3, 3), "Snapjaw Scavenger").unwrap();
        zone.clear_box(area).unwrap();
        assert_eq!(zone.count_blueprint("DirtFloor"), 0);
        assert_eq!(zone.count_blueprint("WoodWall"), 0);
        assert_eq!(zone.count_blueprint("CanyonMarker"), 1);
        assert_eq!(zone.count_blueprint("Snapjaw Scavenger"), 1);
    }

    #[test]
    fn test_remove_object() {
        let mut zone = Zone::new(4, 4, 0);
        let pos = Position::new(1, 1);
        zone.add_blueprint(pos, "Chest").unwrap();
        zone.add_blueprint(pos, "Chest").unwrap();

        assert!(zone.remove_object(pos, "Chest").is_some());
        assert_eq!(zone.count_blueprint("Chest"), 1);
        assert!(zone.remove_object(pos, "Campfire").is_none());
    }

    #[test]
    fn test_structure_registry() {
        let mut zone = Zone::new(20, 20, 0);
        zone.mark_structure(Rect::new(2, 2, 8, 8));
        assert!(zone.is_inside_structure(Position::new(5, 5)));
        assert!(!zone.is_inside_structure(Position::new(12, 12)));
    }

    #[test]
    fn test_clear_box_forgets_structures_it_touches() {
        let mut zone = Zone::new(40, 20, 0);
        let old_fort = Rect::new(2, 2, 12, 10);
        let outpost = Rect::new(25, 2, 35, 10);
        zone.mark_structure(old_fort);
        zone.mark_structure(outpost);

        zone.clear_box(Rect::new(8, 4, 20, 15)).unwrap();
        assert_eq!(zone.structures, vec![outpost]);
        assert!(!zone.is_inside_structure(Position::new(3, 3)));
        assert!(zone.is_inside_structure(Position::new(30, 5)));

        zone.clear_box(old_fort).unwrap();
        zone.mark_structure(old_fort);
        zone.clear_box(old_fort).unwrap();
        zone.mark_structure(old_fort);
        assert_eq!(zone.structures.len(), 2);
    }

    #[test]
    fn test_glyph_map_shape() {
        let mut zone = Zone::new(4, 2, 0);
        zone.add_blueprint(Position::new(0, 0), "WoodWall").unwrap();
        zone.add_blueprint(Position::new(1, 0), "DirtFloor").unwrap();
        zone.add_blueprint(Position::new(2, 1), "Door").unwrap();

        assert_eq!(zone.to_glyph_map(), "#.  \n  + \n");
    }
}
