//! # Building Templates
//!
//! Wall/door classification grids used to partition a room's interior.
//!
//! A template is sized to a rectangle. Its outline is wall, and the interior
//! is split by recursive partitions, each pierced by one door. Templates can
//! cover the whole rectangle or be built as a quadrant and mirrored, which
//! gives symmetric floor plans.

use crate::geometry::{random_between, Rect};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Classification of one template cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateTile {
    /// Outside the template
    Empty,
    Floor,
    Wall,
    Door,
}

/// A width × height grid of [`TemplateTile`]s keyed by local coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingTemplate {
    pub width: i32,
    pub height: i32,
    tiles: Vec<TemplateTile>,
}

impl BuildingTemplate {
    /// Generates a template.
    ///
    /// `variant` is the number of subdivision passes; every pass splits each
    /// region large enough to hold a partition. With `full_square` the
    /// partitions are laid over the whole rectangle; otherwise the top-left
    /// quadrant is generated and mirrored across both axes.
    ///
    /// # Examples
    ///
    /// ```
    /// use palisade::{BuildingTemplate, TemplateTile};
    /// use palisade::generation::utils::create_rng;
    ///
    /// let template = BuildingTemplate::generate(20, 12, 1, true, &mut create_rng(5));
    /// assert_eq!(template.get(0, 0), TemplateTile::Wall);
    /// assert_eq!(template.get(19, 11), TemplateTile::Wall);
    /// assert_eq!(template.get(20, 0), TemplateTile::Empty);
    /// assert_eq!(template.count(TemplateTile::Door), 1);
    /// ```
    pub fn generate<R: Rng + ?Sized>(
        width: i32,
        height: i32,
        variant: u32,
        full_square: bool,
        rng: &mut R,
    ) -> Self {
        if full_square {
            Self::generate_full(width, height, variant, rng)
        } else {
            Self::generate_mirrored(width, height, variant, rng)
        }
    }

    fn blank(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![TemplateTile::Empty; (width * height) as usize],
        }
    }

    fn generate_full<R: Rng + ?Sized>(width: i32, height: i32, variant: u32, rng: &mut R) -> Self {
        let mut template = Self::blank(width, height);
        if template.width == 0 || template.height == 0 {
            return template;
        }

        let outline = Rect::new(0, 0, template.width - 1, template.height - 1);
        for pos in outline.positions() {
            let tile = if outline.is_border(pos) {
                TemplateTile::Wall
            } else {
                TemplateTile::Floor
            };
            template.set(pos.x, pos.y, tile);
        }

        let interior = outline.grow(-1);
        if !interior.is_valid() {
            return template;
        }

        let mut regions = vec![interior];
        for _ in 0..variant {
            let mut next = Vec::with_capacity(regions.len() * 2);
            for region in regions {
                match template.split(region, rng) {
                    Some((a, b)) => {
                        next.push(a);
                        next.push(b);
                    }
                    None => next.push(region),
                }
            }
            regions = next;
        }

        template
    }

    fn generate_mirrored<R: Rng + ?Sized>(
        width: i32,
        height: i32,
        variant: u32,
        rng: &mut R,
    ) -> Self {
        let mut template = Self::blank(width, height);
        if template.width == 0 || template.height == 0 {
            return template;
        }

        let quad_width = (template.width + 1) / 2;
        let quad_height = (template.height + 1) / 2;
        let mut quad = Self::generate_full(quad_width, quad_height, variant, rng);

        // The quadrant's inner borders become the central cross walls, so
        // each needs a way through.
        let right_rows: Vec<i32> = (1..quad_height - 1)
            .filter(|&y| quad.get(quad_width - 2, y) == TemplateTile::Floor)
            .collect();
        if !right_rows.is_empty() {
            let y = right_rows[rng.gen_range(0..right_rows.len())];
            quad.set(quad_width - 1, y, TemplateTile::Door);
        }

        let bottom_columns: Vec<i32> = (1..quad_width - 1)
            .filter(|&x| quad.get(x, quad_height - 2) == TemplateTile::Floor)
            .collect();
        if !bottom_columns.is_empty() {
            let x = bottom_columns[rng.gen_range(0..bottom_columns.len())];
            quad.set(x, quad_height - 1, TemplateTile::Door);
        }

        for y in 0..template.height {
            for x in 0..template.width {
                let qx = x.min(template.width - 1 - x);
                let qy = y.min(template.height - 1 - y);
                template.set(x, y, quad.get(qx, qy));
            }
        }

        template
    }

    /// Splits a floor region with a partition wall and a single door.
    fn split<R: Rng + ?Sized>(&mut self, region: Rect, rng: &mut R) -> Option<(Rect, Rect)> {
        let vertical_columns = self.partition_columns(region);
        let horizontal_rows = self.partition_rows(region);

        let vertical = match (vertical_columns.is_empty(), horizontal_rows.is_empty()) {
            (true, true) => return None,
            (false, true) => true,
            (true, false) => false,
            (false, false) => {
                if region.width() == region.height() {
                    rng.gen_bool(0.5)
                } else {
                    region.width() > region.height()
                }
            }
        };

        if vertical {
            let x = vertical_columns[rng.gen_range(0..vertical_columns.len())];
            for y in region.y1..=region.y2 {
                self.set(x, y, TemplateTile::Wall);
            }
            let door_y = random_between(rng, region.y1, region.y2)?;
            self.set(x, door_y, TemplateTile::Door);

            Some((
                Rect::new(region.x1, region.y1, x - 1, region.y2),
                Rect::new(x + 1, region.y1, region.x2, region.y2),
            ))
        } else {
            let y = horizontal_rows[rng.gen_range(0..horizontal_rows.len())];
            for x in region.x1..=region.x2 {
                self.set(x, y, TemplateTile::Wall);
            }
            let door_x = random_between(rng, region.x1, region.x2)?;
            self.set(door_x, y, TemplateTile::Door);

            Some((
                Rect::new(region.x1, region.y1, region.x2, y - 1),
                Rect::new(region.x1, y + 1, region.x2, region.y2),
            ))
        }
    }

    /// Columns that can take a vertical partition, leaving two floor cells
    /// either side and not butting against an existing door.
    fn partition_columns(&self, region: Rect) -> Vec<i32> {
        ((region.x1 + 2)..=(region.x2 - 2))
            .filter(|&x| {
                self.get(x, region.y1 - 1) != TemplateTile::Door
                    && self.get(x, region.y2 + 1) != TemplateTile::Door
            })
            .collect()
    }

    fn partition_rows(&self, region: Rect) -> Vec<i32> {
        ((region.y1 + 2)..=(region.y2 - 2))
            .filter(|&y| {
                self.get(region.x1 - 1, y) != TemplateTile::Door
                    && self.get(region.x2 + 1, y) != TemplateTile::Door
            })
            .collect()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Gets the tile at local coordinates; outside the grid is `Empty`.
    pub fn get(&self, x: i32, y: i32) -> TemplateTile {
        self.index(x, y)
            .map(|index| self.tiles[index])
            .unwrap_or(TemplateTile::Empty)
    }

    fn set(&mut self, x: i32, y: i32, tile: TemplateTile) {
        if let Some(index) = self.index(x, y) {
            self.tiles[index] = tile;
        }
    }

    /// Counts tiles of one classification.
    pub fn count(&self, tile: TemplateTile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }
}
