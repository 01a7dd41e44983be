//! # Geometry Module
//!
//! Grid coordinates, inclusive rectangles, and random ranges used by every
//! generation step.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Represents a 2D coordinate in a zone grid.
///
/// # Examples
///
/// ```
/// use palisade::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let neighbours = pos.cardinal_adjacent_positions();
/// assert_eq!(neighbours.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Returns this position shifted by the given offset.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns only the 4 cardinal adjacent positions (no diagonals).
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        vec![
            Position::new(self.x, self.y - 1), // N
            Position::new(self.x - 1, self.y), // W
            Position::new(self.x + 1, self.y), // E
            Position::new(self.x, self.y + 1), // S
        ]
    }

    /// Returns the 4 diagonal neighbours.
    pub fn diagonal_positions(self) -> [Position; 4] {
        [
            self.offset(-1, -1),
            self.offset(-1, 1),
            self.offset(1, -1),
            self.offset(1, 1),
        ]
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

/// Inclusive integer range used for random draws and size limits.
///
/// # Examples
///
/// ```
/// use palisade::IntRange;
///
/// let range = IntRange::new(1, 3);
/// assert!(range.contains(2));
/// assert!(!range.contains(4));
/// assert_eq!(range.span(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// A range holding exactly one value.
    pub fn single(value: i32) -> Self {
        Self::new(value, value)
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    pub fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance between the two ends.
    pub fn span(&self) -> i32 {
        self.max - self.min
    }

    /// Draws a value uniformly from the range. Inverted ranges yield `min`.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// Draws uniformly from `[lo, hi]`, or `None` when the interval is empty.
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> Option<i32> {
    if lo > hi {
        None
    } else {
        Some(rng.gen_range(lo..=hi))
    }
}

/// An axis-aligned rectangle with inclusive corners.
///
/// `width()` and `height()` count cells, so a rectangle from `(2, 2)` to
/// `(4, 3)` is three cells wide and two cells tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    /// Creates a rectangle from its inclusive corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use palisade::Rect;
    ///
    /// let rect = Rect::new(5, 5, 14, 12);
    /// assert_eq!(rect.width(), 10);
    /// assert_eq!(rect.height(), 8);
    /// assert_eq!(rect.area(), 80);
    /// ```
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Creates a rectangle from a corner and a cell size.
    pub fn with_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width - 1, y + height - 1)
    }

    /// A rectangle is valid when it covers at least one cell.
    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1 + 1
    }

    pub fn area(&self) -> i32 {
        if self.is_valid() {
            self.width() * self.height()
        } else {
            0
        }
    }

    /// Expands (positive) or shrinks (negative) every side by `amount`.
    pub fn grow(&self, amount: i32) -> Rect {
        Rect::new(
            self.x1 - amount,
            self.y1 - amount,
            self.x2 + amount,
            self.y2 + amount,
        )
    }

    /// Integer centre, rounding towards the top-left.
    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x1 && pos.x <= self.x2 && pos.y >= self.y1 && pos.y <= self.y2
    }

    /// Checks if a position lies strictly inside the outline.
    pub fn contains_interior(&self, pos: Position) -> bool {
        pos.x > self.x1 && pos.x < self.x2 && pos.y > self.y1 && pos.y < self.y2
    }

    /// Checks if a position is on the outline of this rectangle.
    pub fn is_border(&self, pos: Position) -> bool {
        self.contains(pos) && !self.contains_interior(pos)
    }

    /// Checks if this rectangle shares any cell with another.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    /// Gap between two rectangles along the axis where they are farthest apart.
    ///
    /// Touching rectangles have a separation of 1, overlapping ones 0 or less.
    pub fn separation(&self, other: &Rect) -> i32 {
        (other.x1 - self.x2)
            .max(self.x1 - other.x2)
            .max(other.y1 - self.y2)
            .max(self.y1 - other.y2)
    }

    /// Checks if any edge coordinate coincides with the matching edge of `outer`.
    pub fn shares_edge_with(&self, outer: &Rect) -> bool {
        self.x1 == outer.x1 || self.x2 == outer.x2 || self.y1 == outer.y1 || self.y2 == outer.y2
    }

    /// Iterates every position in the rectangle, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y1..=self.y2).flat_map(move |y| (self.x1..=self.x2).map(move |x| Position::new(x, y)))
    }

    /// Iterates the outline positions (each corner once).
    pub fn border_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();

        for x in self.x1..=self.x2 {
            positions.push(Position::new(x, self.y1));
            if self.y2 != self.y1 {
                positions.push(Position::new(x, self.y2));
            }
        }

        for y in (self.y1 + 1)..self.y2 {
            positions.push(Position::new(self.x1, y));
            if self.x2 != self.x1 {
                positions.push(Position::new(self.x2, y));
            }
        }

        positions
    }
}

/// One of the four sides of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    North,
    South,
    West,
    East,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::North, Side::South, Side::West, Side::East];

    /// Bit used when a side is gated by a 4-bit flag value.
    pub fn flag(self) -> u8 {
        match self {
            Side::North => 1,
            Side::South => 2,
            Side::West => 4,
            Side::East => 8,
        }
    }

    /// Offset pointing away from the rectangle.
    pub fn outward(self) -> (i32, i32) {
        match self {
            Side::North => (0, -1),
            Side::South => (0, 1),
            Side::West => (-1, 0),
            Side::East => (1, 0),
        }
    }
}
