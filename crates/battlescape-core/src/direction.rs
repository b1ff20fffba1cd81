//! The ten movement directions and their offset tables.
//!
//! Directions 0–7 are the compass points clockwise from north; 8 and 9 move
//! straight up and down a level.

use std::fmt;

use crate::geom::Position;

/// Number of movement directions, compass plus vertical.
pub const DIR_MAX: usize = 10;

const DIR_X: [i32; DIR_MAX] = [0, 1, 1, 1, 0, -1, -1, -1, 0, 0];
const DIR_Y: [i32; DIR_MAX] = [-1, -1, 0, 1, 1, 1, 0, -1, 0, 0];
const DIR_Z: [i32; DIR_MAX] = [0, 0, 0, 0, 0, 0, 0, 0, 1, -1];

/// A single-step movement direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
    Up = 8,
    Down = 9,
}

impl Direction {
    /// Every direction in table order. Searches enumerate neighbours in this
    /// order, so it also decides ties between equally cheap paths.
    pub const ALL: [Direction; DIR_MAX] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::Up,
        Direction::Down,
    ];

    /// The eight horizontal directions.
    pub const COMPASS: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Numeric code, 0–9.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for a numeric code, or `None` outside 0–9.
    #[inline]
    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    /// Unit offset of one step in this direction.
    #[inline]
    pub const fn vector(self) -> Position {
        let i = self as usize;
        Position::new(DIR_X[i], DIR_Y[i], DIR_Z[i])
    }

    /// Whether this is one of the four diagonal compass directions.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        (self as u8) < 8 && (self as u8) & 1 == 1
    }

    /// Whether this is `Up` or `Down`.
    #[inline]
    pub const fn is_vertical(self) -> bool {
        (self as u8) >= 8
    }

    /// The opposite direction.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            d => Self::COMPASS[(d.index() + 4) % 8],
        }
    }

    /// Number of 45° turns between two compass directions (0–4).
    ///
    /// Vertical directions are never a turn away from anything, so the result
    /// is 0 whenever either side is vertical.
    #[inline]
    pub fn turns_to(self, other: Self) -> i32 {
        if self.is_vertical() || other.is_vertical() {
            return 0;
        }
        let d = (self.index() as i32 - other.index() as i32).rem_euclid(8);
        d.min(8 - d)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
            Direction::Up => "Up",
            Direction::Down => "Down",
        };
        f.write_str(name)
    }
}

/// Converts a direction to its unit offset.
#[inline]
pub const fn direction_to_vector(direction: Direction) -> Position {
    direction.vector()
}

/// Converts a horizontal offset to the compass direction with the same x/y
/// components. The z component is ignored; returns `None` for offsets that
/// are not a single compass step.
#[inline]
pub fn vector_to_direction(vector: Position) -> Option<Direction> {
    Direction::COMPASS
        .iter()
        .copied()
        .find(|d| DIR_X[d.index()] == vector.x && DIR_Y[d.index()] == vector.y)
}
