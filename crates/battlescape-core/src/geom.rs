//! Geometry primitives: [`Position`] and [`MapSize`].
//!
//! A battlescape is a stack of rectangular levels. X grows east, Y grows
//! south and Z grows upwards, so level 0 is the ground floor.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A 3D integer tile coordinate (or offset between two coordinates).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    /// Origin (0, 0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };
    /// One level up.
    pub const UP: Self = Self { x: 0, y: 0, z: 1 };
    /// One level down.
    pub const DOWN: Self = Self { x: 0, y: 0, z: -1 };

    /// Create a new position.
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Return a position shifted by (dx, dy, dz).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// The same column, one level up.
    #[inline]
    pub const fn above(self) -> Self {
        self.shift(0, 0, 1)
    }

    /// The same column, one level down.
    #[inline]
    pub const fn below(self) -> Self {
        self.shift(0, 0, -1)
    }

    /// Chebyshev distance on the horizontal plane, ignoring levels.
    #[inline]
    pub fn flat_distance(self, other: Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

// --- trait impls for Position ---

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
        self.z.hash(state);
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    /// Orders like the flat tile index: level, then row, then column.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.z
            .cmp(&other.z)
            .then(self.y.cmp(&other.y))
            .then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Position {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Position {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Position {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Position {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Position {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<i32> for Position {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

// ---------------------------------------------------------------------------
// MapSize
// ---------------------------------------------------------------------------

/// Dimensions of a battlescape: `x` columns, `y` rows and `z` levels.
///
/// Positions map to a flat tile index level by level, row by row:
/// `z * x * y + y * x + x`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapSize {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl MapSize {
    /// Create a new map size. Negative dimensions are clamped to zero.
    #[inline]
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self {
            x: x.max(0),
            y: y.max(0),
            z: z.max(0),
        }
    }

    /// Total number of tiles.
    #[inline]
    pub fn len(self) -> usize {
        (self.x as usize) * (self.y as usize) * (self.z as usize)
    }

    /// Whether the map has no tiles at all.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Whether `p` lies on the map.
    #[inline]
    pub fn contains(self, p: Position) -> bool {
        p.x >= 0 && p.x < self.x && p.y >= 0 && p.y < self.y && p.z >= 0 && p.z < self.z
    }

    /// Whether a square footprint of `size` tiles anchored at `p` (its
    /// north-west corner) lies entirely on the map.
    #[inline]
    pub fn contains_footprint(self, p: Position, size: i32) -> bool {
        let size = size.max(1);
        self.contains(p) && self.contains(p.shift(size - 1, size - 1, 0))
    }

    /// Flat tile index of `p`, or `None` if it is off the map.
    #[inline]
    pub fn index(self, p: Position) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        let plane = (self.x * self.y) as usize;
        Some(p.z as usize * plane + (p.y * self.x + p.x) as usize)
    }

    /// Position of a flat tile index. The index must be below [`len`](Self::len).
    #[inline]
    pub fn position(self, idx: usize) -> Position {
        let plane = (self.x * self.y).max(1) as usize;
        let width = self.x.max(1) as usize;
        let z = idx / plane;
        let rest = idx % plane;
        Position::new((rest % width) as i32, (rest / width) as i32, z as i32)
    }

    /// Iterator over every position, in flat index order.
    #[inline]
    pub fn iter(self) -> MapSizeIter {
        MapSizeIter {
            size: self,
            next: 0,
        }
    }
}

impl IntoIterator for MapSize {
    type Item = Position;
    type IntoIter = MapSizeIter;
    #[inline]
    fn into_iter(self) -> MapSizeIter {
        self.iter()
    }
}

impl fmt::Display for MapSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// Iterator over the positions of a [`MapSize`] in flat index order.
#[derive(Clone, Debug)]
pub struct MapSizeIter {
    size: MapSize,
    next: usize,
}

impl Iterator for MapSizeIter {
    type Item = Position;

    #[inline]
    fn next(&mut self) -> Option<Position> {
        if self.next >= self.size.len() {
            return None;
        }
        let p = self.size.position(self.next);
        self.next += 1;
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.size.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MapSizeIter {}
