use crate::direction::Direction;
use crate::geom::{MapSize, Position};
use crate::tile::Tile;
use crate::unit::Faction;

/// Read access to the battlescape, as movement planning needs it.
pub trait BattleMap {
    /// Map dimensions. Tile indices are [`MapSize::index`] of this size.
    fn size(&self) -> MapSize;

    /// The tile at `pos`, or `None` off the map.
    fn tile(&self, pos: Position) -> Option<&Tile>;

    /// Whether the battle takes place underwater (swimmers fly).
    fn is_underwater(&self) -> bool {
        false
    }

    /// Whether units opposing `mover` currently see `pos`.
    fn is_watched(&self, pos: Position, mover: Faction) -> bool {
        self.tile(pos)
            .is_some_and(|t| t.is_watched_by_enemies_of(mover))
    }
}

/// Colour of a path preview marker.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkerColor {
    /// Affordable without touching reserved TUs.
    Green,
    /// Affordable, but eats into reserved TUs.
    Yellow,
    /// Out of TUs or energy.
    Red,
}

/// Annotation of one tile along a previewed path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreviewMark {
    /// Direction of the step leaving this tile; `None` on the destination.
    pub direction: Option<Direction>,
    /// Number shown on the tile (TUs or energy left); `None` for footprint
    /// tiles of large units that carry no number.
    pub value: Option<i32>,
    pub color: MarkerColor,
}

/// Write access for path preview annotations.
pub trait PreviewSink {
    /// Set or clear the preview annotation of a tile.
    fn set_preview(&mut self, pos: Position, mark: Option<PreviewMark>);
}
