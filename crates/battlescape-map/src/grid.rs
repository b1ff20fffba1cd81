//! A dense 3D tile store.
//!
//! [`TileGrid`] keeps one [`Tile`] per position of a [`MapSize`] box,
//! laid out by [`MapSize::index`], plus one preview slot per tile. It is
//! the reference implementation of the [`BattleMap`] and [`PreviewSink`]
//! collaborators.

use battlescape_core::{
    BattleMap, BattleUnit, MapSize, Occupant, PartData, Position, PreviewMark, PreviewSink, Tile,
    TilePart, UnitId,
};

/// Every tile of a battlescape.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGrid {
    size: MapSize,
    tiles: Vec<Tile>,
    previews: Vec<Option<PreviewMark>>,
    underwater: bool,
}

impl TileGrid {
    /// Create a grid of empty tiles: no floor anywhere.
    pub fn new(size: MapSize) -> Self {
        Self {
            size,
            tiles: size.iter().map(Tile::new).collect(),
            previews: vec![None; size.len()],
            underwater: false,
        }
    }

    /// Create a grid with a plain floor on the ground level and open air
    /// above it.
    pub fn with_floor(size: MapSize) -> Self {
        let mut grid = Self::new(size);
        grid.fill_level(0, TilePart::Floor, Some(PartData::floor(4)));
        grid
    }

    /// Map dimensions.
    #[inline]
    pub fn size(&self) -> MapSize {
        self.size
    }

    /// Whether the grid contains the given position.
    #[inline]
    pub fn contains(&self, p: Position) -> bool {
        self.size.contains(p)
    }

    /// Get the tile at a position, or `None` if out of bounds.
    #[inline]
    pub fn at(&self, p: Position) -> Option<&Tile> {
        self.size.index(p).map(|i| &self.tiles[i])
    }

    /// Mutable access to the tile at a position.
    #[inline]
    pub fn tile_mut(&mut self, p: Position) -> Option<&mut Tile> {
        self.size.index(p).map(|i| &mut self.tiles[i])
    }

    /// Replace one part of a tile. Returns `false` off the map.
    pub fn set_part(&mut self, p: Position, part: TilePart, data: Option<PartData>) -> bool {
        match self.tile_mut(p) {
            Some(t) => {
                t.set_part(part, data);
                true
            }
            None => false,
        }
    }

    /// Set one part on every tile of a level.
    pub fn fill_level(&mut self, z: i32, part: TilePart, data: Option<PartData>) {
        for t in self.tiles.iter_mut().filter(|t| t.position().z == z) {
            t.set_part(part, data);
        }
    }

    /// Put `unit` on the map: every tile of its footprint records it as the
    /// occupant. Returns `false`, leaving the map untouched, if the
    /// footprint does not fit.
    pub fn place_unit(&mut self, unit: &BattleUnit, visible: bool) -> bool {
        if !self.size.contains_footprint(unit.position, unit.size) {
            return false;
        }
        let occupant = Occupant {
            size: unit.size,
            visible,
            ..Occupant::new(unit.id, unit.faction)
        };
        let cells: Vec<Position> = unit.footprint().map(|off| unit.position + off).collect();
        for p in cells {
            if let Some(t) = self.tile_mut(p) {
                t.occupant = Some(occupant);
            }
        }
        true
    }

    /// Take a unit off the map. Returns the number of tiles it covered.
    pub fn remove_unit(&mut self, id: UnitId) -> usize {
        let mut removed = 0;
        for t in self.tiles.iter_mut() {
            if t.occupant.is_some_and(|o| o.unit == id) {
                t.occupant = None;
                removed += 1;
            }
        }
        removed
    }

    pub fn set_underwater(&mut self, underwater: bool) {
        self.underwater = underwater;
    }

    /// Preview annotation of a tile.
    #[inline]
    pub fn preview(&self, p: Position) -> Option<PreviewMark> {
        self.size.index(p).and_then(|i| self.previews[i])
    }

    /// Every annotated tile, in index order.
    pub fn previewed(&self) -> impl Iterator<Item = (Position, PreviewMark)> + '_ {
        let size = self.size;
        self.previews
            .iter()
            .enumerate()
            .filter_map(move |(i, m)| m.map(|m| (size.position(i), m)))
    }

    /// Drop every preview annotation.
    pub fn clear_previews(&mut self) {
        self.previews.fill(None);
    }

    /// Iterate over all tiles in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Count the tiles matching a predicate.
    pub fn count(&self, pred: impl Fn(&Tile) -> bool) -> usize {
        self.tiles.iter().filter(|t| pred(t)).count()
    }
}

impl BattleMap for TileGrid {
    #[inline]
    fn size(&self) -> MapSize {
        self.size
    }

    #[inline]
    fn tile(&self, pos: Position) -> Option<&Tile> {
        self.at(pos)
    }

    #[inline]
    fn is_underwater(&self) -> bool {
        self.underwater
    }
}

impl PreviewSink for TileGrid {
    fn set_preview(&mut self, pos: Position, mark: Option<PreviewMark>) {
        if let Some(i) = self.size.index(pos) {
            self.previews[i] = mark;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battlescape_core::{Direction, Faction, MarkerColor};

    #[test]
    fn tiles_know_their_position() {
        let g = TileGrid::new(MapSize::new(3, 2, 2));
        for p in g.size().iter() {
            assert_eq!(g.at(p).map(|t| t.position()), Some(p));
        }
        assert!(g.at(Position::new(3, 0, 0)).is_none());
        assert!(g.at(Position::new(0, 0, -1)).is_none());
    }

    #[test]
    fn with_floor_only_covers_ground() {
        let g = TileGrid::with_floor(MapSize::new(2, 2, 2));
        assert_eq!(g.count(|t| t.part(TilePart::Floor).is_some()), 4);
        let upper = g.at(Position::new(0, 0, 1)).unwrap();
        assert!(upper.has_no_floor(g.at(Position::ZERO)));
    }

    #[test]
    fn set_part_off_map() {
        let mut g = TileGrid::new(MapSize::new(1, 1, 1));
        assert!(g.set_part(Position::ZERO, TilePart::Object, Some(PartData::object(2))));
        assert!(!g.set_part(Position::new(1, 0, 0), TilePart::Object, None));
        assert_eq!(g.at(Position::ZERO).unwrap().tu_cost(TilePart::Object, Default::default()), 2);
    }

    #[test]
    fn place_and_remove_units() {
        let mut g = TileGrid::with_floor(MapSize::new(4, 4, 1));
        let big = BattleUnit::new(UnitId(5), Position::new(1, 1, 0))
            .with_size(2)
            .with_faction(Faction::Hostile);
        assert!(g.place_unit(&big, false));
        let occ = g.at(Position::new(2, 2, 0)).unwrap().occupant.unwrap();
        assert_eq!(occ.size, 2);
        assert!(!occ.visible);
        assert_eq!(g.count(|t| t.occupant.is_some()), 4);
        assert_eq!(g.remove_unit(UnitId(5)), 4);

        let off = BattleUnit::new(UnitId(6), Position::new(3, 3, 0)).with_size(2);
        assert!(!g.place_unit(&off, true));
        assert_eq!(g.count(|t| t.occupant.is_some()), 0);
    }

    #[test]
    fn previews_are_stored_per_tile() {
        let mut g = TileGrid::new(MapSize::new(3, 1, 1));
        let mark = PreviewMark {
            direction: Some(Direction::East),
            value: Some(12),
            color: MarkerColor::Green,
        };
        g.set_preview(Position::new(1, 0, 0), Some(mark));
        g.set_preview(Position::new(7, 0, 0), Some(mark));
        assert_eq!(g.preview(Position::new(1, 0, 0)), Some(mark));
        assert_eq!(g.previewed().count(), 1);
        g.clear_previews();
        assert_eq!(g.previewed().count(), 0);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn grid_round_trip() {
        let mut g = TileGrid::with_floor(MapSize::new(2, 2, 2));
        g.set_part(Position::ZERO, TilePart::WestWall, Some(PartData::wall()));
        g.set_underwater(true);
        let json = serde_json::to_string(&g).unwrap();
        let back: TileGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
    }
}
