//! Tiles and the terrain parts they are built from.
//!
//! A tile holds up to four parts: a floor, a wall along its west edge, a
//! wall along its north edge and an object standing on it. South and east
//! edges belong to the neighbouring tiles' north and west walls.

use crate::geom::Position;
use crate::unit::{Faction, MovementType, UnitId};

/// TU cost that marks a part (or a step) as impassable.
pub const INVALID_MOVE_COST: i32 = 255;

/// Terrain level of the upper step of a staircase.
pub const UPPER_STAIR_LEVEL: i32 = -16;
/// Terrain level of the lower step of a staircase.
pub const LOWER_STAIR_LEVEL: i32 = -8;
/// Objects at or above this level below a floorless tile can be stepped down onto.
pub const HIGH_STEP_LEVEL: i32 = -12;
/// Terrain level of a full-height object; the tile above it has support.
pub const FULL_HEIGHT_LEVEL: i32 = -24;

/// The four structural parts of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TilePart {
    Floor = 0,
    WestWall = 1,
    NorthWall = 2,
    Object = 3,
}

impl TilePart {
    /// All parts in storage order.
    pub const ALL: [TilePart; 4] = [
        TilePart::Floor,
        TilePart::WestWall,
        TilePart::NorthWall,
        TilePart::Object,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// How an object-part wall obstructs movement through and around its tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BigWall {
    #[default]
    None,
    /// Fills the tile; also stops diagonal moves past its corners.
    Block,
    /// Diagonal wall from the north-east corner to the south-west corner.
    NeSw,
    /// Diagonal wall from the north-west corner to the south-east corner.
    NwSe,
    West,
    North,
    East,
    South,
    EastAndSouth,
    WestAndNorth,
}

impl BigWall {
    /// Whether this subtype can stop a diagonal move cutting a corner.
    #[inline]
    pub fn blocks_diagonals(self) -> bool {
        matches!(self, BigWall::Block | BigWall::NeSw | BigWall::NwSe)
    }

    /// Whether this subtype sits on a tile edge and leaves the interior open.
    #[inline]
    pub fn is_edge(self) -> bool {
        matches!(
            self,
            BigWall::West
                | BigWall::North
                | BigWall::East
                | BigWall::South
                | BigWall::EastAndSouth
                | BigWall::WestAndNorth
        )
    }

    /// Whether it closes the tile's west edge.
    #[inline]
    pub fn closes_west(self) -> bool {
        matches!(self, BigWall::West | BigWall::WestAndNorth)
    }

    /// Whether it closes the tile's north edge.
    #[inline]
    pub fn closes_north(self) -> bool {
        matches!(self, BigWall::North | BigWall::WestAndNorth)
    }

    /// Whether it closes the tile's east edge.
    #[inline]
    pub fn closes_east(self) -> bool {
        matches!(self, BigWall::East | BigWall::EastAndSouth)
    }

    /// Whether it closes the tile's south edge.
    #[inline]
    pub fn closes_south(self) -> bool {
        matches!(self, BigWall::South | BigWall::EastAndSouth)
    }
}

/// Door behaviour of a part.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DoorKind {
    #[default]
    None,
    /// Opens as a unit walks through and closes behind it.
    Swing,
    /// Sliding door that stays open once triggered.
    Ufo,
}

/// Static terrain data of one tile part.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartData {
    /// TUs a walker pays to cross the part; 255 means impassable.
    pub tu_walk: i32,
    /// TUs a flyer pays to cross the part; 255 means impassable.
    pub tu_fly: i32,
    /// Height of the walking surface, 0 at ground, negative upwards in
    /// 1/24ths of a level.
    pub terrain_level: i32,
    pub big_wall: BigWall,
    /// A floor part that does not carry weight (grates, holes).
    pub no_floor: bool,
    pub door: DoorKind,
    pub grav_lift: bool,
    /// A lift floor projectiles can pass through vertically.
    pub hollow: bool,
}

impl Default for PartData {
    fn default() -> Self {
        Self {
            tu_walk: 0,
            tu_fly: 0,
            terrain_level: 0,
            big_wall: BigWall::None,
            no_floor: false,
            door: DoorKind::None,
            grav_lift: false,
            hollow: false,
        }
    }
}

impl PartData {
    /// Plain floor costing `tu` to walk or fly over.
    pub fn floor(tu: i32) -> Self {
        Self {
            tu_walk: tu,
            tu_fly: tu,
            ..Self::default()
        }
    }

    /// Grav lift floor.
    pub fn lift() -> Self {
        Self {
            grav_lift: true,
            hollow: true,
            ..Self::floor(4)
        }
    }

    /// An impassable wall, for use as a west or north wall part.
    pub fn wall() -> Self {
        Self::floor(INVALID_MOVE_COST)
    }

    /// A door, for use as a west or north wall part. Crossing it is free.
    pub fn door(kind: DoorKind) -> Self {
        Self {
            door: kind,
            ..Self::default()
        }
    }

    /// An object costing `tu` extra to move through.
    pub fn object(tu: i32) -> Self {
        Self::floor(tu)
    }

    /// An impassable object of the given big-wall subtype.
    pub fn big_wall(kind: BigWall) -> Self {
        Self {
            big_wall: kind,
            ..Self::wall()
        }
    }

    /// A full-height impassable object that can be stood on from above.
    pub fn block() -> Self {
        Self {
            terrain_level: FULL_HEIGHT_LEVEL,
            ..Self::wall()
        }
    }

    /// A staircase step at the given terrain level.
    pub fn stairs(terrain_level: i32) -> Self {
        Self {
            terrain_level,
            ..Self::default()
        }
    }

    /// Replace the terrain level.
    pub fn with_terrain_level(mut self, terrain_level: i32) -> Self {
        self.terrain_level = terrain_level;
        self
    }

    /// Mark as a floor part that gives no support.
    pub fn with_no_floor(mut self) -> Self {
        self.no_floor = true;
        self
    }

    /// TU cost for the given movement type.
    #[inline]
    pub fn tu_cost(&self, movement: MovementType) -> i32 {
        match movement {
            MovementType::Walk => self.tu_walk,
            MovementType::Fly | MovementType::Swim => self.tu_fly,
            MovementType::None => INVALID_MOVE_COST,
        }
    }
}

/// A unit standing on a tile, as other movers see it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occupant {
    pub unit: UnitId,
    pub faction: Faction,
    pub size: i32,
    /// Whether the player's side has spotted it.
    pub visible: bool,
    /// Dead or unconscious; does not block anyone.
    pub out: bool,
}

impl Occupant {
    pub fn new(unit: UnitId, faction: Faction) -> Self {
        Self {
            unit,
            faction,
            size: 1,
            visible: true,
            out: false,
        }
    }
}

/// One cell of the battlescape.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    position: Position,
    parts: [Option<PartData>; 4],
    door_open: [bool; 4],
    pub occupant: Option<Occupant>,
    /// Turns of fire left; zero when not burning.
    pub fire: i32,
    /// Whether the player's side currently sees this tile.
    pub visible_to_player: bool,
    /// Whether the AI sides currently see this tile.
    pub visible_to_hostile: bool,
}

impl Tile {
    /// An empty tile: no parts at all, so nothing to stand on.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            parts: [None; 4],
            door_open: [false; 4],
            occupant: None,
            fire: 0,
            visible_to_player: false,
            visible_to_hostile: false,
        }
    }

    /// Where the tile is.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Data of one part, if present.
    #[inline]
    pub fn part(&self, part: TilePart) -> Option<&PartData> {
        self.parts[part.index()].as_ref()
    }

    /// Replace (or remove) one part.
    #[inline]
    pub fn set_part(&mut self, part: TilePart, data: Option<PartData>) {
        self.parts[part.index()] = data;
    }

    /// Builder form of [`set_part`](Self::set_part).
    pub fn with_part(mut self, part: TilePart, data: PartData) -> Self {
        self.set_part(part, Some(data));
        self
    }

    /// TU cost of crossing a part; 0 when the part is absent.
    #[inline]
    pub fn tu_cost(&self, part: TilePart, movement: MovementType) -> i32 {
        self.part(part).map_or(0, |d| d.tu_cost(movement))
    }

    /// Height of the walking surface: the highest of floor and object.
    pub fn terrain_level(&self) -> i32 {
        [TilePart::Floor, TilePart::Object]
            .iter()
            .filter_map(|&p| self.part(p))
            .map(|d| d.terrain_level)
            .min()
            .unwrap_or(0)
            .min(0)
    }

    /// Whether nothing holds a unit up on this tile. A full-height object
    /// on `below` supports the tile even without a floor part.
    pub fn has_no_floor(&self, below: Option<&Tile>) -> bool {
        if below.is_some_and(|b| b.terrain_level() == FULL_HEIGHT_LEVEL) {
            return false;
        }
        self.part(TilePart::Floor).is_none_or(|f| f.no_floor)
    }

    /// Big-wall subtype of the object part.
    #[inline]
    pub fn big_wall(&self) -> BigWall {
        self.part(TilePart::Object)
            .map_or(BigWall::None, |d| d.big_wall)
    }

    /// Whether the part is a door that is currently shut.
    pub fn is_door_closed(&self, part: TilePart) -> bool {
        match self.part(part).map(|d| d.door) {
            Some(DoorKind::Swing) => true,
            Some(DoorKind::Ufo) => !self.door_open[part.index()],
            _ => false,
        }
    }

    /// Open or close a UFO door on a part.
    #[inline]
    pub fn set_door_open(&mut self, part: TilePart, open: bool) {
        self.door_open[part.index()] = open;
    }

    #[inline]
    pub fn is_on_fire(&self) -> bool {
        self.fire > 0
    }

    /// Whether units opposing `faction` can see this tile.
    #[inline]
    pub fn is_watched_by_enemies_of(&self, faction: Faction) -> bool {
        match faction {
            Faction::Player => self.visible_to_hostile,
            Faction::Hostile | Faction::Neutral => self.visible_to_player,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floored(pos: Position) -> Tile {
        Tile::new(pos).with_part(TilePart::Floor, PartData::floor(4))
    }

    #[test]
    fn empty_tile_has_no_floor() {
        let t = Tile::new(Position::new(0, 0, 1));
        assert!(t.has_no_floor(None));
        assert_eq!(t.terrain_level(), 0);
    }

    #[test]
    fn full_height_block_supports_tile_above() {
        let below = Tile::new(Position::ZERO).with_part(TilePart::Object, PartData::block());
        let t = Tile::new(Position::new(0, 0, 1));
        assert!(!t.has_no_floor(Some(&below)));
        assert_eq!(below.terrain_level(), FULL_HEIGHT_LEVEL);
    }

    #[test]
    fn grate_floor_gives_no_support() {
        let t = Tile::new(Position::ZERO)
            .with_part(TilePart::Floor, PartData::floor(4).with_no_floor());
        assert!(t.has_no_floor(None));
    }

    #[test]
    fn terrain_level_takes_highest_part() {
        let t = floored(Position::ZERO)
            .with_part(TilePart::Object, PartData::stairs(UPPER_STAIR_LEVEL));
        assert_eq!(t.terrain_level(), UPPER_STAIR_LEVEL);
    }

    #[test]
    fn tu_cost_by_movement() {
        let mut data = PartData::floor(6);
        data.tu_fly = 4;
        let t = Tile::new(Position::ZERO).with_part(TilePart::Floor, data);
        assert_eq!(t.tu_cost(TilePart::Floor, MovementType::Walk), 6);
        assert_eq!(t.tu_cost(TilePart::Floor, MovementType::Fly), 4);
        assert_eq!(t.tu_cost(TilePart::Floor, MovementType::None), INVALID_MOVE_COST);
        assert_eq!(t.tu_cost(TilePart::Object, MovementType::Walk), 0);
    }

    #[test]
    fn doors() {
        let mut t = floored(Position::ZERO)
            .with_part(TilePart::WestWall, PartData::door(DoorKind::Ufo))
            .with_part(TilePart::NorthWall, PartData::door(DoorKind::Swing));
        assert!(t.is_door_closed(TilePart::WestWall));
        assert!(t.is_door_closed(TilePart::NorthWall));
        t.set_door_open(TilePart::WestWall, true);
        assert!(!t.is_door_closed(TilePart::WestWall));
        t.set_door_open(TilePart::NorthWall, true);
        assert!(t.is_door_closed(TilePart::NorthWall));
        assert!(!t.is_door_closed(TilePart::Floor));
    }

    #[test]
    fn big_wall_edges() {
        assert!(BigWall::NeSw.blocks_diagonals());
        assert!(!BigWall::West.blocks_diagonals());
        assert!(BigWall::WestAndNorth.closes_west());
        assert!(BigWall::WestAndNorth.closes_north());
        assert!(BigWall::EastAndSouth.closes_east());
        assert!(BigWall::EastAndSouth.closes_south());
        assert!(!BigWall::Block.is_edge());
        let t = floored(Position::ZERO).with_part(TilePart::Object, PartData::big_wall(BigWall::South));
        assert_eq!(t.big_wall(), BigWall::South);
    }

    #[test]
    fn watch_sides() {
        let mut t = floored(Position::ZERO);
        t.visible_to_player = true;
        assert!(t.is_watched_by_enemies_of(Faction::Hostile));
        assert!(!t.is_watched_by_enemies_of(Faction::Player));
    }
}
