//! Step legality and pricing.
//!
//! Nothing is precomputed: every candidate step is judged on demand against
//! the live map, the moving unit's footprint and the move mode.

use battlescape_core::tile::{HIGH_STEP_LEVEL, UPPER_STAIR_LEVEL};
use battlescape_core::{
    BattleMap, BattleUnit, BigWall, Direction, INVALID_MOVE_COST, MovementType, Occupant,
    Position, Tile, TilePart, UnitId,
};

use crate::config::{MAX_MOVE_COST, PathfindingConfig};
use crate::cost::{PathfindingCost, PathfindingStep};

const NORTH: Position = Position::new(0, -1, 0);
const EAST: Position = Position::new(1, 0, 0);
const SOUTH: Position = Position::new(0, 1, 0);
const WEST: Position = Position::new(-1, 0, 0);

/// How a move is carried out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveMode {
    #[default]
    Normal,
    /// Cheaper in TUs, dearer in energy.
    Run,
    /// Sidestep to an adjacent tile without turning.
    Strafe,
    /// Avoid tiles the enemy watches and tiles on fire.
    Sneak,
    /// Trace for a guided projectile rather than a unit.
    Missile,
}

/// A structural part to test, or the diagonal big-wall pseudo-part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockPart {
    Part(TilePart),
    BigWall,
}

impl From<TilePart> for BlockPart {
    fn from(part: TilePart) -> Self {
        BlockPart::Part(part)
    }
}

/// Judges single steps for one unit on one map.
///
/// The oracle only borrows its collaborators, so it is cheap to build for a
/// single query and is rebuilt for every search.
pub struct LegalityOracle<'a, M: BattleMap + ?Sized> {
    map: &'a M,
    unit: &'a BattleUnit,
    config: &'a PathfindingConfig,
    mode: MoveMode,
    missile_target: Option<UnitId>,
    movement: MovementType,
}

impl<'a, M: BattleMap + ?Sized> LegalityOracle<'a, M> {
    /// An oracle for a normal move of `unit`.
    pub fn new(map: &'a M, unit: &'a BattleUnit, config: &'a PathfindingConfig) -> Self {
        let mut oracle = Self {
            map,
            unit,
            config,
            mode: MoveMode::Normal,
            missile_target: None,
            movement: MovementType::Walk,
        };
        oracle.movement = oracle.resolve_movement();
        oracle
    }

    /// Judge steps for the given move mode.
    pub fn with_mode(mut self, mode: MoveMode) -> Self {
        self.mode = mode;
        self.movement = self.resolve_movement();
        self
    }

    /// Judge steps of a projectile homing on `target`.
    pub fn with_missile_target(mut self, target: Option<UnitId>) -> Self {
        self.missile_target = target;
        self.movement = self.resolve_movement();
        self
    }

    fn resolve_movement(&self) -> MovementType {
        if self.is_missile() {
            return MovementType::Fly;
        }
        match self.unit.movement {
            MovementType::Swim if self.map.is_underwater() => MovementType::Fly,
            MovementType::Swim => MovementType::Walk,
            m => m,
        }
    }

    #[inline]
    pub fn mode(&self) -> MoveMode {
        self.mode
    }

    /// Effective movement type: missiles fly, swimmers fly only underwater.
    #[inline]
    pub fn movement(&self) -> MovementType {
        self.movement
    }

    #[inline]
    pub fn unit(&self) -> &BattleUnit {
        self.unit
    }

    #[inline]
    pub fn map(&self) -> &'a M {
        self.map
    }

    #[inline]
    pub fn is_missile(&self) -> bool {
        self.mode == MoveMode::Missile || self.missile_target.is_some()
    }

    #[inline]
    fn flying(&self) -> bool {
        self.movement == MovementType::Fly
    }

    #[inline]
    fn tile(&self, pos: Position) -> Option<&'a Tile> {
        self.map.tile(pos)
    }

    // -----------------------------------------------------------------------
    // Blocking
    // -----------------------------------------------------------------------

    /// Whether `part` of `tile` stops this mover. A missing tile is off the
    /// map and always blocks. For [`BlockPart::BigWall`], a diagonal-blocking
    /// big wall equal to `big_wall_exclusion` is let through.
    pub fn is_blocked(
        &self,
        tile: Option<&Tile>,
        part: BlockPart,
        big_wall_exclusion: Option<BigWall>,
    ) -> bool {
        let Some(tile) = tile else {
            return true;
        };
        let part = match part {
            BlockPart::BigWall => {
                let bw = tile.big_wall();
                return bw.blocks_diagonals() && Some(bw) != big_wall_exclusion;
            }
            BlockPart::Part(p) => p,
        };
        let pos = tile.position();
        match part {
            TilePart::WestWall => {
                if tile.big_wall().closes_west() {
                    return true;
                }
                match self.tile(pos + WEST) {
                    Some(west) if !west.big_wall().closes_east() => {}
                    _ => return true,
                }
            }
            TilePart::NorthWall => {
                if tile.big_wall().closes_north() {
                    return true;
                }
                match self.tile(pos + NORTH) {
                    Some(north) if !north.big_wall().closes_south() => {}
                    _ => return true,
                }
            }
            TilePart::Floor => {
                if let Some(occ) = tile.occupant {
                    if self.occupant_blocks(&occ) {
                        return true;
                    }
                } else if !self.flying()
                    && tile.has_no_floor(self.tile(pos.below()))
                    && self.fall_is_blocked(pos)
                {
                    return true;
                }
            }
            TilePart::Object => {
                if tile.big_wall().is_edge() {
                    return false;
                }
            }
        }
        if self.is_missile() && tile.is_door_closed(part) {
            return true;
        }
        tile.tu_cost(part, self.movement) >= INVALID_MOVE_COST
    }

    #[inline]
    fn part_blocked(&self, tile: Option<&Tile>, part: TilePart) -> bool {
        self.is_blocked(tile, BlockPart::Part(part), None)
    }

    #[inline]
    fn corner_blocked(&self, tile: Option<&Tile>, parallel: BigWall) -> bool {
        self.is_blocked(tile, BlockPart::BigWall, Some(parallel))
    }

    fn occupant_blocks(&self, occ: &Occupant) -> bool {
        if occ.unit == self.unit.id || Some(occ.unit) == self.missile_target || occ.out {
            return false;
        }
        if self.unit.faction.is_ai() {
            // The AI knows where everyone is.
            return true;
        }
        occ.visible || !occ.faction.is_ai()
    }

    /// Scan the column a walker would drop down from `pos`. Large units never
    /// land on anyone and nobody lands on a large unit.
    fn fall_is_blocked(&self, mut pos: Position) -> bool {
        while pos.z >= 0 {
            let Some(t) = self.tile(pos) else {
                break;
            };
            if let Some(occ) = t.occupant.filter(|o| o.unit != self.unit.id) {
                if self.unit.size > 1 {
                    return true;
                }
                if Some(occ.unit) != self.missile_target && !occ.out && occ.size > 1 {
                    return true;
                }
            }
            if !t.has_no_floor(self.tile(pos.below())) {
                break;
            }
            pos = pos.below();
        }
        false
    }

    /// Whether a step from `start` in `direction` is stopped by walls, wall
    /// corners or the contents of the destination tile. Diagonal steps also
    /// test both tiles flanking the corner they cut.
    pub fn is_blocked_direction(&self, start: &Tile, direction: Direction) -> bool {
        let pos = start.position();
        let end = self.tile(pos + direction.vector());
        let start = Some(start);
        use TilePart::{NorthWall, WestWall};
        let walls = match direction {
            Direction::North => self.part_blocked(start, NorthWall),
            Direction::NorthEast => {
                let east = self.tile(pos + EAST);
                let north = self.tile(pos + NORTH);
                self.part_blocked(start, NorthWall)
                    || self.part_blocked(end, WestWall)
                    || self.part_blocked(east, WestWall)
                    || self.part_blocked(east, NorthWall)
                    || self.corner_blocked(east, BigWall::NeSw)
                    || self.corner_blocked(north, BigWall::NeSw)
            }
            Direction::East => self.part_blocked(end, WestWall),
            Direction::SouthEast => {
                let east = self.tile(pos + EAST);
                let south = self.tile(pos + SOUTH);
                self.part_blocked(end, WestWall)
                    || self.part_blocked(end, NorthWall)
                    || self.part_blocked(east, WestWall)
                    || self.part_blocked(south, NorthWall)
                    || self.corner_blocked(east, BigWall::NwSe)
                    || self.corner_blocked(south, BigWall::NwSe)
            }
            Direction::South => self.part_blocked(end, NorthWall),
            Direction::SouthWest => {
                let south = self.tile(pos + SOUTH);
                let west = self.tile(pos + WEST);
                self.part_blocked(end, NorthWall)
                    || self.part_blocked(start, WestWall)
                    || self.part_blocked(south, WestWall)
                    || self.part_blocked(south, NorthWall)
                    || self.corner_blocked(south, BigWall::NeSw)
                    || self.corner_blocked(west, BigWall::NeSw)
            }
            Direction::West => self.part_blocked(start, WestWall),
            Direction::NorthWest => {
                let north = self.tile(pos + NORTH);
                let west = self.tile(pos + WEST);
                self.part_blocked(start, WestWall)
                    || self.part_blocked(start, NorthWall)
                    || self.part_blocked(west, NorthWall)
                    || self.part_blocked(north, WestWall)
                    || self.corner_blocked(north, BigWall::NwSe)
                    || self.corner_blocked(west, BigWall::NwSe)
            }
            Direction::Up | Direction::Down => false,
        };
        walls || self.contents_blocked(end)
    }

    #[inline]
    fn contents_blocked(&self, tile: Option<&Tile>) -> bool {
        self.part_blocked(tile, TilePart::Floor) || self.part_blocked(tile, TilePart::Object)
    }

    // -----------------------------------------------------------------------
    // Support and vertical movement
    // -----------------------------------------------------------------------

    /// Whether a unit on `tile` has nothing under its feet and would drop a
    /// level. The ground level never falls.
    pub fn can_fall_down(&self, tile: &Tile) -> bool {
        let pos = tile.position();
        pos.z > 0 && tile.has_no_floor(self.tile(pos.below()))
    }

    /// [`can_fall_down`](Self::can_fall_down) for every tile of a `size`×`size`
    /// footprint anchored at `tile`.
    pub fn can_fall_down_sized(&self, tile: &Tile, size: i32) -> bool {
        let origin = tile.position();
        (0..size.max(1)).all(|y| {
            (0..size.max(1)).all(|x| {
                self.tile(origin.shift(x, y, 0))
                    .is_some_and(|t| self.can_fall_down(t))
            })
        })
    }

    /// Whether a straight up or down move from `start` is possible: through a
    /// grav lift, or by flying through open sky. Missiles need a hollow lift
    /// floor to pass.
    pub fn validate_up_down(&self, start: Position, direction: Direction, missile: bool) -> bool {
        if !direction.is_vertical() {
            return false;
        }
        let Some(start_tile) = self.tile(start) else {
            return false;
        };
        let Some(dest) = self.tile(start + direction.vector()) else {
            return false;
        };
        let is_lift = |t: &Tile| t.part(TilePart::Floor).is_some_and(|f| f.grav_lift);
        if is_lift(start_tile) && is_lift(dest) {
            if missile {
                let crossed = if direction == Direction::Up { dest } else { start_tile };
                return crossed.part(TilePart::Floor).is_some_and(|f| f.hollow);
            }
            return true;
        }
        if self.flying() {
            return match direction {
                Direction::Up => dest.has_no_floor(Some(start_tile)),
                _ => start_tile.has_no_floor(Some(dest)),
            };
        }
        false
    }

    /// Whether clicking `end` from `start` means "climb the stairs in front
    /// of me": an upper step lies just south (or east) of `end`, the lower
    /// step behind it, and `start` is one of the three tiles beyond.
    pub fn is_on_stairs(&self, start: Position, end: Position) -> bool {
        is_on_stairs(self.map, start, end)
    }

    // -----------------------------------------------------------------------
    // Pricing
    // -----------------------------------------------------------------------

    /// Price one step of the unit's footprint from `start` in `direction`.
    ///
    /// Returns an invalid step when any footprint tile cannot make the move.
    pub fn tu_cost(&self, start: Position, direction: Direction) -> PathfindingStep {
        let cfg = self.config;
        let mut end = start + direction.vector();
        if self.movement == MovementType::None {
            return PathfindingStep::invalid(end);
        }
        let size = self.unit.size.max(1);
        let cells = size * size;
        let footprint = || self.unit.footprint();
        let pair = |off: Position, lift: Position| -> Option<(&'a Tile, &'a Tile)> {
            Some((self.tile(start + off + lift)?, self.tile(end + off + lift)?))
        };

        if footprint().any(|off| pair(off, Position::ZERO).is_none()) {
            return PathfindingStep::invalid(end);
        }
        let Some(anchor) = self.tile(start) else {
            return PathfindingStep::invalid(end);
        };

        if !self.flying() && self.can_fall_down_sized(anchor, size) {
            if direction != Direction::Down || footprint().any(|off| self.contents_blocked(self.tile(end + off))) {
                return PathfindingStep::invalid(end);
            }
            return PathfindingStep {
                cost: PathfindingCost::ZERO,
                penalty: PathfindingCost::ZERO,
                pos: end,
                fall: true,
            };
        }

        if direction.is_vertical() {
            let missile = self.is_missile();
            if footprint().any(|off| {
                !self.validate_up_down(start + off, direction, missile)
                    || self.contents_blocked(self.tile(end + off))
            }) {
                return PathfindingStep::invalid(end);
            }
            let cost = PathfindingCost::new(cfg.vertical_move_cost, 0);
            return self.finish(cost, end);
        }

        let mut climbing = 0;
        let mut descending = 0;
        for (s, d) in footprint().filter_map(|off| pair(off, Position::ZERO)) {
            let above = self.tile(d.position().above());
            if s.terrain_level() <= UPPER_STAIR_LEVEL && above.is_some_and(|a| !a.has_no_floor(Some(d))) {
                climbing += 1;
            } else if !self.flying()
                && self.can_fall_down(d)
                && self
                    .tile(d.position().below())
                    .is_some_and(|b| b.terrain_level() <= HIGH_STEP_LEVEL)
            {
                descending += 1;
            }
        }
        let climb = climbing > 0;
        if climb && climbing < size {
            // A large unit cannot squeeze up a staircase narrower than itself.
            return PathfindingStep::invalid(end);
        }
        let descend = !climb && descending == cells;

        // Walls are judged on the level the step crosses.
        let lift = if climb { Position::UP } else { Position::ZERO };
        for off in footprint() {
            let Some((s, d)) = pair(off, lift) else {
                return PathfindingStep::invalid(end);
            };
            if self.is_blocked_direction(s, direction)
                || s.terrain_level() - d.terrain_level() > cfg.max_step_height
            {
                return PathfindingStep::invalid(end);
            }
        }

        let landing_shift = if climb {
            Position::UP
        } else if descend {
            Position::DOWN
        } else {
            Position::ZERO
        };
        end += landing_shift;
        for off in footprint() {
            let t = self.tile(end + off);
            if t.is_none() || ((climb || descend) && self.contents_blocked(t)) {
                return PathfindingStep::invalid(end);
            }
        }

        if size > 1 && !self.footprint_fits(end, size, descend) {
            return PathfindingStep::invalid(end);
        }

        let mut total = 0;
        for off in footprint() {
            let crossing = self.tile(start + off + lift).zip(self.tile(end - landing_shift + off + lift));
            let (Some((ws, wd)), Some(d)) = (crossing, self.tile(end + off)) else {
                return PathfindingStep::invalid(end);
            };
            let mut wall = self.wall_cost(ws, wd, direction);
            let floor = d.tu_cost(TilePart::Floor, self.movement);
            let mut cost = if floor == 0 || d.has_no_floor(self.tile(d.position().below())) {
                cfg.default_move_cost
            } else {
                floor
            };
            if !d.big_wall().is_edge() {
                cost += d.tu_cost(TilePart::Object, self.movement);
            }
            if climb {
                cost += cfg.stair_climb_cost;
            }
            if direction.is_diagonal() {
                wall /= 2;
                cost = PathfindingConfig::percent(cost, cfg.diagonal_cost_percent);
            }
            total += cost + wall;
        }
        let mut time = total / cells;

        if self.mode == MoveMode::Strafe
            && size == 1
            && direction != self.unit.direction
            && self.unit.direction.turns_to(direction) <= 2
        {
            time += cfg.strafe_cost;
        }
        let energy = PathfindingConfig::percent(time, cfg.energy_percent);
        self.finish(PathfindingCost::new(time, energy), end)
    }

    /// Apply run scaling, the fire penalty and the per-step cap.
    fn finish(&self, mut cost: PathfindingCost, end: Position) -> PathfindingStep {
        let cfg = self.config;
        if self.mode == MoveMode::Run {
            cost.time = PathfindingConfig::percent(cost.time, cfg.run_time_percent);
            cost.energy = PathfindingConfig::percent(cost.energy, cfg.run_energy_percent);
        }
        if cost.time > MAX_MOVE_COST {
            return PathfindingStep::invalid(end);
        }
        let mut penalty = PathfindingCost::ZERO;
        let burning = self
            .unit
            .footprint()
            .any(|off| self.tile(end + off).is_some_and(|t| t.is_on_fire()));
        if burning && self.avoids_fire() {
            penalty.time = cfg.fire_preview_move_cost;
        }
        PathfindingStep {
            cost,
            penalty,
            pos: end,
            fall: false,
        }
    }

    fn avoids_fire(&self) -> bool {
        !self.is_missile()
            && !self.unit.fire_immune
            && (self.unit.faction.is_ai() || self.mode == MoveMode::Sneak)
    }

    /// TUs for the wall parts (doors, hedges) a step passes through.
    fn wall_cost(&self, start: &Tile, end: &Tile, direction: Direction) -> i32 {
        let m = self.movement;
        let mut wall = 0;
        if matches!(direction, Direction::North | Direction::NorthEast | Direction::NorthWest) {
            wall += start.tu_cost(TilePart::NorthWall, m);
        }
        if matches!(direction, Direction::NorthEast | Direction::East | Direction::SouthEast) {
            wall += end.tu_cost(TilePart::WestWall, m);
        }
        if matches!(direction, Direction::SouthEast | Direction::South | Direction::SouthWest) {
            wall += end.tu_cost(TilePart::NorthWall, m);
        }
        if matches!(direction, Direction::SouthWest | Direction::West | Direction::NorthWest) {
            wall += start.tu_cost(TilePart::WestWall, m);
        }
        wall
    }

    /// A large unit's parts must be able to reach each other: check an X of
    /// diagonal moves inside every 2×2 block of the footprint at `end`.
    fn footprint_fits(&self, end: Position, size: i32, fell: bool) -> bool {
        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let nw = end.shift(x, y, 0);
                let pairs = [
                    (nw.shift(1, 1, 0), Direction::NorthWest),
                    (nw.shift(1, 0, 0), Direction::SouthWest),
                ];
                for (from, dir) in pairs {
                    let (Some(a), Some(b)) = (self.tile(from), self.tile(from + dir.vector())) else {
                        return false;
                    };
                    if self.is_blocked_direction(a, dir) {
                        return false;
                    }
                    if !fell
                        && (a.terrain_level() - b.terrain_level()).abs() > self.config.large_unit_step_height
                    {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// See [`LegalityOracle::is_on_stairs`]. Needs only the map.
pub fn is_on_stairs<M: BattleMap + ?Sized>(map: &M, start: Position, end: Position) -> bool {
    use battlescape_core::tile::LOWER_STAIR_LEVEL;
    let level = |p: Position| map.tile(p).map(|t| t.terrain_level());
    for step in [SOUTH, EAST] {
        if level(end + step) == Some(UPPER_STAIR_LEVEL) {
            if level(end + step * 2).is_some_and(|l| l != LOWER_STAIR_LEVEL) {
                return false;
            }
            if (1..=3).any(|k| start == end + step * k) {
                return true;
            }
        }
    }
    false
}
