use std::rc::Rc;

use battlescape_core::{
    BattleMap, BattleUnit, Direction, Faction, MapSize, MovementType, Position, TilePart, UnitId,
};

use crate::config::{ConfigError, DEFAULT_MAX_TU_COST, PathfindingConfig};
use crate::cost::{PathfindingCost, PathfindingStep};
use crate::node::{NodeGraph, PathfindingNode};
use crate::oracle::{LegalityOracle, MoveMode};

/// What to plan: a destination plus the knobs of one [`Pathfinding::calculate_with`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathRequest {
    pub destination: Position,
    pub mode: MoveMode,
    /// Plan for a guided missile homing on this unit, which does not block.
    pub missile_target: Option<UnitId>,
    /// Most TUs the path may charge.
    pub max_tu_cost: i32,
}

impl PathRequest {
    pub fn new(destination: Position) -> Self {
        Self {
            destination,
            mode: MoveMode::Normal,
            missile_target: None,
            max_tu_cost: DEFAULT_MAX_TU_COST,
        }
    }

    pub fn with_mode(mut self, mode: MoveMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_missile_target(mut self, target: UnitId) -> Self {
        self.missile_target = Some(target);
        self
    }

    pub fn with_max_tu_cost(mut self, max_tu_cost: i32) -> Self {
        self.max_tu_cost = max_tu_cost;
        self
    }
}

/// The movement planner of one battle.
///
/// `Pathfinding` owns the node graph, the current path and its preview
/// state, so that repeated queries reuse the same storage. Maps and units
/// are only borrowed for the duration of a call.
///
/// The path is kept last-step-first: [`dequeue_path`](Self::dequeue_path)
/// pops from the back, [`path`](Self::path) iterates in travel order.
pub struct Pathfinding {
    pub(crate) config: Rc<PathfindingConfig>,
    pub(crate) nodes: NodeGraph,
    pub(crate) path: Vec<Direction>,
    pub(crate) total: PathfindingCost,
    /// Snapshot of the unit last planned for, used to price the preview.
    pub(crate) unit: Option<BattleUnit>,
    pub(crate) mode: MoveMode,
    pub(crate) missile_target: Option<UnitId>,
    pub(crate) strafe: bool,
    pub(crate) previewed: bool,
    pub(crate) previewed_tiles: Vec<Position>,
    pub(crate) ctrl: bool,
    pub(crate) alt: bool,
    pub(crate) reachable: Vec<usize>,
}

impl Pathfinding {
    /// A planner for maps of `size` with the default cost policy.
    pub fn new(size: MapSize) -> Self {
        Self {
            config: Rc::new(PathfindingConfig::default()),
            nodes: NodeGraph::new(size),
            path: Vec::new(),
            total: PathfindingCost::ZERO,
            unit: None,
            mode: MoveMode::Normal,
            missile_target: None,
            strafe: false,
            previewed: false,
            previewed_tiles: Vec::new(),
            ctrl: false,
            alt: false,
            reachable: Vec::new(),
        }
    }

    /// A planner with a custom cost policy, rejected if it is unusable.
    pub fn with_config(size: MapSize, config: PathfindingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Rc::new(config),
            ..Self::new(size)
        })
    }

    #[inline]
    pub fn config(&self) -> &PathfindingConfig {
        &self.config
    }

    /// The node graph of the last search.
    #[inline]
    pub fn nodes(&self) -> &NodeGraph {
        &self.nodes
    }

    /// Search record of a tile in the last search.
    #[inline]
    pub fn node(&self, pos: Position) -> Option<&PathfindingNode> {
        self.nodes.at(pos)
    }

    // -----------------------------------------------------------------------
    // Planning
    // -----------------------------------------------------------------------

    /// Plan a path for `unit` to `destination`. See [`calculate_with`](Self::calculate_with).
    pub fn calculate<M: BattleMap + ?Sized>(
        &mut self,
        map: &M,
        unit: &BattleUnit,
        destination: Position,
        mode: MoveMode,
    ) -> bool {
        self.calculate_with(map, unit, &PathRequest::new(destination).with_mode(mode))
    }

    /// Plan a path and store it as the current path.
    ///
    /// Clicking the far end of a staircase targets the level above; walkers
    /// aiming at open air target the ground below. Strafing only applies to
    /// a 1×1 unit sidestepping to an adjacent tile. A straight line is tried
    /// first on a single level, A* otherwise. Returns whether a path was
    /// found; the path is empty when not.
    ///
    /// A successful plan keeps the preview flag, so the caller can redraw
    /// with [`refresh_path`](Self::refresh_path). A failed one drops it; the
    /// stale marks stay until `refresh_path` or
    /// [`remove_preview`](Self::remove_preview) wipes them.
    pub fn calculate_with<M: BattleMap + ?Sized>(
        &mut self,
        map: &M,
        unit: &BattleUnit,
        request: &PathRequest,
    ) -> bool {
        let found = self.plan(map, unit, request);
        if !found {
            self.previewed = false;
        }
        found
    }

    fn plan<M: BattleMap + ?Sized>(&mut self, map: &M, unit: &BattleUnit, request: &PathRequest) -> bool {
        self.path.clear();
        self.total = PathfindingCost::ZERO;
        self.nodes.fit(map.size());
        self.unit = Some(unit.clone());
        self.missile_target = request.missile_target;
        self.strafe = false;
        self.mode = request.mode;

        let size = unit.size.max(1);
        let map_size = map.size();
        let mut target = request.destination;
        if !map_size.contains_footprint(target, size) || !map_size.contains_footprint(unit.position, size) {
            log::warn!("path request for {} from {} to {target} leaves the map", unit.id, unit.position);
            return false;
        }

        let config = Rc::clone(&self.config);
        let probe = LegalityOracle::new(map, unit, &config)
            .with_mode(request.mode)
            .with_missile_target(request.missile_target);
        if probe.movement() == MovementType::None {
            return false;
        }
        let destination_blocked = unit.footprint().any(|off| {
            let tile = map.tile(target + off);
            probe.is_blocked(tile, TilePart::Floor.into(), None)
                || probe.is_blocked(tile, TilePart::Object.into(), None)
        });
        if destination_blocked {
            log::debug!("destination {target} is blocked for {}", unit.id);
            return false;
        }

        if probe.is_on_stairs(unit.position, target) && map_size.contains(target.above()) {
            target = target.above();
        }
        if probe.movement() != MovementType::Fly {
            while let Some(tile) = map.tile(target) {
                if !probe.can_fall_down_sized(tile, size) {
                    break;
                }
                target = target.below();
            }
        }
        if target == unit.position {
            return false;
        }

        let mut mode = request.mode;
        if mode == MoveMode::Strafe
            && !(size == 1 && target.z == unit.position.z && unit.position.flat_distance(target) == 1)
        {
            mode = MoveMode::Normal;
        }
        self.mode = mode;
        self.strafe = mode == MoveMode::Strafe;
        let sneak = mode == MoveMode::Sneak || (config.sneaky_ai && unit.faction == Faction::Hostile);

        let oracle = LegalityOracle::new(map, unit, &config)
            .with_mode(mode)
            .with_missile_target(request.missile_target);
        let start = unit.position;
        if start.z == target.z && self.bresenham_path(&oracle, start, target, sneak, request.max_tu_cost) {
            log::debug!(
                "straight path for {} to {target}: {} steps, {} TUs",
                unit.id,
                self.path.len(),
                self.total.time
            );
            return true;
        }
        if self.astar_path(&oracle, start, target, sneak, request.max_tu_cost) {
            log::debug!(
                "A* path for {} to {target}: {} steps, {} TUs",
                unit.id,
                self.path.len(),
                self.total.time
            );
            return true;
        }
        log::debug!("no path for {} from {start} to {target}", unit.id);
        self.path.clear();
        self.total = PathfindingCost::ZERO;
        false
    }

    // -----------------------------------------------------------------------
    // Path queue
    // -----------------------------------------------------------------------

    /// The first step of the path, if the oracle still allows it for `unit`
    /// (a door may have closed or someone may have stepped in the way).
    pub fn start_direction<M: BattleMap + ?Sized>(&self, map: &M, unit: &BattleUnit) -> Option<Direction> {
        let dir = self.peek_direction()?;
        let oracle = LegalityOracle::new(map, unit, &self.config)
            .with_mode(self.mode)
            .with_missile_target(self.missile_target);
        oracle.tu_cost(unit.position, dir).is_valid().then_some(dir)
    }

    /// The first step of the path without re-checking it.
    #[inline]
    pub fn peek_direction(&self) -> Option<Direction> {
        self.path.last().copied()
    }

    /// Take the first step off the path.
    #[inline]
    pub fn dequeue_path(&mut self) -> Option<Direction> {
        self.path.pop()
    }

    /// Drop the path and its preview flag. The marks already drawn stay on
    /// the map until [`remove_preview`](Self::remove_preview) or
    /// [`refresh_path`](Self::refresh_path) wipes them.
    pub fn abort_path(&mut self) {
        self.path.clear();
        self.total = PathfindingCost::ZERO;
        self.previewed = false;
    }

    /// Remaining steps in travel order.
    pub fn path(&self) -> impl DoubleEndedIterator<Item = Direction> + ExactSizeIterator + '_ {
        self.path.iter().rev().copied()
    }

    /// Remaining steps in travel order, as an owned copy.
    pub fn copy_path(&self) -> Vec<Direction> {
        self.path().collect()
    }

    #[inline]
    pub fn path_len(&self) -> usize {
        self.path.len()
    }

    /// TUs charged by the path as planned.
    #[inline]
    pub fn total_tu_cost(&self) -> i32 {
        self.total.time
    }

    #[inline]
    pub fn total_cost(&self) -> PathfindingCost {
        self.total
    }

    /// Whether the current path is a sidestep.
    #[inline]
    pub fn strafe_move(&self) -> bool {
        self.strafe
    }

    /// Move mode the current path was planned with, after strafe fallback.
    #[inline]
    pub fn move_mode(&self) -> MoveMode {
        self.mode
    }

    /// The unit the current path was planned for.
    #[inline]
    pub fn unit(&self) -> Option<&BattleUnit> {
        self.unit.as_ref()
    }

    #[inline]
    pub fn is_path_previewed(&self) -> bool {
        self.previewed
    }

    /// Record the keyboard modifiers that change how the preview is priced
    /// and labelled: ctrl previews a run, alt shows energy instead of TUs.
    pub fn set_modifiers(&mut self, ctrl: bool, alt: bool) {
        self.ctrl = ctrl;
        self.alt = alt;
    }

    #[inline]
    pub fn is_modifier_ctrl_used(&self) -> bool {
        self.ctrl
    }

    #[inline]
    pub fn is_modifier_alt_used(&self) -> bool {
        self.alt
    }

    // -----------------------------------------------------------------------
    // Probes
    // -----------------------------------------------------------------------

    /// An oracle for arbitrary unit queries under this planner's policy.
    pub fn oracle<'a, M: BattleMap + ?Sized>(
        &'a self,
        map: &'a M,
        unit: &'a BattleUnit,
        mode: MoveMode,
    ) -> LegalityOracle<'a, M> {
        LegalityOracle::new(map, unit, &self.config).with_mode(mode)
    }

    /// Price one step of `unit` from `start`.
    pub fn tu_cost<M: BattleMap + ?Sized>(
        &self,
        map: &M,
        unit: &BattleUnit,
        start: Position,
        direction: Direction,
        mode: MoveMode,
    ) -> PathfindingStep {
        self.oracle(map, unit, mode).tu_cost(start, direction)
    }

    /// Whether walls or the destination stop `unit` stepping from `start`.
    /// Off-map starts are blocked.
    pub fn is_blocked_direction<M: BattleMap + ?Sized>(
        &self,
        map: &M,
        unit: &BattleUnit,
        start: Position,
        direction: Direction,
    ) -> bool {
        map.tile(start).is_none_or(|tile| {
            self.oracle(map, unit, MoveMode::Normal)
                .is_blocked_direction(tile, direction)
        })
    }

    /// See [`LegalityOracle::validate_up_down`].
    pub fn validate_up_down<M: BattleMap + ?Sized>(
        &self,
        map: &M,
        unit: &BattleUnit,
        start: Position,
        direction: Direction,
        missile: bool,
    ) -> bool {
        let mode = if missile { MoveMode::Missile } else { MoveMode::Normal };
        self.oracle(map, unit, mode)
            .validate_up_down(start, direction, missile)
    }

    /// See [`LegalityOracle::is_on_stairs`].
    pub fn is_on_stairs<M: BattleMap + ?Sized>(&self, map: &M, start: Position, end: Position) -> bool {
        crate::oracle::is_on_stairs(map, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battlescape_core::{Occupant, UnitId};
    use battlescape_map::{TileGrid, mapgen};
    use rand::{RngExt, SeedableRng};

    fn open(w: i32, h: i32) -> TileGrid {
        TileGrid::with_floor(MapSize::new(w, h, 1))
    }

    fn soldier(x: i32, y: i32) -> BattleUnit {
        BattleUnit::new(UnitId(1), Position::new(x, y, 0))
    }

    #[test]
    fn two_steps_east() {
        let map = open(5, 5);
        let mut pf = Pathfinding::new(map.size());
        let u = soldier(0, 0);
        assert!(pf.calculate(&map, &u, Position::new(2, 0, 0), MoveMode::Normal));
        assert_eq!(pf.copy_path(), vec![Direction::East, Direction::East]);
        assert_eq!(pf.total_tu_cost(), 8);
        assert_eq!(pf.total_cost().energy, 4);
    }

    #[test]
    fn dequeue_drains_the_path() {
        let map = open(6, 6);
        let mut pf = Pathfinding::new(map.size());
        let u = soldier(0, 0);
        assert!(pf.calculate(&map, &u, Position::new(3, 5, 0), MoveMode::Normal));
        let n = pf.path_len();
        let expected = pf.copy_path();
        let mut taken = Vec::new();
        for _ in 0..n {
            taken.push(pf.dequeue_path().unwrap());
        }
        assert_eq!(taken, expected);
        assert_eq!(pf.dequeue_path(), None);
        assert_eq!(pf.peek_direction(), None);
    }

    #[test]
    fn abort_empties_the_path() {
        let map = open(4, 4);
        let mut pf = Pathfinding::new(map.size());
        assert!(pf.calculate(&map, &soldier(0, 0), Position::new(3, 3, 0), MoveMode::Normal));
        pf.abort_path();
        assert_eq!(pf.path().count(), 0);
        assert_eq!(pf.total_tu_cost(), 0);
        assert!(!pf.is_path_previewed());
    }

    #[test]
    fn start_direction_rechecks_the_first_step() {
        let mut map = open(4, 1);
        let mut pf = Pathfinding::new(map.size());
        let u = soldier(0, 0);
        assert!(pf.calculate(&map, &u, Position::new(3, 0, 0), MoveMode::Normal));
        assert_eq!(pf.start_direction(&map, &u), Some(Direction::East));
        map.tile_mut(Position::new(1, 0, 0)).unwrap().occupant =
            Some(Occupant::new(UnitId(2), battlescape_core::Faction::Player));
        assert_eq!(pf.start_direction(&map, &u), None);
        assert_eq!(pf.peek_direction(), Some(Direction::East));
    }

    #[test]
    fn off_map_destination_has_no_path() {
        let map = open(4, 4);
        let mut pf = Pathfinding::new(map.size());
        assert!(!pf.calculate(&map, &soldier(0, 0), Position::new(4, 0, 0), MoveMode::Normal));
        let big = soldier(0, 0).with_size(2);
        assert!(!pf.calculate(&map, &big, Position::new(3, 3, 0), MoveMode::Normal));
        assert_eq!(pf.path_len(), 0);
    }

    #[test]
    fn blocked_destination_has_no_path() {
        let map = TileGrid::from_layout(&["..#"]).unwrap();
        let mut pf = Pathfinding::new(map.size());
        assert!(!pf.calculate(&map, &soldier(0, 0), Position::new(2, 0, 0), MoveMode::Normal));
    }

    #[test]
    fn immobile_units_have_no_path() {
        let map = open(3, 3);
        let mut pf = Pathfinding::new(map.size());
        let u = soldier(0, 0).with_movement(MovementType::None);
        assert!(!pf.calculate(&map, &u, Position::new(2, 2, 0), MoveMode::Normal));
    }

    #[test]
    fn clicking_the_stair_top_goes_upstairs() {
        let map = TileGrid::from_layout(&["...\n.S.\n.s.\n...", "...\n___\n___\n___"]).unwrap();
        let mut pf = Pathfinding::new(map.size());
        let u = BattleUnit::new(UnitId(1), Position::new(1, 3, 0));
        assert!(pf.calculate(&map, &u, Position::new(1, 0, 0), MoveMode::Normal));
        assert_eq!(pf.copy_path(), vec![Direction::North; 3]);
        assert_eq!(pf.total_tu_cost(), 13);
    }

    #[test]
    fn clicking_open_air_targets_the_ground() {
        let map = TileGrid::from_layout(&["....", "..__"]).unwrap();
        let mut pf = Pathfinding::new(map.size());
        let u = BattleUnit::new(UnitId(1), Position::new(0, 0, 1));
        assert!(pf.calculate(&map, &u, Position::new(3, 0, 1), MoveMode::Normal));
        assert_eq!(pf.copy_path().last(), Some(&Direction::East));
        assert!(pf.copy_path().contains(&Direction::Down));
    }

    #[test]
    fn grav_lift_ride() {
        let map = TileGrid::from_layout(&["=..", "=..", "=.."]).unwrap();
        let mut pf = Pathfinding::new(map.size());
        let u = BattleUnit::new(UnitId(1), Position::new(2, 0, 0));
        assert!(pf.calculate(&map, &u, Position::new(2, 0, 2), MoveMode::Normal));
        let path = pf.copy_path();
        assert_eq!(path.iter().filter(|&&d| d == Direction::Up).count(), 2);
    }

    #[test]
    fn strafe_only_for_adjacent_sidesteps() {
        let map = open(5, 5);
        let mut pf = Pathfinding::new(map.size());
        let u = soldier(2, 2);
        assert!(pf.calculate(&map, &u, Position::new(3, 2, 0), MoveMode::Strafe));
        assert!(pf.strafe_move());
        assert_eq!(pf.total_tu_cost(), 5);
        assert!(pf.calculate(&map, &u, Position::new(4, 2, 0), MoveMode::Strafe));
        assert!(!pf.strafe_move());
        assert_eq!(pf.move_mode(), MoveMode::Normal);
        assert_eq!(pf.total_tu_cost(), 8);
    }

    #[test]
    fn missiles_ignore_their_target() {
        let mut map = open(5, 1);
        map.tile_mut(Position::new(4, 0, 0)).unwrap().occupant =
            Some(Occupant::new(UnitId(9), battlescape_core::Faction::Hostile));
        let mut pf = Pathfinding::new(map.size());
        let req = PathRequest::new(Position::new(4, 0, 0)).with_missile_target(UnitId(9));
        assert!(pf.calculate_with(&map, &soldier(0, 0), &req));
        assert_eq!(pf.path_len(), 4);
    }

    #[test]
    fn request_budget_is_honoured() {
        let map = open(8, 1);
        let mut pf = Pathfinding::new(map.size());
        let req = PathRequest::new(Position::new(7, 0, 0)).with_max_tu_cost(20);
        assert!(!pf.calculate_with(&map, &soldier(0, 0), &req));
        let req = req.with_max_tu_cost(28);
        assert!(pf.calculate_with(&map, &soldier(0, 0), &req));
    }

    #[test]
    fn graph_follows_the_map_size() {
        let mut pf = Pathfinding::new(MapSize::new(2, 2, 1));
        let map = open(6, 3);
        assert!(pf.calculate(&map, &soldier(0, 0), Position::new(5, 2, 0), MoveMode::Normal));
        assert_eq!(pf.nodes().len(), 18);
    }

    #[test]
    fn rejects_bad_config() {
        let cfg = PathfindingConfig {
            vertical_move_cost: 0,
            ..Default::default()
        };
        assert!(Pathfinding::with_config(MapSize::new(2, 2, 1), cfg).is_err());
    }

    #[test]
    fn sneaky_ai_avoids_watched_tiles() {
        let mut map = TileGrid::from_layout(&[".....\n....."]).unwrap();
        for x in 1..=3 {
            map.tile_mut(Position::new(x, 0, 0)).unwrap().visible_to_player = true;
        }
        let alien = soldier(0, 0).with_faction(Faction::Hostile);
        let target = Position::new(4, 0, 0);

        let mut bold = Pathfinding::new(map.size());
        assert!(bold.calculate(&map, &alien, target, MoveMode::Normal));
        assert_eq!(bold.total_tu_cost(), 16);

        let cfg = PathfindingConfig {
            sneaky_ai: true,
            ..Default::default()
        };
        let mut sneaky = Pathfinding::with_config(map.size(), cfg).unwrap();
        assert!(sneaky.calculate(&map, &alien, target, MoveMode::Normal));
        assert_eq!(sneaky.total_tu_cost(), 20);
        assert_eq!(sneaky.peek_direction(), Some(Direction::SouthEast));

        // Player units are not affected by the switch.
        let player = soldier(0, 0);
        assert!(sneaky.calculate(&map, &player, target, MoveMode::Normal));
        assert_eq!(sneaky.total_tu_cost(), 16);
    }

    #[test]
    fn large_unit_detours_round_a_pillar() {
        let map = TileGrid::from_layout(&["......\n..#...\n......\n......"]).unwrap();
        let pillar = Position::new(2, 1, 0);
        let mut u = soldier(0, 0).with_size(2);
        let target = Position::new(4, 0, 0);
        let mut pf = Pathfinding::new(map.size());
        assert!(pf.calculate(&map, &u, target, MoveMode::Normal));
        assert!(pf.path_len() > 4);

        let planned = pf.total_tu_cost();
        let mut spent = 0;
        while let Some(dir) = pf.dequeue_path() {
            let step = pf.tu_cost(&map, &u, u.position, dir, MoveMode::Normal);
            assert!(step.is_valid());
            spent += step.cost.time;
            u.position = step.pos;
            assert!(!u.covers(pillar));
        }
        assert_eq!(u.position, target);
        assert_eq!(spent, planned);
    }

    #[test]
    fn probes_take_the_unit_explicitly() {
        let map = TileGrid::from_layout(&["./.\n...\n..."]).unwrap();
        let pf = Pathfinding::new(map.size());
        let u = soldier(0, 0);
        assert!(pf.is_blocked_direction(&map, &u, Position::ZERO, Direction::SouthEast));
        assert!(!pf.is_blocked_direction(&map, &u, Position::ZERO, Direction::South));
        assert!(pf.is_blocked_direction(&map, &u, Position::new(9, 9, 0), Direction::South));
        assert!(!pf.validate_up_down(&map, &u, Position::ZERO, Direction::Up, false));
        assert_eq!(pf.tu_cost(&map, &u, Position::ZERO, Direction::South, MoveMode::Normal).cost.time, 4);
        assert!(!pf.tu_cost(&map, &u, Position::ZERO, Direction::East, MoveMode::Normal).is_valid());
    }

    #[test]
    fn astar_never_loses_to_the_straight_line() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut compared = 0;
        for _ in 0..40 {
            let map = mapgen::scatter(&mut rng, MapSize::new(14, 14, 1), 0.25);
            let from = Position::new(rng.random_range(0..14), rng.random_range(0..14), 0);
            let to = Position::new(rng.random_range(0..14), rng.random_range(0..14), 0);
            if from == to {
                continue;
            }
            let u = BattleUnit::new(UnitId(1), from);
            let cfg = PathfindingConfig::default();
            let oracle = LegalityOracle::new(&map, &u, &cfg);
            let mut line = Pathfinding::new(map.size());
            let mut astar = Pathfinding::new(map.size());
            let straight = line.bresenham_path(&oracle, from, to, false, DEFAULT_MAX_TU_COST);
            let searched = astar.astar_path(&oracle, from, to, false, DEFAULT_MAX_TU_COST);
            if straight {
                assert!(searched, "{from} -> {to}");
                assert!(astar.total_tu_cost() <= line.total_tu_cost(), "{from} -> {to}");
                compared += 1;
            }
        }
        assert!(compared > 0);
    }

    #[test]
    fn paths_replay_legally() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let map = mapgen::scatter(&mut rng, MapSize::new(10, 10, 1), 0.2);
            let from = Position::new(rng.random_range(0..10), rng.random_range(0..10), 0);
            let to = Position::new(rng.random_range(0..10), rng.random_range(0..10), 0);
            let mut u = BattleUnit::new(UnitId(1), from);
            let mut pf = Pathfinding::new(map.size());
            if !pf.calculate(&map, &u, to, MoveMode::Normal) {
                continue;
            }
            let planned = pf.total_tu_cost();
            let mut spent = 0;
            while let Some(dir) = pf.start_direction(&map, &u) {
                let step = pf.tu_cost(&map, &u, u.position, dir, MoveMode::Normal);
                assert!(step.is_valid());
                spent += step.cost.time;
                u.position = step.pos;
                pf.dequeue_path();
            }
            assert_eq!(pf.path_len(), 0);
            assert_eq!(u.position, to);
            assert_eq!(spent, planned);
        }
    }
}
