use std::cmp::Ordering;
use std::collections::BinaryHeap;

use battlescape_core::{Direction, MapSize, Position};

use crate::cost::PathfindingCost;

/// Search state of one tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeState {
    /// Not reached by the current search.
    #[default]
    Unvisited,
    /// Reached, cheapest cost not settled yet.
    Open,
    /// Cheapest cost settled.
    Closed,
}

/// Per-tile search record.
#[derive(Debug, Clone, Default)]
pub struct PathfindingNode {
    pub(crate) state: NodeState,
    /// What the unit pays to get here along the best known route.
    pub(crate) cost: PathfindingCost,
    /// What the search ranks the route by: cost plus penalties.
    pub(crate) search: i32,
    pub(crate) prev: Option<usize>,
    pub(crate) prev_dir: Option<Direction>,
    pub(crate) generation: u32,
}

impl PathfindingNode {
    #[inline]
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Charged cost of the best known route to this tile.
    #[inline]
    pub fn cost(&self) -> PathfindingCost {
        self.cost
    }

    /// Tile index this node was reached from.
    #[inline]
    pub fn prev(&self) -> Option<usize> {
        self.prev
    }

    /// Direction of the step that reached this node.
    #[inline]
    pub fn prev_dir(&self) -> Option<Direction> {
        self.prev_dir
    }

    fn connect(&mut self, cost: PathfindingCost, search: i32, prev: usize, dir: Direction) {
        self.cost = cost;
        self.search = search;
        self.prev = Some(prev);
        self.prev_dir = Some(dir);
        self.state = NodeState::Open;
    }
}

/// Reference into the node array, ordered for use in `BinaryHeap`.
///
/// Smallest priority pops first; equal priorities pop in insertion order,
/// so neighbours pushed in direction-table order win ties.
#[derive(Clone, Copy, Eq, PartialEq)]
pub(crate) struct OpenEntry {
    pub(crate) idx: usize,
    pub(crate) priority: i32,
    pub(crate) seq: u64,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest first.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One search node per map tile, reused across searches.
///
/// Resetting bumps a generation counter instead of touching every node;
/// a node whose tag is behind the counter reads as unvisited.
pub struct NodeGraph {
    size: MapSize,
    nodes: Vec<PathfindingNode>,
    generation: u32,
    open: BinaryHeap<OpenEntry>,
    seq: u64,
}

impl NodeGraph {
    /// Allocate one node per tile of a map of `size`.
    pub fn new(size: MapSize) -> Self {
        Self {
            size,
            nodes: vec![PathfindingNode::default(); size.len()],
            generation: 0,
            open: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Map size the graph is laid out for.
    #[inline]
    pub fn size(&self) -> MapSize {
        self.size
    }

    /// Number of nodes, always the tile count of [`size`](Self::size).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Re-layout for a different map. Storage is only reallocated when the
    /// size actually changes.
    pub(crate) fn fit(&mut self, size: MapSize) {
        if size == self.size {
            return;
        }
        log::debug!("node graph resized from {} to {}", self.size, size);
        self.size = size;
        self.nodes.clear();
        self.nodes.resize(size.len(), PathfindingNode::default());
        self.generation = 0;
    }

    /// Invalidate every node and empty the open set.
    pub(crate) fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Tags wrapped around; stale nodes could alias the new generation.
            for n in self.nodes.iter_mut() {
                *n = PathfindingNode::default();
            }
            self.generation = 1;
        }
        self.open.clear();
        self.seq = 0;
    }

    /// The node of a tile if the current search reached it.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&PathfindingNode> {
        self.nodes
            .get(idx)
            .filter(|n| n.generation == self.generation)
    }

    /// The node of a position if the current search reached it.
    #[inline]
    pub fn at(&self, pos: Position) -> Option<&PathfindingNode> {
        self.size.index(pos).and_then(|i| self.get(i))
    }

    /// State of a tile in the current search.
    #[inline]
    pub fn state(&self, idx: usize) -> NodeState {
        self.get(idx).map_or(NodeState::Unvisited, |n| n.state)
    }

    /// Mutable node for the current search, wiping it first if stale.
    fn touch(&mut self, idx: usize) -> &mut PathfindingNode {
        let cur_gen = self.generation;
        let n = &mut self.nodes[idx];
        if n.generation != cur_gen {
            *n = PathfindingNode {
                generation: cur_gen,
                ..PathfindingNode::default()
            };
        }
        n
    }

    /// Seed the search at `idx` with zero cost.
    pub(crate) fn open_start(&mut self, idx: usize, priority: i32) {
        let n = self.touch(idx);
        n.state = NodeState::Open;
        n.cost = PathfindingCost::ZERO;
        n.search = 0;
        n.prev = None;
        n.prev_dir = None;
        self.push(idx, priority);
    }

    /// Offer a route to `idx`. Returns `true` if it improved the node, in
    /// which case the node is (re)queued with `priority`.
    pub(crate) fn relax(
        &mut self,
        idx: usize,
        cost: PathfindingCost,
        search: i32,
        prev: usize,
        dir: Direction,
        priority: i32,
    ) -> bool {
        let n = self.touch(idx);
        match n.state {
            NodeState::Closed => return false,
            NodeState::Open if n.search <= search => return false,
            _ => {}
        }
        n.connect(cost, search, prev, dir);
        self.push(idx, priority);
        true
    }

    fn push(&mut self, idx: usize, priority: i32) {
        self.seq += 1;
        self.open.push(OpenEntry {
            idx,
            priority,
            seq: self.seq,
        });
    }

    /// Pop the cheapest open node and close it. Stale heap entries left by
    /// earlier improvements are skipped.
    pub(crate) fn pop(&mut self) -> Option<usize> {
        while let Some(entry) = self.open.pop() {
            let cur_gen = self.generation;
            let n = &mut self.nodes[entry.idx];
            if n.generation != cur_gen || n.state != NodeState::Open {
                continue;
            }
            n.state = NodeState::Closed;
            return Some(entry.idx);
        }
        None
    }

    /// Directions from the search start to `target`, last step first.
    pub(crate) fn trace_back(&self, target: usize) -> Vec<Direction> {
        let mut dirs = Vec::new();
        let mut ci = target;
        while let Some(n) = self.get(ci) {
            match (n.prev, n.prev_dir) {
                (Some(prev), Some(dir)) => {
                    dirs.push(dir);
                    ci = prev;
                }
                _ => break,
            }
        }
        dirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_matches_tile_count() {
        let g = NodeGraph::new(MapSize::new(5, 4, 3));
        assert_eq!(g.len(), 60);
    }

    #[test]
    fn reset_invalidates_without_clearing() {
        let mut g = NodeGraph::new(MapSize::new(3, 3, 1));
        g.reset();
        g.open_start(4, 0);
        assert_eq!(g.state(4), NodeState::Open);
        g.reset();
        assert_eq!(g.state(4), NodeState::Unvisited);
        assert!(g.get(4).is_none());
        assert_eq!(g.len(), 9);
    }

    #[test]
    fn fit_same_size_keeps_storage() {
        let mut g = NodeGraph::new(MapSize::new(3, 3, 1));
        g.reset();
        g.open_start(0, 0);
        g.fit(MapSize::new(3, 3, 1));
        assert_eq!(g.state(0), NodeState::Open);
        g.fit(MapSize::new(4, 4, 2));
        assert_eq!(g.len(), 32);
        assert_eq!(g.state(0), NodeState::Unvisited);
    }

    #[test]
    fn pop_orders_by_priority_then_insertion() {
        let mut g = NodeGraph::new(MapSize::new(4, 1, 1));
        g.reset();
        g.open_start(0, 10);
        assert_eq!(g.pop(), Some(0));
        g.relax(1, PathfindingCost::new(5, 0), 5, 0, Direction::East, 7);
        g.relax(2, PathfindingCost::new(5, 0), 5, 0, Direction::East, 7);
        g.relax(3, PathfindingCost::new(1, 0), 1, 0, Direction::East, 3);
        assert_eq!(g.pop(), Some(3));
        assert_eq!(g.pop(), Some(1));
        assert_eq!(g.pop(), Some(2));
        assert_eq!(g.pop(), None);
    }

    #[test]
    fn relax_only_improves() {
        let mut g = NodeGraph::new(MapSize::new(3, 1, 1));
        g.reset();
        g.open_start(0, 0);
        assert!(g.relax(1, PathfindingCost::new(8, 0), 8, 0, Direction::East, 8));
        assert!(!g.relax(1, PathfindingCost::new(9, 0), 9, 2, Direction::West, 9));
        assert!(g.relax(1, PathfindingCost::new(4, 0), 4, 2, Direction::West, 4));
        assert_eq!(g.get(1).and_then(|n| n.prev()), Some(2));
        // The stale entry for the first offer is skipped.
        assert_eq!(g.pop(), Some(0));
        assert_eq!(g.pop(), Some(1));
        assert_eq!(g.pop(), None);
        assert!(!g.relax(1, PathfindingCost::new(1, 0), 1, 0, Direction::East, 1));
    }

    #[test]
    fn trace_back_lists_last_step_first() {
        let mut g = NodeGraph::new(MapSize::new(3, 1, 1));
        g.reset();
        g.open_start(0, 0);
        g.relax(1, PathfindingCost::new(4, 0), 4, 0, Direction::East, 4);
        g.relax(2, PathfindingCost::new(8, 0), 8, 1, Direction::NorthEast, 8);
        assert_eq!(g.trace_back(2), vec![Direction::NorthEast, Direction::East]);
        assert!(g.trace_back(0).is_empty());
    }
}
