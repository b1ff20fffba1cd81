use battlescape_core::{BattleMap, Direction, Position};

use crate::config::PathfindingConfig;
use crate::distance::octile;
use crate::node::NodeState;
use crate::oracle::{LegalityOracle, MoveMode};
use crate::pathfinding::Pathfinding;

impl Pathfinding {
    /// Compute the cheapest path from `start` to `target` using A*.
    ///
    /// Nodes are ranked by search cost (charged TUs plus penalties, with
    /// watched tiles weighted up when sneaking) plus an octile estimate.
    /// Routes whose charged TUs would exceed `max_tu_cost` are dropped.
    /// The stored path is only replaced on success.
    pub(crate) fn astar_path<M: BattleMap + ?Sized>(
        &mut self,
        oracle: &LegalityOracle<'_, M>,
        start: Position,
        target: Position,
        sneak: bool,
        max_tu_cost: i32,
    ) -> bool {
        let size = self.nodes.size();
        let (Some(start_idx), Some(target_idx)) = (size.index(start), size.index(target)) else {
            return false;
        };

        let cfg = &self.config;
        let straight = if oracle.mode() == MoveMode::Run {
            PathfindingConfig::percent(cfg.heuristic_step_cost, cfg.run_time_percent).max(1)
        } else {
            cfg.heuristic_step_cost
        };
        let diagonal_percent = cfg.diagonal_cost_percent;
        let sneak_percent = cfg.sneak_visible_percent;
        let estimate = |p: Position| octile(p, target, straight, diagonal_percent);
        let faction = oracle.unit().faction;

        self.nodes.reset();
        self.nodes.open_start(start_idx, estimate(start));

        while let Some(ci) = self.nodes.pop() {
            let Some(current) = self.nodes.get(ci) else {
                continue;
            };
            let (current_cost, current_search) = (current.cost, current.search);

            if ci == target_idx {
                self.path = self.nodes.trace_back(ci);
                self.total = current_cost;
                return true;
            }

            let current_pos = size.position(ci);
            for dir in Direction::ALL {
                let step = oracle.tu_cost(current_pos, dir);
                if !step.is_valid() {
                    continue;
                }
                let Some(ni) = size.index(step.pos) else {
                    continue;
                };
                if self.nodes.state(ni) == NodeState::Closed {
                    continue;
                }
                let cost = current_cost + step.cost;
                if cost.time > max_tu_cost {
                    continue;
                }
                let mut weight = step.search_time();
                if sneak && oracle.map().is_watched(step.pos, faction) {
                    weight = PathfindingConfig::percent(weight, sneak_percent);
                }
                let search = current_search + weight;
                self.nodes
                    .relax(ni, cost, search, ci, dir, search + estimate(step.pos));
            }
        }
        false
    }
}
