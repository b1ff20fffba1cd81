use std::rc::Rc;

use battlescape_core::{BattleActionCost, BattleMap, BattleUnit, Direction, MovementType};

use crate::node::NodeState;
use crate::oracle::LegalityOracle;
use crate::pathfinding::Pathfinding;

impl Pathfinding {
    /// Flood-fill every tile `unit` can walk to and still afford `action`.
    ///
    /// The budget is the unit's TUs and energy minus the action's. Returns
    /// the tile indices of every reachable tile the unit can stand on,
    /// cheapest first (ties by index). A budget below zero reaches nothing;
    /// a zero budget reaches only the unit's own tile. Costs stay queryable
    /// through [`node`](Self::node) until the next search.
    pub fn find_reachable<M: BattleMap + ?Sized>(
        &mut self,
        map: &M,
        unit: &BattleUnit,
        action: BattleActionCost,
    ) -> &[usize] {
        self.reachable.clear();
        self.nodes.fit(map.size());
        self.nodes.reset();

        let time_budget = unit.time_units - action.time;
        let energy_budget = unit.energy - action.energy;
        let size = self.nodes.size();
        let Some(start_idx) = size.index(unit.position) else {
            return &self.reachable;
        };
        if time_budget < 0 || energy_budget < 0 {
            return &self.reachable;
        }

        let config = Rc::clone(&self.config);
        let oracle = LegalityOracle::new(map, unit, &config);
        let flying = oracle.movement() == MovementType::Fly;
        self.nodes.open_start(start_idx, 0);

        while let Some(ci) = self.nodes.pop() {
            let Some(current) = self.nodes.get(ci) else {
                continue;
            };
            let current_cost = current.cost;
            let current_pos = size.position(ci);
            let standing = flying
                || ci == start_idx
                || map
                    .tile(current_pos)
                    .is_some_and(|t| !oracle.can_fall_down(t));
            if standing {
                self.reachable.push(ci);
            }

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
                if !cost.fits(time_budget, energy_budget) {
                    continue;
                }
                self.nodes.relax(ni, cost, cost.time, ci, dir, cost.time);
            }
        }

        let nodes = &self.nodes;
        self.reachable.sort_by_key(|&i| {
            let time = nodes.get(i).map_or(i32::MAX, |n| n.cost.time);
            (time, i)
        });
        log::trace!(
            "{} tiles reachable from {} within {} TUs",
            self.reachable.len(),
            unit.position,
            time_budget
        );
        &self.reachable
    }
}
