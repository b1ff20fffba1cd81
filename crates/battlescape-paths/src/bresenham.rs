use battlescape_core::{BattleMap, Direction, Position, vector_to_direction};

use crate::config::PathfindingConfig;
use crate::cost::PathfindingCost;
use crate::oracle::LegalityOracle;
use crate::pathfinding::Pathfinding;

impl Pathfinding {
    /// Try to walk a straight 3D line from `start` to `target`.
    ///
    /// The line is given up as soon as a step is illegal, lands somewhere
    /// other than the line point (stairs, drops), carries a penalty, is
    /// watched while sneaking, costs out of step with the previous one, or
    /// pushes the total past `max_tu_cost`. The stored path is only replaced
    /// on success.
    pub(crate) fn bresenham_path<M: BattleMap + ?Sized>(
        &mut self,
        oracle: &LegalityOracle<'_, M>,
        start: Position,
        target: Position,
        sneak: bool,
        max_tu_cost: i32,
    ) -> bool {
        let (mut x0, mut y0, mut z0) = (start.x, start.y, start.z);
        let (mut x1, mut y1, mut z1) = (target.x, target.y, target.z);

        let swap_xy = (y1 - y0).abs() > (x1 - x0).abs();
        if swap_xy {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        let swap_xz = (z1 - z0).abs() > (x1 - x0).abs();
        if swap_xz {
            std::mem::swap(&mut x0, &mut z0);
            std::mem::swap(&mut x1, &mut z1);
        }

        let delta_x = (x1 - x0).abs();
        let delta_y = (y1 - y0).abs();
        let delta_z = (z1 - z0).abs();
        let mut drift_xy = delta_x / 2;
        let mut drift_xz = delta_x / 2;
        let step_x = if x0 > x1 { -1 } else { 1 };
        let step_y = if y0 > y1 { -1 } else { 1 };
        let step_z = if z0 > z1 { -1 } else { 1 };

        let diagonal_percent = self.config.diagonal_cost_percent;
        let mut steps = Vec::with_capacity(delta_x as usize);
        let mut total = PathfindingCost::ZERO;
        let mut last_time: Option<i32> = None;
        let mut last = start;
        let (mut y, mut z) = (y0, z0);
        let mut x = x0;
        loop {
            let (mut cx, mut cy, mut cz) = (x, y, z);
            if swap_xz {
                std::mem::swap(&mut cx, &mut cz);
            }
            if swap_xy {
                std::mem::swap(&mut cx, &mut cy);
            }
            let point = Position::new(cx, cy, cz);

            if x != x0 {
                let delta = point - last;
                let dir = match vector_to_direction(delta) {
                    Some(d) => d,
                    None if delta.z > 0 => Direction::Up,
                    None => Direction::Down,
                };
                let step = oracle.tu_cost(last, dir);
                if !step.is_valid() || step.pos != point || step.penalty != PathfindingCost::ZERO {
                    return false;
                }
                if sneak && oracle.map().is_watched(point, oracle.unit().faction) {
                    return false;
                }
                let time = step.cost.time;
                if let Some(prev) = last_time {
                    let diagonal = dir.is_diagonal();
                    let uniform = time == prev
                        || (diagonal && time == PathfindingConfig::percent(prev, diagonal_percent))
                        || (!diagonal && PathfindingConfig::percent(time, diagonal_percent) == prev);
                    if !uniform {
                        return false;
                    }
                }
                total += step.cost;
                if total.time > max_tu_cost {
                    return false;
                }
                steps.push(dir);
                last_time = Some(time);
                last = point;
            }

            if x == x1 {
                break;
            }
            drift_xy -= delta_y;
            drift_xz -= delta_z;
            if drift_xy < 0 {
                y += step_y;
                drift_xy += delta_x;
            }
            if drift_xz < 0 {
                z += step_z;
                drift_xz += delta_x;
            }
            x += step_x;
        }

        steps.reverse();
        self.path = steps;
        self.total = total;
        true
    }
}
