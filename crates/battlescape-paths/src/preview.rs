//! Path preview: TU and energy annotations on the tiles along a path.

use battlescape_core::{BattleMap, MarkerColor, Position, PreviewMark, PreviewSink};

use crate::oracle::{LegalityOracle, MoveMode};
use crate::pathfinding::Pathfinding;

impl Pathfinding {
    /// Show (`remove == false`) or hide the preview of the current path.
    ///
    /// Showing needs a path. Hiding always wipes every mark this planner
    /// left on the map, whatever became of the path since; it returns
    /// `false` only when nothing was shown.
    pub fn preview_path<S: BattleMap + PreviewSink + ?Sized>(&mut self, map: &mut S, remove: bool) -> bool {
        if remove {
            let shown = self.previewed || !self.previewed_tiles.is_empty();
            self.previewed = false;
            self.refresh_path(map);
            return shown;
        }
        if self.path.is_empty() {
            return false;
        }
        self.previewed = true;
        self.refresh_path(map);
        true
    }

    /// Hide the preview. Returns `false` if none was shown.
    pub fn remove_preview<S: BattleMap + PreviewSink + ?Sized>(&mut self, map: &mut S) -> bool {
        self.preview_path(map, true)
    }

    /// Redraw the preview, e.g. after a door opened or the unit's TUs
    /// changed. Tiles marked by the previous refresh are cleared first; when
    /// the preview is hidden nothing is redrawn.
    pub fn refresh_path<S: BattleMap + PreviewSink + ?Sized>(&mut self, map: &mut S) {
        for pos in self.previewed_tiles.drain(..) {
            map.set_preview(pos, None);
        }
        if !self.previewed {
            return;
        }
        let marks = self.preview_marks(&*map);
        for &(pos, mark) in &marks {
            map.set_preview(pos, Some(mark));
        }
        self.previewed_tiles
            .extend(marks.into_iter().map(|(pos, _)| pos));
    }

    /// Price the path step by step from the planned unit's budget.
    fn preview_marks<M: BattleMap + ?Sized>(&self, map: &M) -> Vec<(Position, PreviewMark)> {
        let Some(unit) = self.unit.as_ref() else {
            return Vec::new();
        };
        let cfg = &self.config;
        let size = unit.size.max(1);
        let running = self.ctrl && size == 1 && self.path.len() > 1;
        let mode = if running { MoveMode::Run } else { self.mode };
        let oracle = LegalityOracle::new(map, unit, cfg)
            .with_mode(mode)
            .with_missile_target(self.missile_target);

        let mut time_left = unit.time_units;
        let mut energy_left = unit.energy;
        if unit.kneeling {
            time_left -= cfg.kneel_stand_up_cost;
        }
        let label_corner = Position::new(size - 1, size - 1, 0);

        let steps: Vec<_> = self.path().collect();
        let mut marks = Vec::with_capacity(steps.len() * (size * size) as usize);
        let mut pos = unit.position;
        for (i, &dir) in steps.iter().enumerate() {
            let step = oracle.tu_cost(pos, dir);
            if !step.is_valid() {
                log::debug!("preview stops at {pos}: step {dir} is no longer legal");
                break;
            }
            time_left -= step.cost.time;
            energy_left -= step.cost.energy;
            pos = step.pos;

            let color = if time_left < 0 || energy_left < 0 {
                MarkerColor::Red
            } else if time_left < unit.reserved_time_units {
                MarkerColor::Yellow
            } else {
                MarkerColor::Green
            };
            let value = if self.alt { energy_left } else { time_left };
            let next = steps.get(i + 1).copied();
            for off in unit.footprint() {
                marks.push((
                    pos + off,
                    PreviewMark {
                        direction: next,
                        value: (off == label_corner).then_some(value),
                        color,
                    },
                ));
            }
        }
        marks
    }
}
