use std::fmt;

/// Default TU cost of a step onto a tile whose floor declares no cost.
pub const DEFAULT_MOVE_COST: i32 = 4;
/// Most TUs a single step may cost; anything dearer is not a step.
pub const MAX_MOVE_COST: i32 = 100;
/// Search penalty for stepping into fire.
pub const FIRE_PREVIEW_MOVE_COST: i32 = 32;
/// Budget used when a request does not name one.
pub const DEFAULT_MAX_TU_COST: i32 = 1000;

/// Movement cost policy.
///
/// Every constant of the cost model lives here so that rulesets can tune
/// them. The defaults reproduce the classic rules.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathfindingConfig {
    /// Cost of a step onto a floorless tile or a zero-cost floor.
    pub default_move_cost: i32,
    /// Uncharged penalty steering searches around burning tiles.
    pub fire_preview_move_cost: i32,
    /// Diagonal steps cost this percentage of the orthogonal price.
    pub diagonal_cost_percent: i32,
    /// Extra TUs for climbing a level by stairs.
    pub stair_climb_cost: i32,
    /// TUs for a straight up or down move by flight or grav lift.
    pub vertical_move_cost: i32,
    /// Highest terrain step (in 1/24ths of a level) a unit can climb.
    pub max_step_height: i32,
    /// Highest terrain difference allowed between parts of a large unit.
    pub large_unit_step_height: i32,
    /// Extra TUs for a sideways strafe step.
    pub strafe_cost: i32,
    /// Energy spent per horizontal step, as a percentage of its TUs.
    pub energy_percent: i32,
    /// Running TU cost, as a percentage of walking.
    pub run_time_percent: i32,
    /// Running energy cost, as a percentage of walking.
    pub run_energy_percent: i32,
    /// Sneaking searches weigh steps onto watched tiles by this percentage.
    pub sneak_visible_percent: i32,
    /// TUs a kneeling unit pays to stand up before moving.
    pub kneel_stand_up_cost: i32,
    /// Orthogonal step cost the A* heuristic assumes. Must not exceed the
    /// cheapest real step, or searches stop being optimal.
    pub heuristic_step_cost: i32,
    /// Let hostile AI units sneak by default.
    pub sneaky_ai: bool,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            default_move_cost: DEFAULT_MOVE_COST,
            fire_preview_move_cost: FIRE_PREVIEW_MOVE_COST,
            diagonal_cost_percent: 150,
            stair_climb_cost: 1,
            vertical_move_cost: 8,
            max_step_height: 8,
            large_unit_step_height: 10,
            strafe_cost: 1,
            energy_percent: 50,
            run_time_percent: 75,
            run_energy_percent: 150,
            sneak_visible_percent: 200,
            kneel_stand_up_cost: 8,
            heuristic_step_cost: DEFAULT_MOVE_COST,
            sneaky_ai: false,
        }
    }
}

impl PathfindingConfig {
    /// Check the policy for values the planners cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("default_move_cost", self.default_move_cost),
            ("vertical_move_cost", self.vertical_move_cost),
            ("heuristic_step_cost", self.heuristic_step_cost),
            ("run_time_percent", self.run_time_percent),
        ];
        for (field, value) in positive {
            if value <= 0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        let non_negative = [
            ("fire_preview_move_cost", self.fire_preview_move_cost),
            ("stair_climb_cost", self.stair_climb_cost),
            ("max_step_height", self.max_step_height),
            ("large_unit_step_height", self.large_unit_step_height),
            ("strafe_cost", self.strafe_cost),
            ("energy_percent", self.energy_percent),
            ("run_energy_percent", self.run_energy_percent),
            ("kneel_stand_up_cost", self.kneel_stand_up_cost),
        ];
        for (field, value) in non_negative {
            if value < 0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.diagonal_cost_percent < 100 {
            return Err(ConfigError::DiagonalTooCheap(self.diagonal_cost_percent));
        }
        if self.sneak_visible_percent < 100 {
            return Err(ConfigError::SneakDiscount(self.sneak_visible_percent));
        }
        if self.heuristic_step_cost > self.default_move_cost {
            return Err(ConfigError::InadmissibleHeuristic {
                heuristic: self.heuristic_step_cost,
                default_move_cost: self.default_move_cost,
            });
        }
        Ok(())
    }

    /// Scale a cost by a percentage, rounding down.
    #[inline]
    pub(crate) fn percent(value: i32, percent: i32) -> i32 {
        value * percent / 100
    }
}

/// Errors reported by [`PathfindingConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A cost that must be strictly positive is not.
    NotPositive { field: &'static str, value: i32 },
    /// A cost or percentage that must not be negative is.
    Negative { field: &'static str, value: i32 },
    /// Diagonal steps would be cheaper than orthogonal ones.
    DiagonalTooCheap(i32),
    /// Sneaking would make watched tiles cheaper.
    SneakDiscount(i32),
    /// The heuristic would overestimate a default-cost step.
    InadmissibleHeuristic {
        heuristic: i32,
        default_move_cost: i32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "pathfinding config: {field} must be positive, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "pathfinding config: {field} must not be negative, got {value}")
            }
            Self::DiagonalTooCheap(p) => {
                write!(f, "pathfinding config: diagonal_cost_percent must be at least 100, got {p}")
            }
            Self::SneakDiscount(p) => {
                write!(f, "pathfinding config: sneak_visible_percent must be at least 100, got {p}")
            }
            Self::InadmissibleHeuristic {
                heuristic,
                default_move_cost,
            } => write!(
                f,
                "pathfinding config: heuristic_step_cost {heuristic} exceeds default_move_cost {default_move_cost}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: PathfindingConfig =
            serde_json::from_str(r#"{ "default_move_cost": 6, "sneaky_ai": true }"#).unwrap();
        assert_eq!(cfg.default_move_cost, 6);
        assert!(cfg.sneaky_ai);
        assert_eq!(cfg.fire_preview_move_cost, FIRE_PREVIEW_MOVE_COST);
    }

    #[test]
    fn config_round_trip() {
        let cfg = PathfindingConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PathfindingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
