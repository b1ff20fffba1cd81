use std::ops::{Add, AddAssign};

use battlescape_core::{INVALID_MOVE_COST, Position};

/// Time units and energy, the two currencies movement is paid in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathfindingCost {
    pub time: i32,
    pub energy: i32,
}

impl PathfindingCost {
    pub const ZERO: Self = Self { time: 0, energy: 0 };

    /// Cost marking an illegal step.
    pub const INVALID: Self = Self {
        time: INVALID_MOVE_COST,
        energy: INVALID_MOVE_COST,
    };

    #[inline]
    pub const fn new(time: i32, energy: i32) -> Self {
        Self { time, energy }
    }

    /// Whether the cost fits both budgets.
    #[inline]
    pub fn fits(self, time_budget: i32, energy_budget: i32) -> bool {
        self.time <= time_budget && self.energy <= energy_budget
    }
}

impl Add for PathfindingCost {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.time + rhs.time, self.energy + rhs.energy)
    }
}

impl AddAssign for PathfindingCost {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// The outcome of pricing one step.
///
/// `cost` is what the unit pays. `penalty` only steers searches away from
/// hazards and is never charged. `pos` is where the unit ends up, which
/// differs from `start + direction` when stairs or a drop change the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathfindingStep {
    pub cost: PathfindingCost,
    pub penalty: PathfindingCost,
    pub pos: Position,
    /// The step is a drop through a floorless tile.
    pub fall: bool,
}

impl PathfindingStep {
    /// An illegal step towards `pos`.
    #[inline]
    pub fn invalid(pos: Position) -> Self {
        Self {
            cost: PathfindingCost::INVALID,
            penalty: PathfindingCost::ZERO,
            pos,
            fall: false,
        }
    }

    /// Whether the step can be taken at all.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.cost.time < INVALID_MOVE_COST
    }

    /// Cost the searches rank the step by.
    #[inline]
    pub fn search_time(&self) -> i32 {
        self.cost.time + self.penalty.time
    }
}
