//! The slice of a battle unit that movement planning reads.

use std::fmt;

use crate::direction::Direction;
use crate::geom::Position;

/// Stable identifier of a unit within one battle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side a unit fights for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Faction {
    /// Human-controlled.
    #[default]
    Player,
    /// AI-controlled enemies of the player.
    Hostile,
    /// AI-controlled bystanders.
    Neutral,
}

impl Faction {
    /// Whether the side is driven by the AI.
    #[inline]
    pub fn is_ai(self) -> bool {
        self != Faction::Player
    }
}

/// How a unit gets around.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementType {
    /// Needs floor under its feet and stairs to change level.
    #[default]
    Walk,
    /// Ignores floor support and may move straight up and down.
    Fly,
    /// Flies on underwater maps, walks everywhere else.
    Swim,
    /// Cannot move at all.
    None,
}

/// A snapshot of a unit, as far as movement is concerned.
///
/// `position` is the north-west tile of the unit's footprint; a unit of
/// `size` 2 covers `position` to `position + (1, 1, 0)`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleUnit {
    pub id: UnitId,
    pub position: Position,
    /// Facing, used for strafing. Always a compass direction.
    pub direction: Direction,
    /// Footprint edge length in tiles.
    pub size: i32,
    pub movement: MovementType,
    pub faction: Faction,
    pub time_units: i32,
    pub energy: i32,
    /// Time units the player wants to keep for a reaction or shot.
    pub reserved_time_units: i32,
    pub kneeling: bool,
    /// Units that do not care about walking through fire.
    pub fire_immune: bool,
}

impl BattleUnit {
    /// A 1×1 walking player unit with a full default turn.
    pub fn new(id: UnitId, position: Position) -> Self {
        Self {
            id,
            position,
            direction: Direction::North,
            size: 1,
            movement: MovementType::Walk,
            faction: Faction::Player,
            time_units: 60,
            energy: 90,
            reserved_time_units: 0,
            kneeling: false,
            fire_immune: false,
        }
    }

    /// Set the footprint size.
    pub fn with_size(mut self, size: i32) -> Self {
        self.size = size.max(1);
        self
    }

    /// Set the movement type.
    pub fn with_movement(mut self, movement: MovementType) -> Self {
        self.movement = movement;
        self
    }

    /// Set the faction.
    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }

    /// Set the facing.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set remaining time units and energy.
    pub fn with_budget(mut self, time_units: i32, energy: i32) -> Self {
        self.time_units = time_units;
        self.energy = energy;
        self
    }

    /// Footprint offsets relative to `position`, row by row.
    pub fn footprint(&self) -> impl Iterator<Item = Position> + '_ {
        let size = self.size.max(1);
        (0..size).flat_map(move |y| (0..size).map(move |x| Position::new(x, y, 0)))
    }

    /// Whether any footprint tile of this unit sits on `pos`.
    pub fn covers(&self, pos: Position) -> bool {
        let d = pos - self.position;
        d.z == 0 && d.x >= 0 && d.y >= 0 && d.x < self.size && d.y < self.size
    }
}

/// What an action will cost on top of the movement leading up to it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleActionCost {
    pub time: i32,
    pub energy: i32,
}

impl BattleActionCost {
    pub const fn new(time: i32, energy: i32) -> Self {
        Self { time, energy }
    }
}
