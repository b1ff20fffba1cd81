//! Movement planning for a turn-based tactical battlescape.
//!
//! This crate computes legal, cost-accurate paths for units moving over a
//! 3D tile map with the ten-direction movement model (eight compass steps
//! plus up and down):
//!
//! - **Legality & cost** of single steps ([`LegalityOracle`]): walls, wall
//!   corners, doors, stairs, falls, grav lifts, flight, large units.
//! - **Planning** ([`Pathfinding::calculate`]): a straight line when the
//!   terrain allows it, A\* otherwise.
//! - **Reachability** ([`Pathfinding::find_reachable`]): every tile a unit
//!   can afford to walk to.
//! - **Path queue & preview**: consuming the planned steps and annotating
//!   the map with what each step leaves in the unit's budget.
//!
//! All searches run through [`Pathfinding`], which owns and reuses its node
//! graph so that repeated queries do not reallocate.
//!
//! # Collaborators
//!
//! | Trait | Used for |
//! |---|---|
//! | [`BattleMap`](battlescape_core::BattleMap) | reading tiles, visibility, underwater flag |
//! | [`PreviewSink`](battlescape_core::PreviewSink) | writing preview annotations |

mod astar;
mod bresenham;
mod config;
mod cost;
mod distance;
mod node;
mod oracle;
mod pathfinding;
mod preview;
mod reachable;

pub use config::{
    ConfigError, DEFAULT_MAX_TU_COST, DEFAULT_MOVE_COST, FIRE_PREVIEW_MOVE_COST, MAX_MOVE_COST,
    PathfindingConfig,
};
pub use cost::{PathfindingCost, PathfindingStep};
pub use distance::octile;
pub use node::{NodeGraph, NodeState, PathfindingNode};
pub use oracle::{BlockPart, LegalityOracle, MoveMode, is_on_stairs};
pub use pathfinding::{PathRequest, Pathfinding};
