//! **battlescape-core**: shared types for turn-based tactical movement.
//!
//! This crate provides the value types and collaborator contracts used by
//! the rest of the workspace: 3D tile coordinates, the ten movement
//! directions, tile terrain data, the unit snapshot that planning reads, and
//! the [`BattleMap`] / [`PreviewSink`] traits a map store implements.

pub mod direction;
pub mod geom;
pub mod map;
pub mod tile;
pub mod unit;

pub use direction::{DIR_MAX, Direction, direction_to_vector, vector_to_direction};
pub use geom::{MapSize, Position};
pub use map::{BattleMap, MarkerColor, PreviewMark, PreviewSink};
pub use tile::{BigWall, DoorKind, INVALID_MOVE_COST, Occupant, PartData, Tile, TilePart};
pub use unit::{BattleActionCost, BattleUnit, Faction, MovementType, UnitId};
