//! In-memory battlescapes: a tile grid, a text layout parser and a random
//! map generator.

pub mod grid;
pub mod layout;
pub mod mapgen;

pub use grid::TileGrid;
pub use layout::LayoutError;
pub use mapgen::{MapGen, Obstacle};
