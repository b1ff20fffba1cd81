//! Random battlescape generation.
//!
//! Produces cluttered single-storey battlefields: open floor with pillars,
//! walls, diagonal walls, doors and debris dropped on it at random. Enough
//! to exercise movement planning on maps no one drew by hand.

use battlescape_core::{BigWall, DoorKind, MapSize, PartData, Position, TilePart};
use rand::{Rng, RngExt};

use crate::grid::TileGrid;

/// Share of obstacle-free tiles turned into rough floor.
const ROUGH_FLOOR_PCT: f64 = 0.1;

/// Something dropped on a tile by [`MapGen::scatter_obstacles`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Obstacle {
    Pillar,
    WestWall,
    NorthWall,
    DiagonalNeSw,
    DiagonalNwSe,
    Door,
    Debris,
}

impl Obstacle {
    pub const ALL: [Obstacle; 7] = [
        Obstacle::Pillar,
        Obstacle::WestWall,
        Obstacle::NorthWall,
        Obstacle::DiagonalNeSw,
        Obstacle::DiagonalNwSe,
        Obstacle::Door,
        Obstacle::Debris,
    ];

    fn part(self) -> (TilePart, PartData) {
        match self {
            Obstacle::Pillar => (TilePart::Object, PartData::big_wall(BigWall::Block)),
            Obstacle::WestWall => (TilePart::WestWall, PartData::wall()),
            Obstacle::NorthWall => (TilePart::NorthWall, PartData::wall()),
            Obstacle::DiagonalNeSw => (TilePart::Object, PartData::big_wall(BigWall::NeSw)),
            Obstacle::DiagonalNwSe => (TilePart::Object, PartData::big_wall(BigWall::NwSe)),
            Obstacle::Door => (TilePart::WestWall, PartData::door(DoorKind::Swing)),
            Obstacle::Debris => (TilePart::Object, PartData::object(2)),
        }
    }
}

/// Map generator operating on a [`TileGrid`].
pub struct MapGen<R: Rng> {
    pub rng: R,
    pub grid: TileGrid,
}

impl<R: Rng> MapGen<R> {
    /// Create a new MapGen with the given grid.
    pub fn with_grid(grid: TileGrid, rng: R) -> Self {
        Self { rng, grid }
    }

    /// Drop a random obstacle on each ground-level tile with probability
    /// `density` (clamped to 0.0–1.0). Returns the number placed.
    pub fn scatter_obstacles(&mut self, density: f64) -> usize {
        let density = density.clamp(0.0, 1.0);
        let size = self.grid.size();
        let mut placed = 0;
        for y in 0..size.y {
            for x in 0..size.x {
                if !self.rng.random_bool(density) {
                    continue;
                }
                let obstacle = Obstacle::ALL[self.rng.random_range(0..Obstacle::ALL.len())];
                let (part, data) = obstacle.part();
                if self.grid.set_part(Position::new(x, y, 0), part, Some(data)) {
                    placed += 1;
                }
            }
        }
        placed
    }

    /// Turn ground-level floor tiles with no object into 6 TU rough floor
    /// with probability `pct`. Returns the number changed.
    pub fn roughen(&mut self, pct: f64) -> usize {
        let pct = pct.clamp(0.0, 1.0);
        let size = self.grid.size();
        let mut changed = 0;
        for y in 0..size.y {
            for x in 0..size.x {
                let pos = Position::new(x, y, 0);
                let bare = self.grid.at(pos).is_some_and(|t| {
                    t.part(TilePart::Floor).is_some() && t.part(TilePart::Object).is_none()
                });
                if bare && self.rng.random_bool(pct) {
                    self.grid.set_part(pos, TilePart::Floor, Some(PartData::floor(6)));
                    changed += 1;
                }
            }
        }
        changed
    }
}

/// A floored ground level of `size` with obstacles scattered at `density`
/// and some rough floor. Upper levels are open air.
pub fn scatter<R: Rng + ?Sized>(rng: &mut R, size: MapSize, density: f64) -> TileGrid {
    let mut mapgen = MapGen::with_grid(TileGrid::with_floor(size), rng);
    let placed = mapgen.scatter_obstacles(density);
    let rough = mapgen.roughen(ROUGH_FLOOR_PCT);
    log::debug!("scattered {placed} obstacles and {rough} rough tiles on a {size} map");
    mapgen.grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn zero_density_is_open_ground() {
        let mut rng = StdRng::seed_from_u64(1);
        let g = scatter(&mut rng, MapSize::new(10, 10, 2), 0.0);
        assert_eq!(g.count(|t| t.part(TilePart::Object).is_some()), 0);
        assert_eq!(g.count(|t| t.part(TilePart::WestWall).is_some()), 0);
        assert_eq!(g.count(|t| t.part(TilePart::Floor).is_some()), 100);
    }

    #[test]
    fn full_density_fills_every_tile() {
        let mut mapgen = MapGen::with_grid(
            TileGrid::with_floor(MapSize::new(6, 6, 1)),
            StdRng::seed_from_u64(2),
        );
        assert_eq!(mapgen.scatter_obstacles(1.0), 36);
        assert_eq!(mapgen.roughen(1.0), mapgen.grid.count(|t| t.part(TilePart::Object).is_none()));
    }

    #[test]
    fn same_seed_same_map() {
        let size = MapSize::new(12, 8, 1);
        let a = scatter(&mut StdRng::seed_from_u64(9), size, 0.3);
        let b = scatter(&mut StdRng::seed_from_u64(9), size, 0.3);
        assert_eq!(a, b);
    }
}
