use battlescape_core::Position;

/// Weighted diagonal distance on the horizontal plane: `straight` per
/// orthogonal step and `straight * diagonal_percent / 100` per diagonal
/// step, the cheapest way to cover the offset with compass moves.
#[inline]
pub fn octile(a: Position, b: Position, straight: i32, diagonal_percent: i32) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let diagonals = dx.min(dy);
    let straights = dx.max(dy) - diagonals;
    straights * straight + diagonals * (straight * diagonal_percent / 100)
}
