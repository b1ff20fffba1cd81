//! Battlescapes built from text.
//!
//! [`TileGrid::from_layout`] parses one ASCII drawing per level into a
//! grid. In each drawing, lines are rows (`y`) and characters are columns
//! (`x`); the first drawing is level 0. Lines are separated by `'\n'` and
//! must all have the same width. Leading and trailing whitespace is trimmed
//! from each drawing but not from individual lines.
//!
//! | Glyph | Tile |
//! |---|---|
//! | `.` | floor, 4 TUs |
//! | `,` | rough floor, 6 TUs |
//! | `_` | empty: no floor, nothing to stand on |
//! | `#` | floor and an impassable pillar |
//! | `/` `\` | floor and a diagonal wall (`NeSw`, `NwSe`) |
//! | `[` `]` `^` `v` | floor and an edge wall object on the west, east, north or south side |
//! | <code>&#124;</code> `-` `+` | floor and a west, north, or west and north wall |
//! | `d` `D` | floor and a swing door on the west or north side |
//! | `u` `U` | floor and a UFO door on the west or north side |
//! | `s` `S` | floor and a low or high stair step |
//! | `B` | floor and a full-height block that can be stood on from above |
//! | `=` | grav lift floor |
//! | `~` | burning floor |
//! | `o` | floor and a 2 TU object |

use std::fmt;

use battlescape_core::tile::{LOWER_STAIR_LEVEL, UPPER_STAIR_LEVEL};
use battlescape_core::{BigWall, DoorKind, MapSize, PartData, Position, TilePart};

use crate::grid::TileGrid;

/// Turns of fire put on `~` tiles.
const LAYOUT_FIRE: i32 = 3;

/// Parts a glyph stands for, or `None` for an unknown glyph.
fn glyph_parts(ch: char) -> Option<Vec<(TilePart, PartData)>> {
    use TilePart::{Floor, NorthWall, Object, WestWall};
    let floor = (Floor, PartData::floor(4));
    let parts = match ch {
        '.' | '~' => vec![floor],
        ',' => vec![(Floor, PartData::floor(6))],
        '_' => Vec::new(),
        '#' => vec![floor, (Object, PartData::big_wall(BigWall::Block))],
        '/' => vec![floor, (Object, PartData::big_wall(BigWall::NeSw))],
        '\\' => vec![floor, (Object, PartData::big_wall(BigWall::NwSe))],
        '[' => vec![floor, (Object, PartData::big_wall(BigWall::West))],
        ']' => vec![floor, (Object, PartData::big_wall(BigWall::East))],
        '^' => vec![floor, (Object, PartData::big_wall(BigWall::North))],
        'v' => vec![floor, (Object, PartData::big_wall(BigWall::South))],
        '|' => vec![floor, (WestWall, PartData::wall())],
        '-' => vec![floor, (NorthWall, PartData::wall())],
        '+' => vec![
            floor,
            (WestWall, PartData::wall()),
            (NorthWall, PartData::wall()),
        ],
        'd' => vec![floor, (WestWall, PartData::door(DoorKind::Swing))],
        'D' => vec![floor, (NorthWall, PartData::door(DoorKind::Swing))],
        'u' => vec![floor, (WestWall, PartData::door(DoorKind::Ufo))],
        'U' => vec![floor, (NorthWall, PartData::door(DoorKind::Ufo))],
        's' => vec![floor, (Object, PartData::stairs(LOWER_STAIR_LEVEL))],
        'S' => vec![floor, (Object, PartData::stairs(UPPER_STAIR_LEVEL))],
        'B' => vec![floor, (Object, PartData::block())],
        '=' => vec![(Floor, PartData::lift())],
        'o' => vec![floor, (Object, PartData::object(2))],
        _ => return None,
    };
    Some(parts)
}

/// Width and height of one level drawing, checking that rows line up.
fn level_size(level: usize, s: &str) -> Result<(i32, i32), LayoutError> {
    let mut w: Option<usize> = None;
    let mut h = 0;
    for line in s.split('\n') {
        let n = line.chars().count();
        if w.is_some_and(|w| w != n) {
            return Err(LayoutError::InconsistentSize { level });
        }
        w = Some(n);
        h += 1;
    }
    Ok((w.unwrap_or(0) as i32, h))
}

impl TileGrid {
    /// Build a grid from one drawing per level, bottom level first.
    ///
    /// See the [module documentation](self) for the glyphs.
    pub fn from_layout(levels: &[&str]) -> Result<TileGrid, LayoutError> {
        let Some(first) = levels.first() else {
            return Err(LayoutError::NoLevels);
        };
        let (w, h) = level_size(0, first.trim())?;
        let mut grid = TileGrid::new(MapSize::new(w, h, levels.len() as i32));

        for (z, level) in levels.iter().enumerate() {
            let level = level.trim();
            let found = level_size(z, level)?;
            if found != (w, h) {
                return Err(LayoutError::LevelSizeMismatch {
                    level: z,
                    expected: (w, h),
                    found,
                });
            }
            for (y, line) in level.split('\n').enumerate() {
                for (x, ch) in line.chars().enumerate() {
                    let pos = Position::new(x as i32, y as i32, z as i32);
                    let parts = glyph_parts(ch).ok_or(LayoutError::InvalidGlyph { ch, pos })?;
                    if let Some(tile) = grid.tile_mut(pos) {
                        for (part, data) in parts {
                            tile.set_part(part, Some(data));
                        }
                        if ch == '~' {
                            tile.fire = LAYOUT_FIRE;
                        }
                    }
                }
            }
        }
        log::trace!("parsed layout of size {}", grid.size());
        Ok(grid)
    }
}

/// Errors that can occur when parsing a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Lines of one level have different widths.
    InconsistentSize { level: usize },
    /// A level's drawing differs in size from level 0.
    LevelSizeMismatch {
        level: usize,
        expected: (i32, i32),
        found: (i32, i32),
    },
    /// No level drawing was given.
    NoLevels,
    /// A character with no meaning in layouts.
    InvalidGlyph { ch: char, pos: Position },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentSize { level } => {
                write!(f, "layout: inconsistent line widths on level {level}")
            }
            Self::LevelSizeMismatch {
                level,
                expected,
                found,
            } => write!(
                f,
                "layout: level {level} is {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::NoLevels => write!(f, "layout: no levels"),
            Self::InvalidGlyph { ch, pos } => {
                write!(f, "layout contains invalid glyph \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}
