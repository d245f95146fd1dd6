//! Shared pieces of the demos: a text map format and the world built from
//! it.
//!
//! | Char | Meaning |
//! |---|---|
//! | `.` | floor |
//! | `#` | solid wall |
//! | `+` | destructible block |
//! | `~` | difficult terrain |
//! | `G` | guard start |
//! | `P` | player |
//! | `1`-`9` | patrol waypoints, visited in numeric order |
//!
//! The first line of the text is the top row of the world.

use std::fmt;
use std::str::FromStr;

use tilenav_core::{Point, Vec2};
use tilenav_world::{GridConfig, GridLayout, ObstacleId, ObstacleKind, Obstacles};

// ---------------------------------------------------------------------------
// Tiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Wall,
    Block,
    Difficult,
}

impl Tile {
    pub fn glyph(self) -> char {
        match self {
            Tile::Floor => '.',
            Tile::Wall => '#',
            Tile::Block => '+',
            Tile::Difficult => '~',
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapParseError {
    /// No non-blank line.
    Empty,
    /// A line whose width differs from the first one. Lines are 1-based.
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    UnknownChar {
        line: usize,
        column: usize,
        ch: char,
    },
}

impl fmt::Display for MapParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "map is empty"),
            Self::Ragged {
                line,
                expected,
                found,
            } => write!(f, "line {line}: expected {expected} columns, found {found}"),
            Self::UnknownChar { line, column, ch } => {
                write!(f, "line {line}, column {column}: unknown map character {ch:?}")
            }
        }
    }
}

impl std::error::Error for MapParseError {}

// ---------------------------------------------------------------------------
// AsciiMap
// ---------------------------------------------------------------------------

/// A parsed text map. Cells use world orientation: y = 0 is the bottom row.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiMap {
    size: Point,
    tiles: Vec<Tile>,
    guard: Option<Point>,
    player: Option<Point>,
    // (digit, cell), sorted by digit.
    waypoints: Vec<(u32, Point)>,
}

impl AsciiMap {
    pub fn parse(text: &str) -> Result<Self, MapParseError> {
        let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        let first = lines.iter().position(|l| !l.trim().is_empty());
        let last = lines.iter().rposition(|l| !l.trim().is_empty());
        let (Some(first), Some(last)) = (first, last) else {
            return Err(MapParseError::Empty);
        };
        let rows = &lines[first..=last];

        let width = rows[0].chars().count();
        let height = rows.len();
        let mut map = AsciiMap {
            size: Point::new(width as i32, height as i32),
            tiles: vec![Tile::Floor; width * height],
            guard: None,
            player: None,
            waypoints: Vec::new(),
        };

        for (row, text) in rows.iter().enumerate() {
            let line = first + row + 1;
            let found = text.chars().count();
            if found != width {
                return Err(MapParseError::Ragged {
                    line,
                    expected: width,
                    found,
                });
            }
            let y = (height - 1 - row) as i32;
            for (x, ch) in text.chars().enumerate() {
                let p = Point::new(x as i32, y);
                let tile = match ch {
                    '.' => Tile::Floor,
                    '#' => Tile::Wall,
                    '+' => Tile::Block,
                    '~' => Tile::Difficult,
                    'G' => {
                        map.guard = Some(p);
                        Tile::Floor
                    }
                    'P' => {
                        map.player = Some(p);
                        Tile::Floor
                    }
                    '1'..='9' => {
                        map.waypoints.push((ch as u32 - '0' as u32, p));
                        Tile::Floor
                    }
                    _ => {
                        return Err(MapParseError::UnknownChar {
                            line,
                            column: x + 1,
                            ch,
                        });
                    }
                };
                let i = map.index(p);
                map.tiles[i] = tile;
            }
        }
        map.waypoints.sort_by_key(|&(digit, _)| digit);
        Ok(map)
    }

    fn index(&self, p: Point) -> usize {
        (p.y * self.size.x + p.x) as usize
    }

    #[inline]
    pub fn size(&self) -> Point {
        self.size
    }

    pub fn tile(&self, p: Point) -> Option<Tile> {
        if p.x < 0 || p.y < 0 || p.x >= self.size.x || p.y >= self.size.y {
            return None;
        }
        Some(self.tiles[self.index(p)])
    }

    pub fn guard(&self) -> Option<Point> {
        self.guard
    }

    pub fn player(&self) -> Option<Point> {
        self.player
    }

    /// Waypoint cells in visiting order.
    pub fn waypoints(&self) -> impl Iterator<Item = Point> + '_ {
        self.waypoints.iter().map(|&(_, p)| p)
    }

    /// `base` with its grid size replaced by the map's.
    pub fn config(&self, base: GridConfig) -> GridConfig {
        GridConfig {
            grid_size: self.size,
            ..base
        }
    }

    /// One obstacle per wall, block and difficult cell. Also returns the
    /// ids of the destructible blocks.
    pub fn obstacles(&self, layout: &GridLayout) -> (Obstacles, Vec<ObstacleId>) {
        let mut obstacles = Obstacles::new();
        let mut blocks = Vec::new();
        for p in layout.cells() {
            let kind = match self.tile(p) {
                Some(Tile::Wall) => ObstacleKind::Solid,
                Some(Tile::Block) => ObstacleKind::Solid,
                Some(Tile::Difficult) => ObstacleKind::Difficult,
                Some(Tile::Floor) | None => continue,
            };
            let id = obstacles.add_cell(layout, p, kind);
            if self.tile(p) == Some(Tile::Block) {
                blocks.push(id);
            }
        }
        (obstacles, blocks)
    }

    /// World positions of the waypoints in visiting order.
    pub fn waypoint_positions(&self, layout: &GridLayout) -> Vec<Vec2> {
        self.waypoints()
            .map(|p| layout.cell_to_world_center(p))
            .collect()
    }
}

impl FromStr for AsciiMap {
    type Err = MapParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
