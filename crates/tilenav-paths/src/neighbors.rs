use tilenav_core::Point;

/// Rule set deciding which cells are adjacent to a given cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Connectivity {
    /// The four axis-aligned neighbors.
    #[default]
    Cardinal,
    /// Axis-aligned plus the four diagonal neighbors.
    Diagonal,
    /// A hex grid stored in rectangular offset coordinates: the four
    /// axis-aligned neighbors plus two diagonals whose side depends on the
    /// parity of the row.
    HexOffset,
}

const CARDINAL: [Point; 4] = [
    Point::new(1, 0),
    Point::new(-1, 0),
    Point::new(0, 1),
    Point::new(0, -1),
];

const DIAGONAL: [Point; 8] = [
    Point::new(1, 0),
    Point::new(-1, 0),
    Point::new(0, 1),
    Point::new(0, -1),
    Point::new(1, 1),
    Point::new(-1, -1),
    Point::new(-1, 1),
    Point::new(1, -1),
];

const HEX_EVEN_ROW: [Point; 6] = [
    Point::new(1, 0),
    Point::new(-1, 0),
    Point::new(0, 1),
    Point::new(0, -1),
    Point::new(-1, 1),
    Point::new(-1, -1),
];

const HEX_ODD_ROW: [Point; 6] = [
    Point::new(1, 0),
    Point::new(-1, 0),
    Point::new(0, 1),
    Point::new(0, -1),
    Point::new(1, -1),
    Point::new(1, 1),
];

impl Connectivity {
    /// Offsets from `p` to its candidate neighbors.
    #[inline]
    pub fn offsets(self, p: Point) -> &'static [Point] {
        match self {
            Connectivity::Cardinal => &CARDINAL,
            Connectivity::Diagonal => &DIAGONAL,
            // Truncating remainder: -1 % 2 == -1, so negative odd rows are odd.
            Connectivity::HexOffset if p.y % 2 == 0 => &HEX_EVEN_ROW,
            Connectivity::HexOffset => &HEX_ODD_ROW,
        }
    }

    /// Upper bound on the number of neighbors of any cell.
    #[inline]
    pub fn max_neighbors(self) -> usize {
        match self {
            Connectivity::Cardinal => 4,
            Connectivity::Diagonal => 8,
            Connectivity::HexOffset => 6,
        }
    }
}

/// Cached neighbor computation helper.
///
/// Enumerates the neighbors of a cell under a [`Connectivity`], filtered by
/// a predicate, reusing one buffer across calls.
pub struct Neighbors {
    buf: Vec<Point>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Neighbors of `p` under `connectivity` for which `keep` returns `true`.
    pub fn of(
        &mut self,
        connectivity: Connectivity,
        p: Point,
        keep: impl Fn(Point) -> bool,
    ) -> &[Point] {
        self.buf.clear();
        for &d in connectivity.offsets(p) {
            // Offsets past the edge of the coordinate space have no cell.
            let Some(n) = p.checked_add(d) else {
                continue;
            };
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }
}
