use std::collections::HashMap;

use tilenav_core::{Point, Range};

// Bounding ranges up to this many cells are always stored densely.
const MIN_DENSE_CELLS: u64 = 4096;
// Otherwise dense storage is used while the range holds at most this many
// cells per graph member.
const MAX_CELLS_PER_MEMBER: u64 = 4;

/// Storage layout of the per-cell tables of one pathfinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableShape {
    /// Flat row-major array over the bounding range.
    Dense(Range),
    /// Hash map keyed by cell.
    Sparse,
}

impl TableShape {
    /// Pick dense storage when the bounding range of `members` cells is
    /// small enough, sparse storage otherwise. `None` bounds (an empty map
    /// or one the range type cannot represent) are always sparse.
    pub(crate) fn for_members(bounds: Option<Range>, members: usize) -> Self {
        let Some(bounds) = bounds else {
            return TableShape::Sparse;
        };
        let w = (i64::from(bounds.max.x) - i64::from(bounds.min.x)) as u64;
        let h = (i64::from(bounds.max.y) - i64::from(bounds.min.y)) as u64;
        let area = w.saturating_mul(h);
        let limit = (members as u64)
            .saturating_mul(MAX_CELLS_PER_MEMBER)
            .max(MIN_DENSE_CELLS);
        if area <= limit {
            TableShape::Dense(bounds)
        } else {
            TableShape::Sparse
        }
    }
}

/// A map from cell to a small `Copy` value, stored per [`TableShape`].
#[derive(Debug, Clone)]
pub(crate) enum CellTable<T> {
    Dense {
        bounds: Range,
        slots: Vec<Option<T>>,
    },
    Sparse(HashMap<Point, T>),
}

impl<T: Copy> CellTable<T> {
    pub(crate) fn new(shape: TableShape, expected: usize) -> Self {
        match shape {
            TableShape::Dense(bounds) => CellTable::Dense {
                bounds,
                slots: vec![None; bounds.len()],
            },
            TableShape::Sparse => CellTable::Sparse(HashMap::with_capacity(expected)),
        }
    }

    #[inline]
    pub(crate) fn get(&self, p: Point) -> Option<T> {
        match self {
            CellTable::Dense { bounds, slots } => bounds.index_of(p).and_then(|i| slots[i]),
            CellTable::Sparse(map) => map.get(&p).copied(),
        }
    }

    /// Store `value` for `p`. Returns `false`, storing nothing, when `p`
    /// lies outside a dense table.
    #[inline]
    pub(crate) fn insert(&mut self, p: Point, value: T) -> bool {
        match self {
            CellTable::Dense { bounds, slots } => match bounds.index_of(p) {
                Some(i) => {
                    slots[i] = Some(value);
                    true
                }
                None => false,
            },
            CellTable::Sparse(map) => {
                map.insert(p, value);
                true
            }
        }
    }
}
