//! Walkable-graph inputs: [`WeightedMap`] and [`BlockedSet`].

use std::collections::{HashMap, HashSet};

use tilenav_core::{Point, Range};

/// Traversal cost per walkable cell.
///
/// The keys are exactly the cells of the walkable graph. Entering a cell
/// costs its weight, which is always finite and strictly positive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedMap {
    costs: HashMap<Point, f32>,
}

impl WeightedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the cost of `cell`.
    ///
    /// # Panics
    ///
    /// Panics if `cost` is not finite or not strictly positive.
    pub fn insert(&mut self, cell: Point, cost: f32) -> Option<f32> {
        assert!(
            cost.is_finite() && cost > 0.0,
            "cost of cell {cell} must be finite and > 0, got {cost}"
        );
        self.costs.insert(cell, cost)
    }

    pub fn remove(&mut self, cell: Point) -> Option<f32> {
        self.costs.remove(&cell)
    }

    /// Cost of entering `cell`, or `None` if it is not a graph member.
    #[inline]
    pub fn cost(&self, cell: Point) -> Option<f32> {
        self.costs.get(&cell).copied()
    }

    #[inline]
    pub fn contains(&self, cell: Point) -> bool {
        self.costs.contains_key(&cell)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Point, f32)> + '_ {
        self.costs.iter().map(|(&p, &c)| (p, c))
    }

    /// Smallest range containing every member cell.
    ///
    /// `None` for an empty map, or when a member sits on the `i32::MAX` row
    /// or column, which no half-open [`Range`] can contain.
    pub fn bounds(&self) -> Option<Range> {
        if self.costs.is_empty() {
            return None;
        }
        self.costs
            .keys()
            .try_fold(Range::default(), |r, &p| r.checked_union_point(p))
    }
}

impl FromIterator<(Point, f32)> for WeightedMap {
    fn from_iter<I: IntoIterator<Item = (Point, f32)>>(iter: I) -> Self {
        let mut map = WeightedMap::new();
        for (p, c) in iter {
            map.insert(p, c);
        }
        map
    }
}

impl Extend<(Point, f32)> for WeightedMap {
    fn extend<I: IntoIterator<Item = (Point, f32)>>(&mut self, iter: I) {
        for (p, c) in iter {
            self.insert(p, c);
        }
    }
}

/// Cells excluded from traversal even when they are graph members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockedSet {
    cells: HashSet<Point>,
}

impl BlockedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the cell was not blocked before.
    pub fn insert(&mut self, cell: Point) -> bool {
        self.cells.insert(cell)
    }

    pub fn remove(&mut self, cell: Point) -> bool {
        self.cells.remove(&cell)
    }

    #[inline]
    pub fn contains(&self, cell: Point) -> bool {
        self.cells.contains(&cell)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().copied()
    }
}

impl FromIterator<Point> for BlockedSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Extend<Point> for BlockedSet {
    fn extend<I: IntoIterator<Item = Point>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}
