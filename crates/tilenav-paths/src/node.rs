use std::cmp::Ordering;

use tilenav_core::Point;

use crate::heap::HeapItem;
use crate::table::{CellTable, TableShape};

// ---------------------------------------------------------------------------
// Per-search node state
// ---------------------------------------------------------------------------

/// Search state of one discovered cell during a single query.
#[derive(Debug, Clone)]
pub(crate) struct SearchNode {
    pub(crate) cell: Point,
    /// Accumulated weighted distance from the start.
    pub(crate) g: f32,
    /// Euclidean estimate of the distance to the goal.
    pub(crate) h: f32,
    /// Arena index of the predecessor on the best known path.
    pub(crate) parent: Option<usize>,
    pub(crate) closed: bool,
}

impl SearchNode {
    #[inline]
    pub(crate) fn total(&self) -> f32 {
        self.g + self.h
    }
}

/// Reference into the node arena, ordered by total cost for the open heap.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenRef {
    pub(crate) node: usize,
    pub(crate) f: f32,
}

impl Ord for OpenRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the smallest total first.
        other.f.total_cmp(&self.f)
    }
}

impl PartialOrd for OpenRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenRef {}

impl HeapItem for OpenRef {
    #[inline]
    fn id(&self) -> usize {
        self.node
    }
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// Nodes of one search, created lazily the first time a cell is discovered.
///
/// Parent links are arena indices, so the parent chain is a tree rooted at
/// the start node and is dropped together with the arena.
pub(crate) struct NodeArena {
    lookup: CellTable<usize>,
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub(crate) fn new(shape: TableShape, expected: usize) -> Self {
        Self {
            lookup: CellTable::new(shape, expected),
            nodes: Vec::with_capacity(expected),
        }
    }

    /// Register a node for `cell` and return its index. An existing node for
    /// the same cell is returned unchanged.
    ///
    /// Returns `None` when `cell` lies outside a dense arena's bounds.
    pub(crate) fn insert(&mut self, cell: Point, g: f32, h: f32) -> Option<usize> {
        if let Some(i) = self.lookup.get(cell) {
            return Some(i);
        }
        let i = self.nodes.len();
        if !self.lookup.insert(cell, i) {
            return None;
        }
        self.nodes.push(SearchNode {
            cell,
            g,
            h,
            parent: None,
            closed: false,
        });
        Some(i)
    }

    #[inline]
    pub(crate) fn get(&self, i: usize) -> &SearchNode {
        &self.nodes[i]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, i: usize) -> &mut SearchNode {
        &mut self.nodes[i]
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}
