//! Weighted-grid pathfinding for tile-based games.
//!
//! A [`Pathfinder`] is built from a [`WeightedMap`] (walkable cell → cost of
//! entering it), a [`BlockedSet`] (members excluded from traversal) and a
//! [`Connectivity`] rule. [`Pathfinder::find_path`] then answers
//! shortest-path queries with an A* search over a slot-tracking [`Heap`].
//!
//! | Connectivity | Neighbors |
//! |---|---|
//! | [`Connectivity::Cardinal`] | 4 axis-aligned |
//! | [`Connectivity::Diagonal`] | 4 axis-aligned + 4 diagonal |
//! | [`Connectivity::HexOffset`] | 4 axis-aligned + 2 diagonals chosen by row parity |
//!
//! A pathfinder never changes after construction. When the world changes,
//! build a fresh one from a new scan; older instances stay valid and keep
//! answering against the state they were built from.

mod distance;
mod heap;
mod map;
mod neighbors;
mod node;
mod pathfinder;
mod result;
mod table;

pub use distance::{chebyshev, euclidean, manhattan};
pub use heap::{Heap, HeapItem};
pub use map::{BlockedSet, WeightedMap};
pub use neighbors::{Connectivity, Neighbors};
pub use pathfinder::Pathfinder;
pub use result::{PathResult, PathStatus};
