//! **tilenav-core**: geometry shared by the *tilenav* crates.
//!
//! A grid cell is a [`Point`] with integer coordinates, a rectangular block
//! of cells is a [`Range`], and continuous world-space positions and sizes
//! are [`Vec2`].

pub mod geom;

pub use geom::{Point, Range, RangeIter, Vec2};
