//! Mapping between continuous world space and discrete grid cells.

use tilenav_core::{Point, Range, RangeIter, Vec2};

/// Placement of a rectangular cell grid in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Number of cells on each axis.
    pub size: Point,
    /// World units per cell on each axis.
    pub cell_size: Vec2,
    /// World position of the lower-left corner of cell (0, 0).
    pub origin: Vec2,
}

impl GridLayout {
    pub fn new(size: Point, cell_size: Vec2, origin: Vec2) -> Self {
        Self {
            size,
            cell_size,
            origin,
        }
    }

    /// Cell containing `world`, clamped onto the grid.
    #[inline]
    pub fn world_to_cell(&self, world: Vec2) -> Point {
        world_to_cell(world, self.size, self.cell_size, self.origin)
    }

    /// World position of the center of `cell`.
    #[inline]
    pub fn cell_to_world_center(&self, cell: Point) -> Vec2 {
        cell_to_world_center(cell, self.cell_size, self.origin)
    }

    /// All cells of the grid.
    #[inline]
    pub fn range(&self) -> Range {
        Range::from_size(self.size)
    }

    #[inline]
    pub fn contains(&self, cell: Point) -> bool {
        self.range().contains(cell)
    }

    /// Row-major iterator over the cells of the grid.
    #[inline]
    pub fn cells(&self) -> RangeIter {
        self.range().iter()
    }

    /// Upper-right world corner of the grid.
    pub fn world_max(&self) -> Vec2 {
        self.origin + self.size.as_vec2().scale(self.cell_size)
    }
}

/// Convert a world position to the cell containing it.
///
/// Positions outside the grid snap to the nearest edge cell.
pub fn world_to_cell(world: Vec2, size: Point, cell_size: Vec2, origin: Vec2) -> Point {
    let local = world - origin;
    let x = (local.x / cell_size.x).floor() as i32;
    let y = (local.y / cell_size.y).floor() as i32;
    Point::new(x.min(size.x - 1).max(0), y.min(size.y - 1).max(0))
}

/// World position of the center of `cell`.
pub fn cell_to_world_center(cell: Point, cell_size: Vec2, origin: Vec2) -> Vec2 {
    origin + cell.as_vec2().scale(cell_size) + cell_size * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        GridLayout::new(Point::new(10, 6), Vec2::new(2.0, 0.5), Vec2::new(-4.0, 1.0))
    }

    #[test]
    fn centers_round_trip_to_their_cell() {
        let l = layout();
        for cell in l.cells() {
            let center = l.cell_to_world_center(cell);
            assert_eq!(l.world_to_cell(center), cell);
        }
    }

    #[test]
    fn center_is_offset_by_half_a_cell() {
        let l = layout();
        assert_eq!(l.cell_to_world_center(Point::new(0, 0)), Vec2::new(-3.0, 1.25));
        assert_eq!(l.cell_to_world_center(Point::new(3, 2)), Vec2::new(3.0, 2.25));
    }

    #[test]
    fn cell_edges_floor_to_the_lower_cell() {
        let l = layout();
        // x = -2.0 is the left edge of column 1.
        assert_eq!(l.world_to_cell(Vec2::new(-2.0, 1.0)), Point::new(1, 0));
        assert_eq!(l.world_to_cell(Vec2::new(-2.01, 1.49)), Point::new(0, 0));
    }

    #[test]
    fn out_of_range_positions_clamp_to_edge_cells() {
        let l = layout();
        assert_eq!(l.world_to_cell(Vec2::new(-100.0, -100.0)), Point::new(0, 0));
        assert_eq!(l.world_to_cell(Vec2::new(100.0, 100.0)), Point::new(9, 5));
        assert_eq!(l.world_to_cell(Vec2::new(0.5, -7.0)), Point::new(2, 0));
    }

    #[test]
    fn world_max_spans_the_grid() {
        assert_eq!(layout().world_max(), Vec2::new(16.0, 4.0));
    }
}
