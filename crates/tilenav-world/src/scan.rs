//! Building a weighted map and blocked set by probing the world.

use std::fmt;

use tilenav_core::{Point, Vec2};
use tilenav_paths::{BlockedSet, Connectivity, Pathfinder, WeightedMap};

use crate::config::GridConfig;
use crate::layout::GridLayout;

/// Obstacle classification queried while scanning the grid.
///
/// Both methods receive the world-space center and extent of the probe box
/// of one cell.
pub trait WorldQuery {
    /// Whether something impassable overlaps the box.
    fn is_obstructed(&self, center: Vec2, size: Vec2) -> bool;

    /// Whether the box lies on difficult terrain.
    fn is_difficult(&self, _center: Vec2, _size: Vec2) -> bool {
        false
    }
}

impl<Q: WorldQuery + ?Sized> WorldQuery for &Q {
    fn is_obstructed(&self, center: Vec2, size: Vec2) -> bool {
        (**self).is_obstructed(center, size)
    }

    fn is_difficult(&self, center: Vec2, size: Vec2) -> bool {
        (**self).is_difficult(center, size)
    }
}

/// Output of one grid scan.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub layout: GridLayout,
    pub weighted: WeightedMap,
    pub blocked: BlockedSet,
    default_cost: f32,
}

/// Probe every cell of the configured grid.
///
/// A cell whose probe box overlaps an obstacle is blocked; every other cell
/// becomes walkable with the default cost, or the difficult-terrain weight
/// when the query reports difficult terrain.
pub fn scan<Q: WorldQuery + ?Sized>(config: &GridConfig, query: &Q) -> ScanResult {
    let layout = config.layout();
    let probe = config.probe_size();
    let mut weighted = WeightedMap::new();
    let mut blocked = BlockedSet::new();

    for cell in layout.cells() {
        let center = layout.cell_to_world_center(cell);
        if query.is_obstructed(center, probe) {
            blocked.insert(cell);
        } else if query.is_difficult(center, probe) {
            weighted.insert(cell, config.difficult_terrain_weight);
        } else {
            weighted.insert(cell, config.default_walk_cost);
        }
    }

    log::info!(
        "scan: weighted map size {}, movement blockers {}",
        weighted.len(),
        blocked.len()
    );
    ScanResult {
        layout,
        weighted,
        blocked,
        default_cost: config.default_walk_cost,
    }
}

impl ScanResult {
    /// Build a pathfinder from a copy of the scanned data.
    pub fn to_pathfinder(&self, connectivity: Connectivity) -> Pathfinder {
        Pathfinder::new(self.weighted.clone(), self.blocked.clone(), connectivity)
    }

    /// Draw the grid as text, top row first, letting `overlay` replace the
    /// character of any cell.
    ///
    /// `.` is walkable, `~` is walkable at a non-default cost, `#` is
    /// blocked and a space is outside the walkable graph.
    pub fn render_with(&self, overlay: impl Fn(Point) -> Option<char>) -> String {
        let size = self.layout.size;
        let mut out = String::with_capacity(((size.x + 1) * size.y.max(0)) as usize);
        for y in (0..size.y).rev() {
            for x in 0..size.x {
                let p = Point::new(x, y);
                let ch = overlay(p).unwrap_or_else(|| self.glyph(p));
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }

    fn glyph(&self, p: Point) -> char {
        if self.blocked.contains(p) {
            return '#';
        }
        match self.weighted.cost(p) {
            Some(c) if c == self.default_cost => '.',
            Some(_) => '~',
            None => ' ',
        }
    }
}

impl fmt::Display for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(|_| None))
    }
}
