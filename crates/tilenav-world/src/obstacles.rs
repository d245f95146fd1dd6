//! A simple obstacle world made of axis-aligned boxes.

use std::collections::BTreeMap;

use tilenav_core::{Point, Vec2};

use crate::layout::GridLayout;
use crate::scan::WorldQuery;

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: Vec2::new(min.x.min(max.x), min.y.min(max.y)),
            max: Vec2::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// The box covering exactly one grid cell.
    pub fn from_cell(layout: &GridLayout, cell: Point) -> Self {
        Self::from_center(layout.cell_to_world_center(cell), layout.cell_size)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Whether the interiors intersect. Boxes that only share an edge do
    /// not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// How an obstacle affects movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    /// Blocks the cells it covers.
    Solid,
    /// Leaves the cells walkable at the difficult-terrain weight.
    Difficult,
}

/// Handle of an obstacle inside [`Obstacles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub bounds: Aabb,
    pub kind: ObstacleKind,
}

/// A set of box obstacles that can be added and destroyed at runtime.
#[derive(Debug, Clone, Default)]
pub struct Obstacles {
    items: BTreeMap<ObstacleId, Obstacle>,
    next_id: u32,
}

impl Obstacles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bounds: Aabb, kind: ObstacleKind) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        self.items.insert(id, Obstacle { bounds, kind });
        id
    }

    /// Add an obstacle covering one grid cell.
    pub fn add_cell(&mut self, layout: &GridLayout, cell: Point, kind: ObstacleKind) -> ObstacleId {
        self.add(Aabb::from_cell(layout, cell), kind)
    }

    pub fn remove(&mut self, id: ObstacleId) -> Option<Obstacle> {
        self.items.remove(&id)
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.items.get(&id)
    }

    /// First obstacle of the given kind containing the world point.
    pub fn find_at(&self, p: Vec2, kind: ObstacleKind) -> Option<ObstacleId> {
        self.items
            .iter()
            .find(|(_, o)| o.kind == kind && o.bounds.contains(p))
            .map(|(&id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> {
        self.items.iter().map(|(&id, o)| (id, o))
    }

    fn any_overlap(&self, probe: &Aabb, kind: ObstacleKind) -> bool {
        self.items
            .values()
            .any(|o| o.kind == kind && o.bounds.overlaps(probe))
    }
}

impl WorldQuery for Obstacles {
    fn is_obstructed(&self, center: Vec2, size: Vec2) -> bool {
        self.any_overlap(&Aabb::from_center(center, size), ObstacleKind::Solid)
    }

    fn is_difficult(&self, center: Vec2, size: Vec2) -> bool {
        self.any_overlap(&Aabb::from_center(center, size), ObstacleKind::Difficult)
    }
}
