//! Moving an agent along a planned path.

use std::collections::VecDeque;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use tilenav_core::{Point, Vec2};
use tilenav_paths::Pathfinder;

use crate::events::GridRefreshed;
use crate::layout::GridLayout;
use crate::manager::SharedPathfinder;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerSettings {
    /// World units per second.
    pub speed: f32,
    /// Distance at which a waypoint counts as reached.
    pub reach_threshold: f32,
}

impl Default for FollowerSettings {
    fn default() -> Self {
        Self {
            speed: 2.0,
            reach_threshold: 0.1,
        }
    }
}

/// An agent that walks cell centers toward a target.
///
/// The follower keeps its own snapshot of the pathfinder. It only picks up
/// a new one in [`sync_grid`](Self::sync_grid), after a refresh
/// notification, and drops its current path when it does.
#[derive(Debug)]
pub struct PathFollower {
    handle: SharedPathfinder,
    pathfinder: Arc<Pathfinder>,
    refreshed: Receiver<GridRefreshed>,
    layout: GridLayout,
    position: Vec2,
    // Cells still to visit, in travel order.
    path: VecDeque<Point>,
    settings: FollowerSettings,
}

impl PathFollower {
    pub fn new(
        handle: SharedPathfinder,
        refreshed: Receiver<GridRefreshed>,
        layout: GridLayout,
        position: Vec2,
        settings: FollowerSettings,
    ) -> Self {
        let pathfinder = handle.load();
        Self {
            handle,
            pathfinder,
            refreshed,
            layout,
            position,
            path: VecDeque::new(),
            settings,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Teleport. The current path is kept.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Cell under the follower.
    pub fn cell(&self) -> Point {
        self.layout.world_to_cell(self.position)
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// The pathfinder the follower currently plans with.
    pub fn pathfinder(&self) -> &Arc<Pathfinder> {
        &self.pathfinder
    }

    /// Cells left on the current path, in travel order.
    pub fn remaining(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.path.iter().copied()
    }

    pub fn is_idle(&self) -> bool {
        self.path.is_empty()
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    pub fn settings(&self) -> FollowerSettings {
        self.settings
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.settings.speed = speed;
    }

    pub fn set_reach_threshold(&mut self, threshold: f32) {
        self.settings.reach_threshold = threshold;
    }

    /// Plan a path to the cell containing `target`.
    ///
    /// Returns `false` and leaves the follower idle when there is no path or
    /// when the follower already stands in the target cell.
    pub fn plan_to(&mut self, target: Vec2) -> bool {
        let from = self.cell();
        let to = self.layout.world_to_cell(target);
        let result = self.pathfinder.find_path(from, to);
        self.path.clear();
        if !result.is_success() || result.is_empty() {
            log::debug!("follower: no path from {from} to {to}");
            return false;
        }
        self.path.extend(result.steps());
        true
    }

    /// Pick up the current pathfinder if the grid was refreshed since the
    /// last call. Returns whether it was, in which case the path is cleared
    /// and the caller should replan.
    pub fn sync_grid(&mut self) -> bool {
        if self.refreshed.try_iter().count() == 0 {
            return false;
        }
        self.pathfinder = self.handle.load();
        self.path.clear();
        log::debug!("follower: grid refreshed, path dropped");
        true
    }

    /// Move toward the next cell center for `dt` seconds. Returns whether
    /// that cell was reached.
    pub fn step(&mut self, dt: f32) -> bool {
        let Some(&next) = self.path.front() else {
            return false;
        };
        let target = self.layout.cell_to_world_center(next);
        let to_target = target - self.position;
        let remaining = to_target.length();
        let travel = self.settings.speed * dt;
        if remaining <= travel {
            self.position = target;
        } else {
            self.position += to_target.normalized() * travel;
        }
        if self.position.distance(target) <= self.settings.reach_threshold {
            self.position = target;
            self.path.pop_front();
            return true;
        }
        false
    }
}
