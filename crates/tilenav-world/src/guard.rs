//! A guard that patrols waypoints, chases a target and searches where the
//! target was last seen.

use serde::{Deserialize, Serialize};
use tilenav_core::{Point, Vec2};

use crate::follower::PathFollower;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardSettings {
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Seconds spent at each patrol waypoint.
    pub wait_time: f32,
    /// Seconds spent at the last known target position before resuming the
    /// patrol.
    pub lost_wait_time: f32,
    pub reach_threshold: f32,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            patrol_speed: 2.0,
            chase_speed: 3.5,
            wait_time: 1.0,
            lost_wait_time: 3.0,
            reach_threshold: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardMode {
    Patrol,
    Chase { target: Vec2 },
    Search { last_known: Vec2 },
}

#[derive(Debug)]
pub struct Guard {
    follower: PathFollower,
    waypoints: Vec<Vec2>,
    waypoint: usize,
    mode: GuardMode,
    // Seconds left before the guard moves on.
    waiting: Option<f32>,
    // Set when no patrol waypoint can be reached. Cleared by a new order or
    // by a grid refresh that opens a route.
    stopped: bool,
    settings: GuardSettings,
}

impl Guard {
    /// A guard that will patrol `waypoints` in order. Call
    /// [`start_patrol`](Self::start_patrol) to get it moving.
    pub fn new(mut follower: PathFollower, waypoints: Vec<Vec2>, settings: GuardSettings) -> Self {
        follower.set_speed(settings.patrol_speed);
        follower.set_reach_threshold(settings.reach_threshold);
        Self {
            follower,
            waypoints,
            waypoint: 0,
            mode: GuardMode::Patrol,
            waiting: None,
            stopped: false,
            settings,
        }
    }

    #[inline]
    pub fn mode(&self) -> GuardMode {
        self.mode
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.follower.position()
    }

    pub fn follower(&self) -> &PathFollower {
        &self.follower
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting.is_some()
    }

    /// Whether the guard gave up patrolling because no waypoint is reachable.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The patrol waypoint the guard is heading to or waiting at.
    pub fn current_waypoint(&self) -> Option<Vec2> {
        self.waypoints.get(self.waypoint).copied()
    }

    /// Resume the patrol toward the current waypoint.
    pub fn start_patrol(&mut self) {
        self.mode = GuardMode::Patrol;
        self.waiting = None;
        self.stopped = false;
        self.follower.set_speed(self.settings.patrol_speed);
        self.plan_next_waypoint(false);
    }

    /// Chase `target`. Calling this again with a target in the same cell
    /// keeps the current path.
    pub fn chase(&mut self, target: Vec2) {
        let replan = match self.mode {
            GuardMode::Chase { target: old } => {
                self.follower.is_idle() || self.cell_of(old) != self.cell_of(target)
            }
            _ => true,
        };
        if !matches!(self.mode, GuardMode::Chase { .. }) {
            log::debug!("guard: chasing target at {target}");
        }
        self.mode = GuardMode::Chase { target };
        self.waiting = None;
        self.stopped = false;
        self.follower.set_speed(self.settings.chase_speed);
        if replan {
            self.follower.plan_to(target);
        }
    }

    /// Give up the chase and go look where the target was last seen.
    pub fn lose_target(&mut self) {
        let GuardMode::Chase { target } = self.mode else {
            return;
        };
        log::debug!("guard: lost target, searching at {target}");
        self.mode = GuardMode::Search { last_known: target };
        self.follower.set_speed(self.settings.patrol_speed);
        self.waiting = None;
        self.follower.plan_to(target);
    }

    /// Advance the guard by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.follower.sync_grid() {
            self.replan();
        }
        if self.stopped {
            return;
        }

        if let Some(left) = self.waiting {
            let left = left - dt;
            if left > 0.0 {
                self.waiting = Some(left);
                return;
            }
            self.waiting = None;
            match self.mode {
                GuardMode::Patrol => {
                    self.plan_next_waypoint(true);
                }
                GuardMode::Search { .. } => {
                    log::debug!("guard: search over, resuming patrol");
                    self.start_patrol();
                }
                GuardMode::Chase { target } => {
                    self.follower.plan_to(target);
                }
            }
            return;
        }

        if self.follower.is_idle() {
            match self.mode {
                GuardMode::Patrol => self.waiting = Some(self.settings.wait_time),
                GuardMode::Search { .. } => self.waiting = Some(self.settings.lost_wait_time),
                // Holds position until the target moves or the grid changes.
                GuardMode::Chase { .. } => {}
            }
            return;
        }

        if self.follower.step(dt) && self.follower.is_idle() {
            log::trace!("guard: arrived at {}", self.follower.cell());
        }
    }

    fn replan(&mut self) {
        match self.mode {
            GuardMode::Patrol => {
                if self.waiting.is_none() {
                    self.plan_next_waypoint(false);
                }
            }
            GuardMode::Chase { target } => {
                self.follower.plan_to(target);
            }
            GuardMode::Search { last_known } => {
                if self.waiting.is_none() {
                    self.follower.plan_to(last_known);
                }
            }
        }
    }

    /// Plan toward the next reachable waypoint, starting at the current one
    /// or the one after it. Unreachable waypoints are skipped. When none is
    /// reachable the guard stops and warns once.
    fn plan_next_waypoint(&mut self, advance_first: bool) -> bool {
        let n = self.waypoints.len();
        let here = self.follower.cell();
        for i in 0..n {
            let idx = (self.waypoint + i + usize::from(advance_first)) % n;
            let target = self.waypoints[idx];
            // Already standing on it counts as arrived.
            if self.cell_of(target) == here || self.follower.plan_to(target) {
                if self.stopped {
                    log::debug!("guard: patrol route open again from {here}");
                }
                self.waypoint = idx;
                self.stopped = false;
                return true;
            }
        }
        if !self.stopped {
            if n == 0 {
                log::warn!("guard: no patrol waypoints, stopping at {here}");
            } else {
                log::warn!("guard: no reachable patrol waypoint from {here}, stopping");
            }
        }
        self.stopped = true;
        false
    }

    fn cell_of(&self, p: Vec2) -> Point {
        self.follower.layout().world_to_cell(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridConfig;
    use crate::follower::FollowerSettings;
    use crate::manager::GridManager;
    use crate::obstacles::{ObstacleKind, Obstacles};

    fn manager(w: i32, h: i32) -> GridManager<Obstacles> {
        let config = GridConfig {
            grid_size: Point::new(w, h),
            ..GridConfig::default()
        };
        GridManager::new(config, Obstacles::new())
    }

    fn guard(manager: &mut GridManager<Obstacles>, at: Vec2, waypoints: Vec<Vec2>) -> Guard {
        let follower = manager.follower(at, FollowerSettings::default());
        Guard::new(follower, waypoints, GuardSettings::default())
    }

    fn run(guard: &mut Guard, ticks: usize) {
        for _ in 0..ticks {
            guard.update(0.1);
        }
    }

    #[test]
    fn patrols_between_waypoints() {
        let mut m = manager(5, 5);
        let (a, b) = (Vec2::new(0.5, 0.5), Vec2::new(4.5, 0.5));
        let mut g = guard(&mut m, a, vec![a, b]);
        g.start_patrol();
        assert!(g.follower().is_idle());

        // Wait at the first waypoint, then walk four cells at patrol speed.
        run(&mut g, 36);
        assert_eq!(g.position(), b);
        assert!(g.is_waiting());
        assert_eq!(g.current_waypoint(), Some(b));

        run(&mut g, 40);
        assert_eq!(g.position(), a);
        assert_eq!(g.current_waypoint(), Some(a));
    }

    #[test]
    fn unreachable_waypoints_are_skipped() {
        let mut m = manager(5, 5);
        let layout = m.layout();
        m.query_mut()
            .add_cell(&layout, Point::new(2, 2), ObstacleKind::Solid);
        m.refresh_grid();
        let far = Vec2::new(4.5, 4.5);
        let mut g = guard(&mut m, Vec2::new(0.5, 0.5), vec![Vec2::new(2.5, 2.5), far]);
        g.start_patrol();
        assert_eq!(g.current_waypoint(), Some(far));
        assert_eq!(g.follower().remaining().last(), Some(Point::new(4, 4)));
    }

    #[test]
    fn guard_stops_until_a_waypoint_becomes_reachable() {
        let mut m = manager(5, 1);
        let layout = m.layout();
        let wall = m
            .query_mut()
            .add_cell(&layout, Point::new(2, 0), ObstacleKind::Solid);
        m.refresh_grid();
        let start = Vec2::new(0.5, 0.5);
        let post = Vec2::new(4.5, 0.5);
        let mut g = guard(&mut m, start, vec![post]);
        g.start_patrol();
        assert!(g.is_stopped());

        run(&mut g, 50);
        assert!(g.is_stopped());
        assert!(!g.is_waiting());
        assert!(g.follower().is_idle());
        assert_eq!(g.position(), start);

        assert!(m.destroy_obstacle(wall));
        g.update(0.0);
        assert!(!g.is_stopped());
        assert_eq!(g.follower().remaining().len(), 4);
        run(&mut g, 25);
        assert_eq!(g.position(), post);
    }

    #[test]
    fn guard_without_waypoints_stays_stopped() {
        let mut m = manager(3, 3);
        let mut g = guard(&mut m, Vec2::new(1.5, 1.5), Vec::new());
        g.start_patrol();
        assert!(g.is_stopped());
        run(&mut g, 30);
        assert!(g.is_stopped());
        assert!(!g.is_waiting());
        assert_eq!(g.position(), Vec2::new(1.5, 1.5));

        // A chase still gets it moving.
        let target = Vec2::new(2.5, 1.5);
        g.chase(target);
        assert!(!g.is_stopped());
        run(&mut g, 5);
        assert_eq!(g.position(), target);
    }

    #[test]
    fn chase_then_search_then_patrol() {
        let mut m = manager(6, 1);
        let home = Vec2::new(0.5, 0.5);
        let mut g = guard(&mut m, home, vec![home]);
        g.start_patrol();

        let target = Vec2::new(5.5, 0.5);
        g.chase(target);
        assert_eq!(g.mode(), GuardMode::Chase { target });
        assert_eq!(g.follower().settings().speed, 3.5);
        run(&mut g, 20);
        assert_eq!(g.position(), target);

        g.lose_target();
        assert_eq!(g.mode(), GuardMode::Search { last_known: target });
        run(&mut g, 1);
        assert!(g.is_waiting());
        run(&mut g, 31);
        assert_eq!(g.mode(), GuardMode::Patrol);
        assert_eq!(g.follower().settings().speed, 2.0);
        run(&mut g, 30);
        assert_eq!(g.position(), home);
    }

    #[test]
    fn lose_target_outside_a_chase_is_ignored() {
        let mut m = manager(3, 3);
        let mut g = guard(&mut m, Vec2::new(0.5, 0.5), Vec::new());
        g.lose_target();
        assert_eq!(g.mode(), GuardMode::Patrol);
        run(&mut g, 5);
        assert_eq!(g.position(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn refresh_lets_a_blocked_chase_continue() {
        let mut m = manager(5, 1);
        let layout = m.layout();
        let block = m
            .query_mut()
            .add_cell(&layout, Point::new(2, 0), ObstacleKind::Solid);
        m.refresh_grid();
        let mut g = guard(&mut m, Vec2::new(0.5, 0.5), Vec::new());

        let target = Vec2::new(4.5, 0.5);
        g.chase(target);
        run(&mut g, 5);
        assert!(g.follower().is_idle());
        assert_eq!(g.position(), Vec2::new(0.5, 0.5));

        assert!(m.destroy_obstacle(block));
        g.update(0.0);
        assert_eq!(g.follower().remaining().len(), 4);
        run(&mut g, 20);
        assert_eq!(g.position(), target);
    }
}
