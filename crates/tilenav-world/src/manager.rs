//! Ownership of the current pathfinder and the rebuild-and-notify cycle.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use tilenav_core::Vec2;
use tilenav_paths::{PathResult, Pathfinder};

use crate::config::GridConfig;
use crate::events::{GridEvents, GridRefreshed};
use crate::follower::{FollowerSettings, PathFollower};
use crate::layout::GridLayout;
use crate::obstacles::{ObstacleId, Obstacles};
use crate::scan::{ScanResult, WorldQuery, scan};

/// Cloneable handle to whichever pathfinder is current.
///
/// Readers take a cheap snapshot with [`load`](Self::load) and may keep
/// using it after a refresh: an old pathfinder stays valid and keeps
/// answering against the grid it was built from.
#[derive(Debug, Clone)]
pub struct SharedPathfinder {
    inner: Arc<RwLock<Arc<Pathfinder>>>,
}

impl SharedPathfinder {
    pub fn new(pathfinder: Pathfinder) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(pathfinder))),
        }
    }

    /// The current pathfinder.
    pub fn load(&self) -> Arc<Pathfinder> {
        Arc::clone(&self.inner.read())
    }

    pub(crate) fn store(&self, pathfinder: Arc<Pathfinder>) {
        *self.inner.write() = pathfinder;
    }
}

/// Scans the world, owns the current pathfinder and rebuilds it on demand.
///
/// [`refresh_grid`](Self::refresh_grid) rescans the world, builds a brand
/// new pathfinder, swaps it into the shared handle and then notifies every
/// subscriber.
pub struct GridManager<Q> {
    config: GridConfig,
    query: Q,
    current: SharedPathfinder,
    last_scan: ScanResult,
    events: GridEvents,
    generation: u64,
}

impl<Q: WorldQuery> GridManager<Q> {
    /// Scan the world once and build the initial pathfinder.
    pub fn new(config: GridConfig, query: Q) -> Self {
        let last_scan = scan(&config, &query);
        let current = SharedPathfinder::new(last_scan.to_pathfinder(config.connectivity));
        log::info!(
            "grid manager: pathfinder initialized for {}x{} grid",
            config.grid_size.x,
            config.grid_size.y
        );
        Self {
            config,
            query,
            current,
            last_scan,
            events: GridEvents::new(),
            generation: 0,
        }
    }

    /// Rescan the world, replace the current pathfinder and notify
    /// subscribers.
    pub fn refresh_grid(&mut self) {
        log::info!("grid manager: refreshing grid data and pathfinder");
        let scanned = scan(&self.config, &self.query);
        let pathfinder = Arc::new(scanned.to_pathfinder(self.config.connectivity));
        self.current.store(pathfinder);
        self.last_scan = scanned;
        self.generation += 1;
        let notified = self.events.broadcast();
        log::info!(
            "grid manager: grid refreshed (generation {}), notified {notified} subscribers",
            self.generation
        );
    }

    /// The current pathfinder.
    pub fn pathfinder(&self) -> Arc<Pathfinder> {
        self.current.load()
    }

    /// A handle that always resolves to the current pathfinder.
    pub fn handle(&self) -> SharedPathfinder {
        self.current.clone()
    }

    /// Receive a [`GridRefreshed`] after every refresh.
    pub fn subscribe(&mut self) -> Receiver<GridRefreshed> {
        self.events.subscribe()
    }

    /// A path follower at `position`, wired to this manager.
    pub fn follower(&mut self, position: Vec2, settings: FollowerSettings) -> PathFollower {
        let refreshed = self.subscribe();
        PathFollower::new(self.handle(), refreshed, self.layout(), position, settings)
    }

    /// Query the current pathfinder between two world positions.
    pub fn find_path_world(&self, from: Vec2, to: Vec2) -> PathResult {
        let layout = self.layout();
        self.pathfinder()
            .find_path(layout.world_to_cell(from), layout.world_to_cell(to))
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Mutable access to the world. Changes are only seen by pathfinders
    /// built after the next [`refresh_grid`](Self::refresh_grid).
    pub fn query_mut(&mut self) -> &mut Q {
        &mut self.query
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn layout(&self) -> GridLayout {
        self.config.layout()
    }

    /// Result of the most recent scan.
    pub fn last_scan(&self) -> &ScanResult {
        &self.last_scan
    }

    /// Number of refreshes since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl GridManager<Obstacles> {
    /// Remove an obstacle and refresh the grid. Returns `false` if the
    /// obstacle did not exist, in which case nothing is refreshed.
    pub fn destroy_obstacle(&mut self, id: ObstacleId) -> bool {
        if self.query.remove(id).is_none() {
            return false;
        }
        log::debug!("grid manager: obstacle {id:?} destroyed");
        self.refresh_grid();
        true
    }
}
