//! World-side glue around [`tilenav_paths`].
//!
//! - [`scan`] probes every cell of a [`GridLayout`] through a [`WorldQuery`]
//!   and produces the weighted map and blocked set a
//!   [`Pathfinder`](tilenav_paths::Pathfinder) is built from.
//! - [`GridManager`] owns the current pathfinder. Its
//!   [`refresh_grid`](GridManager::refresh_grid) rescans the world, swaps a
//!   new pathfinder into the [`SharedPathfinder`] handle and broadcasts
//!   [`GridRefreshed`].
//! - [`PathFollower`] and [`Guard`] are consumers: they keep a snapshot of
//!   the pathfinder and re-fetch it, dropping their path, when notified.

mod config;
mod events;
mod follower;
mod guard;
mod layout;
mod manager;
mod obstacles;
mod scan;

pub use config::{ConfigError, GridConfig};
pub use events::{GridEvents, GridRefreshed};
pub use follower::{FollowerSettings, PathFollower};
pub use guard::{Guard, GuardMode, GuardSettings};
pub use layout::{GridLayout, cell_to_world_center, world_to_cell};
pub use manager::{GridManager, SharedPathfinder};
pub use obstacles::{Aabb, Obstacle, ObstacleId, ObstacleKind, Obstacles};
pub use scan::{ScanResult, WorldQuery, scan};
