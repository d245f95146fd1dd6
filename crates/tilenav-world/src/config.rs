//! Grid configuration, loadable from JSON.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tilenav_core::{Point, Vec2};
use tilenav_paths::Connectivity;

use crate::layout::GridLayout;

/// Settings of the scanned grid and of the pathfinders built from it.
///
/// Every field has a default, so a JSON document only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of cells on each axis.
    pub grid_size: Point,
    /// World units per cell on each axis.
    pub cell_size: Vec2,
    /// World position of the lower-left corner of the grid.
    pub origin: Vec2,
    /// Cost of entering an ordinary walkable cell.
    pub default_walk_cost: f32,
    /// Cost of entering a cell covered by difficult terrain.
    pub difficult_terrain_weight: f32,
    /// Fraction of a cell covered by the obstacle probe box.
    pub probe_scale: f32,
    pub connectivity: Connectivity,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_size: Point::new(20, 20),
            cell_size: Vec2::ONE,
            origin: Vec2::ZERO,
            default_walk_cost: 1.0,
            difficult_terrain_weight: 100.0,
            probe_scale: 0.9,
            connectivity: Connectivity::Cardinal,
        }
    }
}

impl GridConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: GridConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size.x < 1 || self.grid_size.y < 1 {
            return Err(ConfigError::Invalid(format!(
                "grid_size must be at least 1x1, got {}",
                self.grid_size
            )));
        }
        if !(self.cell_size.x > 0.0 && self.cell_size.y > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        for (name, cost) in [
            ("default_walk_cost", self.default_walk_cost),
            ("difficult_terrain_weight", self.difficult_terrain_weight),
        ] {
            if !(cost.is_finite() && cost > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and > 0, got {cost}"
                )));
            }
        }
        if !(self.probe_scale > 0.0 && self.probe_scale <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "probe_scale must be in (0, 1], got {}",
                self.probe_scale
            )));
        }
        Ok(())
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout::new(self.grid_size, self.cell_size, self.origin)
    }

    /// Extent of the box used to probe a cell for obstacles.
    pub fn probe_size(&self) -> Vec2 {
        self.cell_size * self.probe_scale
    }
}

/// Errors that can occur when loading a [`GridConfig`].
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// The document parsed but a value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "grid config: {e}"),
            Self::Parse(e) => write!(f, "grid config: invalid JSON: {e}"),
            Self::Invalid(msg) => write!(f, "grid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
