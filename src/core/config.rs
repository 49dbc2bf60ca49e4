//! Simulation configuration with documented defaults
//!
//! Configuration is read from a TOML file and validated before a
//! simulation is built. Every default mirrors the classic page-sized
//! automaton: an 800x600 surface of 5px cells in five colors, ticking
//! twice per second.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TideError};
use crate::core::types::Palette;
use crate::simulation::rule::{RuleParams, UpdatePolicy};
use crate::simulation::tick::UpdateMode;
use crate::render::raster::surface_extent;
use crate::spatial::grid::{cell_count, BoundaryMode};

/// Default drawing surface width in pixels
pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
/// Default drawing surface height in pixels
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;
/// Default side length of one cell in pixels
pub const DEFAULT_CELL_SIZE: u32 = 5;
/// Default delay between ticks
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;
/// Default palette
pub const DEFAULT_PALETTE: [&str; 5] = ["green", "blue", "red", "yellow", "orange"];

/// Complete configuration for one simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub simulation: SimulationSettings,
}

/// Grid layout and appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Explicit row count. When absent, derived from `canvas_height / cell_size`.
    pub rows: Option<usize>,
    /// Explicit column count. When absent, derived from `canvas_width / cell_size`.
    pub cols: Option<usize>,
    /// Width of the drawing surface in pixels
    pub canvas_width: u32,
    /// Height of the drawing surface in pixels
    pub canvas_height: u32,
    /// Side length of one square cell in pixels
    ///
    /// Irrelevant to the update rule itself; only the renderer and the
    /// canvas-derived dimensions use it.
    pub cell_size: u32,
    /// Color names (keywords or `#rrggbb`) cells may take
    pub palette: Vec<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: None,
            cols: None,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            palette: DEFAULT_PALETTE.iter().map(|name| name.to_string()).collect(),
        }
    }
}

/// Rule selection and pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    /// Self-preservation policy. `"none"` selects the plain rule.
    pub policy: UpdatePolicy,
    /// Edge behavior. When absent: clamped for the plain rule, wrapped for
    /// the weighted policies.
    pub boundary: Option<BoundaryMode>,
    /// In-place (default) or double-buffered cell updates
    pub update_mode: UpdateMode,
    /// Delay between scheduled ticks in milliseconds
    pub tick_interval_ms: u64,
    /// Minimum neighbor count a color needs before it may take over a cell
    pub takeover_threshold: u32,
    /// `[success, total]` odds of the plain rule's random recolor
    pub mutation_chance: (u32, u32),
    /// RNG seed. When absent the run is seeded from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        let rule = RuleParams::default();
        Self {
            policy: UpdatePolicy::Plain,
            boundary: None,
            update_mode: UpdateMode::InPlace,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            takeover_threshold: rule.takeover_threshold,
            mutation_chance: rule.mutation_chance,
            seed: None,
        }
    }
}

impl SimulationSettings {
    /// Boundary mode in effect, applying the per-policy default
    pub fn boundary(&self) -> BoundaryMode {
        self.boundary.unwrap_or(match self.policy {
            UpdatePolicy::Plain => BoundaryMode::Clamped,
            _ => BoundaryMode::Wrapped,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn rule_params(&self) -> RuleParams {
        RuleParams {
            takeover_threshold: self.takeover_threshold,
            mutation_chance: self.mutation_chance,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            TideError::config(format!("failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Grid dimensions as `(rows, cols)`
    pub fn dimensions(&self) -> Result<(usize, usize)> {
        if self.grid.cell_size == 0 {
            return Err(TideError::config("cell_size must be positive"));
        }
        let cell = self.grid.cell_size as usize;
        let rows = self
            .grid
            .rows
            .unwrap_or(self.grid.canvas_height as usize / cell);
        let cols = self
            .grid
            .cols
            .unwrap_or(self.grid.canvas_width as usize / cell);

        if rows == 0 || cols == 0 {
            return Err(TideError::config(format!(
                "grid must have at least one row and column, got {}x{}",
                rows, cols
            )));
        }
        cell_count(rows, cols).map_err(|e| TideError::config(e.to_string()))?;
        Ok((rows, cols))
    }

    /// Resolve the configured palette
    pub fn palette(&self) -> Result<Palette> {
        if self.grid.palette.is_empty() {
            return Err(TideError::config("palette must list at least one color"));
        }
        Palette::from_names(&self.grid.palette)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let (rows, cols) = self.dimensions()?;
        let _ = self.palette()?;
        surface_extent(rows, cols, self.grid.cell_size).map_err(|e| TideError::config(e.to_string()))?;

        if self.simulation.tick_interval_ms == 0 {
            return Err(TideError::config("tick_interval_ms must be positive"));
        }

        let (success, total) = self.simulation.mutation_chance;
        if total == 0 {
            return Err(TideError::config(format!(
                "mutation_chance denominator must be positive, got [{}, {}]",
                success, total
            )));
        }

        if self.simulation.takeover_threshold == 0 {
            return Err(TideError::config("takeover_threshold must be positive"));
        }

        Ok(())
    }
}
