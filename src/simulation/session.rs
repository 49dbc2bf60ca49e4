//! Simulation session: owns the grid and everything needed to advance it

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, TideError};
use crate::core::types::{ColorLabel, Palette, Tick};
use crate::render::raster::{frame_commands, FillRect};
use crate::simulation::census::{ColorCensus, ColorShares};
use crate::simulation::random::SimRng;
use crate::simulation::rule::UpdateRule;
use crate::simulation::tick::{step, TickReport, UpdateMode};
use crate::spatial::grid::{BoundaryMode, Grid};

/// A running automaton
///
/// The grid lives for the whole session and is only replaced wholesale by
/// [`Simulation::reset`]. Readers such as the renderer observe it between
/// calls to [`Simulation::step`].
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    palette: Palette,
    labels: Vec<ColorLabel>,
    rule: UpdateRule,
    boundary: BoundaryMode,
    mode: UpdateMode,
    grid: Grid,
    rng: SimRng,
    tick: Tick,
    totals: TickReport,
}

impl Simulation {
    /// Build a session with a freshly randomized grid
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let palette = config.palette()?;
        let (rows, cols) = config.dimensions()?;
        let mut rng = match config.simulation.seed {
            Some(seed) => SimRng::seeded(seed),
            None => SimRng::from_entropy(),
        };
        let grid = Grid::random(rows, cols, &palette, &mut rng)?;

        tracing::info!(
            "Created {}x{} grid with {} colors (policy {}, {} edges, seed {:?})",
            rows,
            cols,
            palette.len(),
            config.simulation.policy,
            config.simulation.boundary(),
            config.simulation.seed
        );

        Ok(Self::assemble(config, palette, grid, rng))
    }

    /// Build a session around an existing grid
    ///
    /// Every cell must hold a label from the configured palette. The
    /// configured dimensions are ignored in favor of the grid's own.
    pub fn from_grid(config: SimulationConfig, grid: Grid) -> Result<Self> {
        config.validate()?;
        let palette = config.palette()?;
        if let Some(cell) = grid.cells().iter().find(|cell| palette.get(cell.color).is_none()) {
            return Err(TideError::domain(format!(
                "grid holds color {:?} outside the {}-color palette",
                cell.color,
                palette.len()
            )));
        }
        let rng = match config.simulation.seed {
            Some(seed) => SimRng::seeded(seed),
            None => SimRng::from_entropy(),
        };
        Ok(Self::assemble(config, palette, grid, rng))
    }

    fn assemble(config: SimulationConfig, palette: Palette, grid: Grid, rng: SimRng) -> Self {
        let settings = &config.simulation;
        Self {
            labels: palette.labels(),
            rule: UpdateRule::new(settings.policy, settings.rule_params()),
            boundary: settings.boundary(),
            mode: settings.update_mode,
            palette,
            grid,
            rng,
            tick: 0,
            totals: TickReport::default(),
            config,
        }
    }

    /// Run one tick
    pub fn step(&mut self) -> Result<TickReport> {
        let report = step(
            &mut self.grid,
            &self.rule,
            self.boundary,
            self.mode,
            &self.labels,
            &mut self.rng,
        )?;
        self.tick += 1;
        self.accumulate(&report);

        tracing::debug!(
            tick = self.tick,
            changed = report.changed,
            taken_over = report.taken_over,
            preserved = report.preserved,
            mutated = report.mutated,
            "tick complete"
        );
        Ok(report)
    }

    /// Replace the grid with a fresh random one and restart the tick count
    pub fn reset(&mut self) -> Result<()> {
        self.grid = Grid::random(self.grid.rows(), self.grid.cols(), &self.palette, &mut self.rng)?;
        self.tick = 0;
        self.totals = TickReport::default();
        tracing::info!("Simulation reset");
        Ok(())
    }

    fn accumulate(&mut self, report: &TickReport) {
        self.totals.visited += report.visited;
        self.totals.preserved += report.preserved;
        self.totals.mutated += report.mutated;
        self.totals.taken_over += report.taken_over;
        self.totals.changed += report.changed;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn rule(&self) -> &UpdateRule {
        &self.rule
    }

    pub fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    pub fn update_mode(&self) -> UpdateMode {
        self.mode
    }

    /// Ticks completed since creation or the last reset
    pub fn tick_count(&self) -> Tick {
        self.tick
    }

    /// Counters summed over every tick since creation or the last reset
    pub fn totals(&self) -> &TickReport {
        &self.totals
    }

    pub fn census(&self) -> ColorCensus {
        ColorCensus::of_grid(&self.grid)
    }

    pub fn shares(&self) -> Result<ColorShares> {
        self.census().normalize(self.grid.len())
    }

    /// Paint commands for the current grid at the configured cell size
    pub fn frame(&self) -> Result<Vec<FillRect>> {
        frame_commands(&self.grid, &self.palette, self.config.grid.cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::rule::UpdatePolicy;

    fn small_config(seed: u64) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.grid.rows = Some(8);
        config.grid.cols = Some(10);
        config.simulation.seed = Some(seed);
        config
    }

    #[test]
    fn test_new_builds_configured_grid() {
        let sim = Simulation::new(small_config(1)).unwrap();
        assert_eq!(sim.grid().rows(), 8);
        assert_eq!(sim.grid().cols(), 10);
        assert_eq!(sim.tick_count(), 0);
        assert_eq!(sim.census().total(), 80);
        assert!(sim.grid().cells().iter().all(|cell| sim.palette().get(cell.color).is_some()));
    }

    #[test]
    fn test_step_counts_ticks_and_totals() {
        let mut sim = Simulation::new(small_config(2)).unwrap();
        for _ in 0..3 {
            let report = sim.step().unwrap();
            assert_eq!(report.visited, 80);
        }
        assert_eq!(sim.tick_count(), 3);
        assert_eq!(sim.totals().visited, 240);
    }

    #[test]
    fn test_reset_replaces_grid() {
        let mut sim = Simulation::new(small_config(3)).unwrap();
        let _ = sim.step().unwrap();
        sim.reset().unwrap();
        assert_eq!(sim.tick_count(), 0);
        assert_eq!(sim.totals(), &TickReport::default());
        assert_eq!(sim.grid().len(), 80);
    }

    #[test]
    fn test_same_seed_same_history() {
        let mut first = Simulation::new(small_config(77)).unwrap();
        let mut second = Simulation::new(small_config(77)).unwrap();
        for _ in 0..4 {
            assert_eq!(first.step().unwrap(), second.step().unwrap());
        }
        assert_eq!(first.grid(), second.grid());
    }

    #[test]
    fn test_policy_sets_default_boundary() {
        let mut config = small_config(4);
        config.simulation.policy = UpdatePolicy::Regressive;
        let sim = Simulation::new(config).unwrap();
        assert_eq!(sim.boundary(), BoundaryMode::Wrapped);
    }

    #[test]
    fn test_from_grid_rejects_foreign_colors() {
        let grid = Grid::filled(3, 3, ColorLabel(9)).unwrap();
        let result = Simulation::from_grid(small_config(5), grid);
        assert!(matches!(result, Err(TideError::Domain(_))));
    }

    #[test]
    fn test_frame_covers_every_cell() {
        let sim = Simulation::new(small_config(6)).unwrap();
        let frame = sim.frame().unwrap();
        assert_eq!(frame.len(), 80);
        assert!(frame.iter().all(|rect| rect.size == 5));
    }
}
