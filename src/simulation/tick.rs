//! Tick driver: one randomized pass over every cell
//!
//! Cells are visited in a fresh random order each tick so no position
//! consistently acts before its neighbors. In the default in-place mode
//! each write is visible immediately, so cells visited later in the same
//! tick may react to neighbors that already changed. Double-buffered mode
//! reads every neighborhood from the pre-tick state instead, which slows
//! propagation and changes how quickly colors converge.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::ColorLabel;
use crate::simulation::census::ColorCensus;
use crate::simulation::random::{shuffled_indices, RandomSource};
use crate::simulation::rule::{CellDecision, UpdateRule};
use crate::spatial::grid::{BoundaryMode, Grid};

/// How writes within a tick become visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Writes land immediately; later visits observe them
    #[default]
    InPlace,
    /// Decisions read the pre-tick snapshot; writes apply to the next state
    DoubleBuffered,
}

/// Counters describing one completed tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub visited: usize,
    pub preserved: usize,
    pub mutated: usize,
    pub taken_over: usize,
    /// Cells whose color actually differs after the write
    pub changed: usize,
}

impl TickReport {
    fn record(&mut self, decision: CellDecision, previous: ColorLabel) {
        self.visited += 1;
        match decision {
            CellDecision::Unchanged => {}
            CellDecision::Preserved => self.preserved += 1,
            CellDecision::Mutated(_) => self.mutated += 1,
            CellDecision::TakenOver(_) => self.taken_over += 1,
        }
        if decision.new_color().is_some_and(|color| color != previous) {
            self.changed += 1;
        }
    }
}

/// Advance `grid` by one tick.
///
/// Whole-grid shares are computed once up front for weighted policies.
/// An error aborts the tick immediately; cells already visited keep their
/// new colors.
pub fn step(
    grid: &mut Grid,
    rule: &UpdateRule,
    boundary: BoundaryMode,
    mode: UpdateMode,
    palette: &[ColorLabel],
    rng: &mut impl RandomSource,
) -> Result<TickReport> {
    let global = if rule.policy.is_weighted() {
        Some(ColorCensus::of_grid(grid).normalize(grid.len())?)
    } else {
        None
    };

    let order = shuffled_indices(rng, grid.len());
    let snapshot = match mode {
        UpdateMode::InPlace => None,
        UpdateMode::DoubleBuffered => Some(grid.clone()),
    };

    let mut report = TickReport::default();
    for index in order {
        let (row, col) = grid.coords_of(index)?;
        let source = snapshot.as_ref().unwrap_or(grid);

        let current = source.get(row, col)?.color;
        let neighbors = source.neighbors_of(row, col, boundary)?;
        let adjacent = ColorCensus::of(&neighbors);

        let decision = rule.decide(current, &adjacent, global.as_ref(), palette, rng)?;
        if let Some(color) = decision.new_color() {
            grid.set(row, col, color)?;
        }
        report.record(decision, current);
    }

    Ok(report)
}
