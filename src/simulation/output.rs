//! Run summary and serialization

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::simulation::session::Simulation;
use crate::simulation::tick::{TickReport, UpdateMode};

/// Final state of a run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub ticks: u64,
    pub rows: usize,
    pub cols: usize,
    pub policy: String,
    pub boundary: String,
    pub update_mode: UpdateMode,
    pub seed: Option<u64>,
    pub colors: Vec<ColorStat>,
    pub totals: TickReport,
    pub simulation_time_ms: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColorStat {
    pub name: String,
    pub count: u32,
    pub share: f64,
}

impl SimulationSummary {
    pub fn new(simulation: &Simulation, elapsed: Duration) -> Self {
        let grid = simulation.grid();
        let census = simulation.census();
        let total = grid.len().max(1) as f64;

        // Every palette color is listed, including extinct ones
        let palette = simulation.palette();
        let colors = palette
            .labels()
            .into_iter()
            .map(|label| {
                let count = census.count(label);
                ColorStat {
                    name: palette.name(label).unwrap_or_default().to_string(),
                    count,
                    share: count as f64 / total,
                }
            })
            .collect();

        Self {
            ticks: simulation.tick_count(),
            rows: grid.rows(),
            cols: grid.cols(),
            policy: simulation.rule().policy.to_string(),
            boundary: simulation.boundary().to_string(),
            update_mode: simulation.update_mode(),
            seed: simulation.config().simulation.seed,
            colors,
            totals: *simulation.totals(),
            simulation_time_ms: elapsed.as_millis() as u64,
        }
    }

    /// Colors that still hold at least one cell
    pub fn surviving(&self) -> usize {
        self.colors.iter().filter(|c| c.count > 0).count()
    }

    /// Color with the most cells, if any
    pub fn leader(&self) -> Option<&ColorStat> {
        self.colors
            .iter()
            .filter(|c| c.count > 0)
            .fold(None, |best: Option<&ColorStat>, c| match best {
                Some(b) if b.count >= c.count => Some(b),
                _ => Some(c),
            })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        let leader = self
            .leader()
            .map(|c| format!("{} leads with {:.1}%", c.name, c.share * 100.0))
            .unwrap_or_else(|| "no colors remain".to_string());
        format!(
            "Simulated {} ticks on a {}x{} grid ({} policy, {} edges) in {}ms\n{} of {} colors survive, {}; {} cells changed",
            self.ticks,
            self.rows,
            self.cols,
            self.policy,
            self.boundary,
            self.simulation_time_ms,
            self.surviving(),
            self.colors.len(),
            leader,
            self.totals.changed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::ColorLabel;
    use crate::spatial::grid::Grid;

    #[test]
    fn test_summary_lists_extinct_colors() {
        let mut config = SimulationConfig::default();
        config.simulation.seed = Some(5);
        let grid = Grid::from_rows(vec![
            vec![ColorLabel(0), ColorLabel(0), ColorLabel(1)],
            vec![ColorLabel(0), ColorLabel(1), ColorLabel(1)],
        ])
        .unwrap();
        let sim = Simulation::from_grid(config, grid).unwrap();
        let summary = SimulationSummary::new(&sim, Duration::from_millis(12));

        assert_eq!(summary.colors.len(), 5);
        assert_eq!(summary.surviving(), 2);
        assert_eq!(summary.colors[0].name, "green");
        assert_eq!(summary.colors[0].count, 3);
        assert!((summary.colors[1].share - 0.5).abs() < 1e-9);
        assert_eq!(summary.colors[4].count, 0);
        assert_eq!(summary.simulation_time_ms, 12);
        // Ties go to the earlier palette entry
        assert_eq!(summary.leader().map(|c| c.name.as_str()), Some("green"));
    }

    #[test]
    fn test_json_round_trips_fields() {
        let mut config = SimulationConfig::default();
        config.grid.rows = Some(4);
        config.grid.cols = Some(4);
        config.simulation.seed = Some(9);
        let mut sim = Simulation::new(config).unwrap();
        let _ = sim.step().unwrap();

        let json = SimulationSummary::new(&sim, Duration::ZERO).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ticks"], 1);
        assert_eq!(value["policy"], "plain");
        assert_eq!(value["boundary"], "clamped");
        assert_eq!(value["update_mode"], "in_place");
        assert_eq!(value["totals"]["visited"], 16);
        assert!(SimulationSummary::new(&sim, Duration::ZERO).summary().contains("4x4"));
    }
}
