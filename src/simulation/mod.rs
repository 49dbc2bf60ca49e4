//! Automaton state transitions: census, update rule, tick driver and session

pub mod census;
pub mod output;
pub mod random;
pub mod rule;
pub mod scheduler;
pub mod session;
pub mod tick;

pub use census::{ColorCensus, ColorShares};
pub use output::{ColorStat, SimulationSummary};
pub use random::{RandomSource, SimRng};
pub use rule::{CellDecision, RuleParams, UpdatePolicy, UpdateRule};
pub use scheduler::{run, IntervalTicker, ManualTicker, Ticker};
pub use session::Simulation;
pub use tick::{step, TickReport, UpdateMode};
