//! Tick scheduling
//!
//! The driving loop asks a [`Ticker`] for permission before every step.
//! Tests use [`ManualTicker`] to run an exact number of ticks without
//! waiting; the binary uses [`IntervalTicker`] for wall-clock pacing.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::core::error::Result;
use crate::simulation::session::Simulation;
use crate::simulation::tick::TickReport;

/// Source of tick signals
#[allow(async_fn_in_trait)]
pub trait Ticker {
    /// Wait for the next tick. Returns `false` once the ticker has stopped.
    async fn next_tick(&mut self) -> bool;

    /// Stop issuing ticks
    fn stop(&mut self);
}

/// Fires a fixed number of ticks immediately
#[derive(Debug, Clone)]
pub struct ManualTicker {
    remaining: u64,
}

impl ManualTicker {
    pub fn new(ticks: u64) -> Self {
        Self { remaining: ticks }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Ticker for ManualTicker {
    async fn next_tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    fn stop(&mut self) {
        self.remaining = 0;
    }
}

/// Fires once per period, optionally a limited number of times
///
/// The first tick fires one full period after the first call, matching a
/// page timer that draws the initial grid and then waits. A tick that
/// overruns delays the following ones rather than causing a burst.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    limit: Option<u64>,
    fired: u64,
    stopped: bool,
    interval: Option<Interval>,
}

impl IntervalTicker {
    pub fn new(period: Duration, limit: Option<u64>) -> Self {
        Self {
            period,
            limit,
            fired: 0,
            stopped: false,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }
}

impl Ticker for IntervalTicker {
    async fn next_tick(&mut self) -> bool {
        if self.stopped || self.limit.is_some_and(|limit| self.fired >= limit) {
            return false;
        }

        // Created lazily so construction does not need a running runtime
        let period = self.period;
        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        let _ = interval.tick().await;

        self.fired += 1;
        true
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Step `simulation` on every tick and hand each frame to `on_frame`.
///
/// Runs until the ticker stops or a step or callback fails. Returns the
/// number of ticks completed.
pub async fn run<T, F>(simulation: &mut Simulation, ticker: &mut T, mut on_frame: F) -> Result<u64>
where
    T: Ticker,
    F: FnMut(&Simulation, &TickReport) -> Result<()>,
{
    let mut completed = 0;
    while ticker.next_tick().await {
        let report = match simulation.step() {
            Ok(report) => report,
            Err(e) => {
                ticker.stop();
                tracing::warn!("Tick {} aborted: {}", simulation.tick_count() + 1, e);
                return Err(e);
            }
        };
        on_frame(simulation, &report)?;
        completed += 1;
    }
    Ok(completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::error::TideError;

    fn small_simulation() -> Simulation {
        let mut config = SimulationConfig::default();
        config.grid.rows = Some(6);
        config.grid.cols = Some(6);
        config.simulation.seed = Some(8);
        Simulation::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_manual_ticker_runs_exact_count() {
        let mut sim = small_simulation();
        let mut ticker = ManualTicker::new(4);
        let mut frames = 0;
        let completed = run(&mut sim, &mut ticker, |_, _| {
            frames += 1;
            Ok(())
        })
        .await
        .unwrap();
        assert_eq!(completed, 4);
        assert_eq!(frames, 4);
        assert_eq!(sim.tick_count(), 4);
        assert_eq!(ticker.remaining(), 0);
    }

    #[tokio::test]
    async fn test_stopped_ticker_yields_nothing() {
        let mut ticker = ManualTicker::new(10);
        ticker.stop();
        assert!(!ticker.next_tick().await);
    }

    #[tokio::test]
    async fn test_callback_error_stops_run() {
        let mut sim = small_simulation();
        let mut ticker = ManualTicker::new(5);
        let result = run(&mut sim, &mut ticker, |sim, _| {
            if sim.tick_count() == 2 {
                Err(TideError::domain("renderer gave up"))
            } else {
                Ok(())
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(sim.tick_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticker_paces_and_limits() {
        let mut ticker = IntervalTicker::new(Duration::from_millis(500), Some(3));
        let start = Instant::now();
        let mut ticks = 0;
        while ticker.next_tick().await {
            ticks += 1;
        }
        assert_eq!(ticks, 3);
        assert_eq!(ticker.fired(), 3);
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticker_stop() {
        let mut ticker = IntervalTicker::new(Duration::from_millis(10), None);
        assert!(ticker.next_tick().await);
        ticker.stop();
        assert!(!ticker.next_tick().await);
    }
}
