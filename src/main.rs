//! Color Tide - Entry Point
//!
//! Loads a configuration, runs the automaton on a tick schedule and writes
//! PNG frames plus a run summary.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use tokio::runtime::Builder;

use color_tide::core::config::SimulationConfig;
use color_tide::core::error::Result;
use color_tide::render::Raster;
use color_tide::simulation::{
    run, IntervalTicker, ManualTicker, Simulation, SimulationSummary, TickReport, Ticker,
    UpdatePolicy,
};
use color_tide::spatial::BoundaryMode;

/// Neighbor-majority color takeover automaton
#[derive(Parser, Debug)]
#[command(name = "color-tide")]
#[command(about = "Run a color takeover cellular automaton and render its frames")]
struct Args {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(long, default_value_t = 100)]
    ticks: u64,

    /// Self-preservation policy: none, progressive, regressive or random
    #[arg(long)]
    policy: Option<String>,

    /// Edge behavior: clamped or wrapped
    #[arg(long)]
    boundary: Option<String>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Directory to write one PNG per tick into
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Delay between ticks in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Write the final summary as JSON to this path
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Run ticks back to back instead of waiting for the interval
    #[arg(long)]
    no_wait: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("color_tide=info")),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    // Ticks are sequential; one thread drives both the timer and the grid
    let rt = Builder::new_current_thread().enable_all().build()?;
    let start = Instant::now();
    let mut simulation = Simulation::new(config)?;

    if let Some(dir) = &args.frames_dir {
        fs::create_dir_all(dir)?;
        write_frame(dir, &simulation)?;
    }

    let frames_dir = args.frames_dir.clone();
    let on_frame = |sim: &Simulation, _: &TickReport| match &frames_dir {
        Some(dir) => write_frame(dir, sim),
        None => Ok(()),
    };

    rt.block_on(async {
        if args.no_wait {
            let mut ticker = ManualTicker::new(args.ticks);
            drive(&mut simulation, &mut ticker, on_frame).await
        } else {
            let period = simulation.config().simulation.tick_interval();
            let mut ticker = IntervalTicker::new(period, Some(args.ticks));
            drive(&mut simulation, &mut ticker, on_frame).await
        }
    })?;

    let summary = SimulationSummary::new(&simulation, start.elapsed());
    tracing::info!("Completed {} of {} ticks", simulation.tick_count(), args.ticks);

    if let Some(path) = &args.summary_json {
        fs::write(path, summary.to_json())?;
        tracing::info!("Summary written to {}", path.display());
    }
    println!("{}", summary.summary());

    Ok(())
}

/// Run until the ticker stops or Ctrl-C arrives
async fn drive<T, F>(simulation: &mut Simulation, ticker: &mut T, on_frame: F) -> Result<()>
where
    T: Ticker,
    F: FnMut(&Simulation, &TickReport) -> Result<()>,
{
    tokio::select! {
        result = run(simulation, ticker, on_frame) => result.map(|_| ()),
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, stopping early");
            Ok(())
        }
    }
}

/// Start from the config file (or defaults) and apply command-line overrides
fn build_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            SimulationConfig::load(path)?
        }
        None => SimulationConfig::default(),
    };

    let settings = &mut config.simulation;
    if let Some(policy) = &args.policy {
        settings.policy = policy.parse::<UpdatePolicy>()?;
    }
    if let Some(boundary) = &args.boundary {
        settings.boundary = Some(boundary.parse::<BoundaryMode>()?);
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(ms) = args.interval_ms {
        settings.tick_interval_ms = ms;
    }

    config.validate()?;
    Ok(config)
}

fn write_frame(dir: &Path, simulation: &Simulation) -> Result<()> {
    let mut raster = Raster::for_grid(simulation.grid(), simulation.config().grid.cell_size)?;
    raster.paint(&simulation.frame()?)?;
    let path = dir.join(format!("frame_{:05}.png", simulation.tick_count()));
    raster.save(&path)?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
