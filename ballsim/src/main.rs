//! # Ball Simulator Runner
//!
//! Interactive console frontend for `ballsim_core`: loads (or defaults)
//! the configuration, draws a random off-center starting position, runs
//! the fixed-timestep control loop, and renders each tick as an ASCII
//! track line.
//!
//! Exit status contract:
//! - `0` — the ball converged (success message includes the settle time)
//! - `2` — the ball failed to converge within the time limit
//! - `1` — operational error (bad config, sampling exhaustion,
//!   non-finite state)

mod render;

use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

use ballsim_core::config::{SimConfig, load_config};
use ballsim_core::sampling::sample_initial_position;
use ballsim_core::sim::{RunOutcome, Simulation};
use render::TrackRenderer;

/// Exit status for a run that timed out (1 is reserved for operational
/// errors).
const EXIT_TIMED_OUT: i32 = 2;

/// Cascade PID ball-position simulator
#[derive(Parser, Debug)]
#[command(name = "ballsim")]
#[command(version)]
#[command(about = "Drive a displaced ball back to the reference with a cascade PID controller")]
struct Args {
    /// Path to simulator configuration TOML. Reference-scenario defaults
    /// apply when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for the initial-condition draw (entropy when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// End-of-tick delay [ms] throttling the visual output rate.
    /// 0 runs ticks back-to-back; presentation only, not control semantics.
    #[arg(long, default_value_t = 20)]
    tick_delay_ms: u64,

    /// Wait for ENTER before exiting.
    #[arg(long)]
    pause: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    println!("  <PID Simulation System>");
    println!("ballsim v{}", env!("CARGO_PKG_VERSION"));

    let status = match run(&args) {
        Ok(RunOutcome::Converged { settle_time }) => {
            println!("The BALL converges on REFERENCE in {settle_time:.2} seconds! Congratulations!");
            0
        }
        Ok(RunOutcome::TimedOut { elapsed }) => {
            println!("The BALL did not converge on REFERENCE within the time limit ({elapsed:.2} s elapsed).");
            EXIT_TIMED_OUT
        }
        Err(e) => {
            error!("FATAL: {e}");
            1
        }
    };

    if args.pause {
        wait_for_enter();
    }
    process::exit(status);
}

fn run(args: &Args) -> Result<RunOutcome, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            load_config(path)?
        }
        None => SimConfig::default(),
    };
    info!(
        "Config OK: dt={}s, band=±{}, hold={}s, limit={}s",
        config.run.dt, config.run.hold_band, config.run.hold_duration, config.run.time_limit,
    );

    let mut rng = match args.seed {
        Some(seed) => {
            debug!("Seeding initial-condition draw with {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let initial_position = sample_initial_position(&mut rng, &config.sampling)?;
    info!("Initial ball position: {initial_position:.2}");

    let mut sim = Simulation::new(&config, initial_position)?;
    let renderer = TrackRenderer::new(config.run.hold_band);
    let tick_budget = Duration::from_millis(args.tick_delay_ms);

    // The t = 0 frame, before any control action.
    println!("{}", renderer.line(&sim.snapshot()));

    loop {
        let frame_start = Instant::now();

        let report = sim.step()?;
        println!("{}", renderer.line(&report.snapshot));

        if let Some(outcome) = report.outcome {
            debug!("Terminal outcome after {} ticks", sim.ticks());
            return Ok(outcome);
        }

        // Sleep the remaining frame budget.
        if let Some(remaining) = tick_budget.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }
}

/// Block until the user presses ENTER.
fn wait_for_enter() {
    println!("Press ENTER to exit...");
    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
