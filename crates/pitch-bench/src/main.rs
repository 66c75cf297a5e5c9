use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use pitch_bench::config::{ResolvedOutputs, SimulationConfig};
use pitch_bench::logging::init_logging;
use pitch_bench::simulation::SimulationRunner;
use pitch_core::AppInfo;

/// Monte Carlo harness that scores Pitch bid hands.
#[derive(Debug, Parser)]
#[command(
    name = "pitch-bench",
    author,
    version,
    about = "Plays many seeded Pitch rounds and tabulates points by bid hand"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/pitch.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of rounds to play.
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<usize>,

    /// Override the number of worker threads (0 = one per core).
    #[arg(long, value_name = "COUNT")]
    workers: Option<usize>,

    /// Override the RNG seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no rounds are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimulationConfig::from_path(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(rounds) = cli.rounds {
        config.simulation.rounds = rounds;
    }

    if let Some(workers) = cli.workers {
        config.simulation.workers = workers;
    }

    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let rounds = config.simulation.rounds;
    let workers = config.simulation.worker_count();
    let strategies = config.strategies.join(", ");

    let plural = |n: usize| if n == 1 { "" } else { "s" };
    println!(
        "{} {}: run '{run_id}': {rounds} round{} on {workers} worker{} [{strategies}]",
        AppInfo::name(),
        AppInfo::version(),
        plural(rounds),
        plural(workers)
    );

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = SimulationRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: simulation skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Simulation complete for '{run_id}': {} rounds, {} unique hands in {:.2}s (seed {})",
        summary.rounds_played,
        summary.unique_hands,
        summary.elapsed.as_secs_f64(),
        summary.seed
    );
    println!("Hand table: {}", summary.snapshot_path.display());
    println!("Summary: {}", summary.summary_path.display());
    println!("Summary (JSON): {}", summary.summary_json_path.display());
    if summary.snapshots_written > 0 {
        println!("Periodic snapshots written: {}", summary.snapshots_written);
    }
    if summary.html_pages > 0 {
        println!("Hand pages: {}", summary.html_pages);
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
