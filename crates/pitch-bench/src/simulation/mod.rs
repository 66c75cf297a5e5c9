mod plan;

pub use plan::{WorkerPlan, plan_workers};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use pitch_bot::StrategyKind;
use pitch_core::game::strategy::PlayStrategy;
use parking_lot::Mutex;
use pitch_core::{EngineError, FixedBid, RoundEngine};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{Level, event};

use crate::aggregate::{Aggregator, SimulationData};
use crate::config::{ResolvedOutputs, SimulationConfig};
use crate::report::{ReportError, RunReport, write_hand_pages};

const SEATS: usize = 4;

/// Drives many rounds across a thread pool and writes the hand statistics.
pub struct SimulationRunner {
    config: SimulationConfig,
    outputs: ResolvedOutputs,
    strategies: Vec<StrategyKind>,
}

/// Summary details returned after a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub seed: u64,
    pub workers: usize,
    pub rounds_played: u64,
    pub unique_hands: usize,
    pub snapshots_written: u64,
    pub snapshot_path: PathBuf,
    pub summary_path: PathBuf,
    pub summary_json_path: PathBuf,
    pub html_pages: usize,
    pub elapsed: Duration,
}

impl SimulationRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: SimulationConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let strategies = config.strategy_kinds();
        if strategies.len() != SEATS {
            return Err(RunnerError::Strategy {
                message: format!(
                    "expected {SEATS} known strategies, resolved {} from {:?}",
                    strategies.len(),
                    config.strategies
                ),
            });
        }

        Ok(Self {
            config,
            outputs,
            strategies,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Plays every round, then writes the final snapshot and the reports.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        let settings = &self.config.simulation;
        let rounds = settings.rounds as u64;
        let seed = settings.seed.unwrap_or_else(rand::random);
        let plans = plan_workers(rounds, settings.worker_count(), seed);
        let workers = plans.len();

        event!(
            target: "pitch_bench::simulation",
            Level::INFO,
            run_id = %self.config.run_id,
            rounds,
            workers,
            seed,
            "starting simulation"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("pitch-sim-{index}"))
            .build()?;

        let aggregator = Aggregator::new(settings.snapshot_every as u64);
        let snapshots = SnapshotSink::new(&self.outputs.snapshot_csv);
        let started = Instant::now();

        pool.install(|| {
            plans
                .par_iter()
                .map(|plan| self.run_worker(plan, &aggregator, &snapshots))
                .collect::<Result<Vec<()>, RunnerError>>()
        })?;

        let elapsed = started.elapsed();
        let data = aggregator.into_data();
        data.write_csv(&self.outputs.snapshot_csv)?;

        let report = RunReport::from_data(&self.config.run_id, &data, self.config.report.top);
        report.write_markdown(&self.outputs.summary_md)?;
        report.write_json(&self.outputs.summary_json)?;

        let html_pages = match self.outputs.html_dir.as_deref() {
            Some(dir) => write_hand_pages(&data, dir)?.len(),
            None => 0,
        };

        event!(
            target: "pitch_bench::simulation",
            Level::INFO,
            rounds = data.total_rounds(),
            unique_hands = data.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "simulation complete"
        );

        Ok(RunSummary {
            run_id: self.config.run_id.clone(),
            seed,
            workers,
            rounds_played: data.total_rounds(),
            unique_hands: data.len(),
            snapshots_written: snapshots.written(),
            snapshot_path: self.outputs.snapshot_csv.clone(),
            summary_path: self.outputs.summary_md.clone(),
            summary_json_path: self.outputs.summary_json.clone(),
            html_pages,
            elapsed,
        })
    }

    fn build_engine(&self, seed: u64) -> Result<RoundEngine, RunnerError> {
        let strategies: Vec<Box<dyn PlayStrategy>> =
            self.strategies.iter().map(|kind| kind.build()).collect();
        let engine = RoundEngine::with_seed(strategies, seed)?
            .with_bid_policy(FixedBid::new(self.config.bid.to_bid()));
        Ok(engine)
    }

    fn run_worker(
        &self,
        plan: &WorkerPlan,
        aggregator: &Aggregator,
        snapshots: &SnapshotSink<'_>,
    ) -> Result<(), RunnerError> {
        let mut engine = self.build_engine(plan.seed)?;

        for _ in 0..plan.rounds {
            engine.reset_game();
            let outcome = engine.play_round()?;
            if let Some(snapshot) =
                aggregator.record(&outcome.bid_token, outcome.bidder_team_score())
            {
                write_periodic_snapshot(snapshots, plan.index, &snapshot);
            }
        }

        event!(
            target: "pitch_bench::simulation",
            Level::DEBUG,
            worker = plan.index,
            seed = engine.seed(),
            rounds = plan.rounds,
            strategies = ?engine.strategy_names(),
            "worker finished"
        );
        Ok(())
    }
}

/// Writes outside the aggregator lock; failures are logged and the run
/// carries on.
fn write_periodic_snapshot(sink: &SnapshotSink<'_>, worker: usize, data: &SimulationData) {
    match sink.publish(worker, data) {
        Ok(true) => {
            event!(
                target: "pitch_bench::simulation",
                Level::INFO,
                worker,
                rounds = data.total_rounds(),
                unique_hands = data.len(),
                "snapshot written"
            );
        }
        Ok(false) => {
            event!(
                target: "pitch_bench::simulation",
                Level::DEBUG,
                worker,
                rounds = data.total_rounds(),
                "newer snapshot already published; skipped"
            );
        }
        Err(err) => {
            tracing::warn!(
                target: "pitch_bench::simulation",
                worker,
                path = %sink.path.display(),
                error = %err,
                "failed to write snapshot"
            );
        }
    }
}

/// Periodic snapshot target shared by the workers. Each worker writes its own
/// staging file, then renames it over the target only when it holds more
/// rounds than the last published snapshot.
struct SnapshotSink<'a> {
    path: &'a Path,
    published: Mutex<u64>,
    written: AtomicU64,
}

impl<'a> SnapshotSink<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            published: Mutex::new(0),
            written: AtomicU64::new(0),
        }
    }

    /// Returns `Ok(false)` when a newer snapshot was already published.
    fn publish(&self, worker: usize, data: &SimulationData) -> io::Result<bool> {
        let rounds = data.total_rounds();
        let staging = self.path.with_extension(format!("csv.part{worker}"));
        data.write_csv(&staging)?;

        let mut published = self.published.lock();
        if rounds <= *published {
            drop(published);
            fs::remove_file(&staging)?;
            return Ok(false);
        }
        fs::rename(&staging, self.path)?;
        *published = rounds;
        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(true)
    }

    fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("engine failed: {0}")]
    Engine(#[from] EngineError),
    #[error("invalid strategy setup: {message}")]
    Strategy { message: String },
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("report failed: {0}")]
    Report(#[from] ReportError),
}
