//! Per-hand score histograms shared by all simulation workers.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Buckets for 0 through 10 points; higher scores land in the last bucket.
pub const POINT_BUCKETS: usize = 11;
const MAX_POINTS: usize = POINT_BUCKETS - 1;

/// Histogram of bidder-team scores for one hand signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationRow {
    token: String,
    buckets: [u64; POINT_BUCKETS],
}

impl SimulationRow {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_buckets(token, [0; POINT_BUCKETS])
    }

    pub fn with_buckets(token: impl Into<String>, buckets: [u64; POINT_BUCKETS]) -> Self {
        Self {
            token: token.into(),
            buckets,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn record(&mut self, points: u32) {
        let bucket = usize::try_from(points).map_or(MAX_POINTS, |p| p.min(MAX_POINTS));
        self.buckets[bucket] += 1;
    }

    pub fn count(&self) -> u64 {
        self.buckets.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        let weighted: u64 = self
            .buckets
            .iter()
            .enumerate()
            .map(|(points, &n)| points as u64 * n)
            .sum();
        weighted as f64 / count as f64
    }

    /// Share of rounds that scored exactly `points`.
    pub fn probability(&self, points: usize) -> f64 {
        let count = self.count();
        if count == 0 || points > MAX_POINTS {
            return 0.0;
        }
        self.buckets[points] as f64 / count as f64
    }

    /// Share of rounds that scored `points` or more.
    pub fn cumulative_probability(&self, points: usize) -> f64 {
        (points..=MAX_POINTS)
            .map(|p| self.probability(p))
            .sum()
    }

    /// The most points reached with probability greater than `p`, scanning
    /// from the top bucket down.
    pub fn points_at_percentile(&self, p: f64) -> usize {
        let count = self.count();
        if count == 0 {
            return 0;
        }
        let mut seen = 0u64;
        for points in (0..=MAX_POINTS).rev() {
            let through = seen + self.buckets[points];
            if through as f64 / count as f64 > p {
                return points;
            }
            seen = through;
        }
        0
    }

    pub fn median(&self) -> usize {
        self.points_at_percentile(0.5)
    }

    /// `signature,count,mean,b0,...,b10`
    pub fn csv_line(&self) -> String {
        let mut line = format!("{},{},{:.2}", self.token, self.count(), self.mean());
        for bucket in &self.buckets {
            line.push(',');
            line.push_str(&bucket.to_string());
        }
        line
    }
}

/// All rows of a run, keyed and ordered by hand signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationData {
    rows: BTreeMap<String, SimulationRow>,
}

impl SimulationData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, token: &str, points: u32) {
        self.rows
            .entry(token.to_string())
            .or_insert_with(|| SimulationRow::new(token))
            .record(points);
    }

    pub fn rows(&self) -> impl Iterator<Item = &SimulationRow> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_rounds(&self) -> u64 {
        self.rows.values().map(SimulationRow::count).sum()
    }

    /// Highest mean first; ties broken by signature.
    pub fn top_by_mean(&self, n: usize) -> Vec<&SimulationRow> {
        let mut rows: Vec<&SimulationRow> = self.rows.values().collect();
        rows.sort_by(|a, b| b.mean().total_cmp(&a.mean()).then_with(|| a.token.cmp(&b.token)));
        rows.truncate(n);
        rows
    }

    /// Most frequent first; ties broken by signature.
    pub fn top_by_count(&self, n: usize) -> Vec<&SimulationRow> {
        let mut rows: Vec<&SimulationRow> = self.rows.values().collect();
        rows.sort_by(|a, b| b.count().cmp(&a.count()).then_with(|| a.token.cmp(&b.token)));
        rows.truncate(n);
        rows
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for row in self.rows.values() {
            out.push_str(&row.csv_line());
            out.push('\n');
        }
        out
    }

    pub fn write_csv(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_csv())
    }
}

/// Thread-safe collector. Workers call [`Aggregator::record`] once per round;
/// the lock only covers the histogram update and, at snapshot boundaries,
/// the clone handed back to the caller for writing.
#[derive(Debug)]
pub struct Aggregator {
    data: Mutex<SimulationData>,
    snapshot_every: u64,
}

impl Aggregator {
    /// `snapshot_every == 0` disables periodic snapshots.
    pub fn new(snapshot_every: u64) -> Self {
        Self {
            data: Mutex::new(SimulationData::new()),
            snapshot_every,
        }
    }

    /// Records one round. Returns a copy of the data when this round completes
    /// a snapshot interval.
    pub fn record(&self, token: &str, points: u32) -> Option<SimulationData> {
        let mut data = self.data.lock();
        data.add(token, points);
        let due = self.snapshot_every > 0 && data.total_rounds() % self.snapshot_every == 0;
        due.then(|| data.clone())
    }

    pub fn into_data(self) -> SimulationData {
        self.data.into_inner()
    }
}
