use pitch_bot::StrategyKind;
use pitch_core::model::player::PlayerPosition;
use pitch_core::model::suit::Suit;
use pitch_core::Bid;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_REPORT_TOP: usize = 10;
const SEATS: usize = 4;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root simulation configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimulationConfig {
    pub run_id: String,
    pub simulation: RunSettings,
    #[serde(default)]
    pub bid: BidConfig,
    #[serde(default = "default_strategies")]
    pub strategies: Vec<String>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: SimulationConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.simulation.validate()?;
        self.bid.validate()?;
        validate_strategies(&self.strategies)?;
        self.outputs.validate(&self.run_id)?;
        self.report.validate()?;
        self.logging.normalize();
        Ok(())
    }

    /// Strategy kinds in seat order. Unknown names are skipped; `validate`
    /// rejects them up front.
    pub fn strategy_kinds(&self) -> Vec<StrategyKind> {
        self.strategies
            .iter()
            .filter_map(|name| StrategyKind::from_name(name))
            .collect()
    }

    /// Resolve output templates (`{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        let summary_md = resolve_template(&self.run_id, &self.outputs.summary_md);
        ResolvedOutputs {
            snapshot_csv: resolve_template(&self.run_id, &self.outputs.snapshot_csv),
            summary_json: summary_md.with_extension("json"),
            summary_md,
            html_dir: self
                .outputs
                .html_dir
                .as_deref()
                .map(|dir| resolve_template(&self.run_id, dir)),
        }
    }
}

/// How many rounds to play and on how many threads.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RunSettings {
    pub rounds: usize,
    /// Zero means one worker per available core.
    #[serde(default)]
    pub workers: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Write the snapshot every this many rounds; zero only writes it at the end.
    #[serde(default)]
    pub snapshot_every: usize,
}

impl RunSettings {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.rounds == 0 {
            return Err(ValidationError::InvalidField {
                field: "simulation.rounds".to_string(),
                message: "number of rounds must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// The fixed bid every round starts from.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct BidConfig {
    #[serde(default = "default_bidder")]
    pub bidder: PlayerPosition,
    #[serde(default = "default_trump")]
    pub trump: Suit,
}

impl Default for BidConfig {
    fn default() -> Self {
        Self {
            bidder: default_bidder(),
            trump: default_trump(),
        }
    }
}

impl BidConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.trump == Suit::Joker {
            return Err(ValidationError::InvalidField {
                field: "bid.trump".to_string(),
                message: "trump must be clubs, diamonds, hearts or spades".to_string(),
            });
        }
        Ok(())
    }

    pub fn to_bid(self) -> Bid {
        Bid::new(self.bidder, self.trump)
    }
}

fn default_bidder() -> PlayerPosition {
    PlayerPosition::North
}

fn default_trump() -> Suit {
    Suit::Hearts
}

fn default_strategies() -> Vec<String> {
    vec![StrategyKind::Simple.name().to_string(); SEATS]
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub snapshot_csv: String,
    pub summary_md: String,
    #[serde(default)]
    pub html_dir: Option<String>,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        let mut entries = vec![
            ("outputs.snapshot_csv", self.snapshot_csv.as_str()),
            ("outputs.summary_md", self.summary_md.as_str()),
        ];
        if let Some(html_dir) = self.html_dir.as_deref() {
            entries.push(("outputs.html_dir", html_dir));
        }

        for (label, value) in entries {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReportConfig {
    /// Hands listed in each summary table.
    #[serde(default = "default_report_top")]
    pub top: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top: DEFAULT_REPORT_TOP,
        }
    }
}

impl ReportConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.top == 0 {
            return Err(ValidationError::InvalidField {
                field: "report.top".to_string(),
                message: "report must list at least one hand".to_string(),
            });
        }
        Ok(())
    }
}

fn default_report_top() -> usize {
    DEFAULT_REPORT_TOP
}

/// Logging configuration defaults to compact logs on stderr.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_strategies(strategies: &[String]) -> Result<(), ValidationError> {
    if strategies.len() != SEATS {
        return Err(ValidationError::InvalidField {
            field: "strategies".to_string(),
            message: format!(
                "exactly {SEATS} strategies are required, found {}",
                strategies.len()
            ),
        });
    }

    for (index, name) in strategies.iter().enumerate() {
        if StrategyKind::from_name(name).is_none() {
            let known = StrategyKind::ALL
                .iter()
                .map(|kind| kind.name())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ValidationError::InvalidField {
                field: format!("strategies[{index}]"),
                message: format!("unknown strategy '{name}' (known: {known})"),
            });
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub snapshot_csv: PathBuf,
    pub summary_md: PathBuf,
    /// Machine-readable twin of the markdown summary.
    pub summary_json: PathBuf,
    pub html_dir: Option<PathBuf>,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
