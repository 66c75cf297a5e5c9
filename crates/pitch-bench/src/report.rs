use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::aggregate::{POINT_BUCKETS, SimulationData, SimulationRow};

const CONFIDENCE_LEVELS: [f64; 11] = [0.99, 0.95, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1];
const EMPTY_HAND_LABEL: &str = "(no trump)";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandSummary {
    pub signature: String,
    pub rounds: u64,
    pub mean: f64,
    pub median: usize,
}

impl HandSummary {
    fn from_row(row: &SimulationRow) -> Self {
        Self {
            signature: row.token().to_string(),
            rounds: row.count(),
            mean: row.mean(),
            median: row.median(),
        }
    }
}

/// Headline numbers of a run, rendered to markdown and JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub rounds: u64,
    pub unique_hands: usize,
    pub best_hands: Vec<HandSummary>,
    pub common_hands: Vec<HandSummary>,
}

impl RunReport {
    pub fn from_data(run_id: &str, data: &SimulationData, top: usize) -> Self {
        Self {
            run_id: run_id.to_string(),
            rounds: data.total_rounds(),
            unique_hands: data.len(),
            best_hands: data
                .top_by_mean(top)
                .into_iter()
                .map(HandSummary::from_row)
                .collect(),
            common_hands: data
                .top_by_count(top)
                .into_iter()
                .map(HandSummary::from_row)
                .collect(),
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Pitch Simulation Summary\n\n");
        let _ = writeln!(out, "Run: `{}`\n", self.run_id);
        let _ = writeln!(out, "Rounds played: {}\n", self.rounds);
        let _ = writeln!(out, "Unique hands: {}\n", self.unique_hands);

        out.push_str("## Best hands\n\n");
        push_table(&mut out, &self.best_hands);
        out.push_str("\n## Most common hands\n\n");
        push_table(&mut out, &self.common_hands);
        out
    }

    pub fn write_markdown(&self, path: &Path) -> Result<(), ReportError> {
        ensure_parent(path)?;
        fs::write(path, self.to_markdown()).map_err(|source| ReportError::Io {
            context: "writing summary markdown",
            source,
        })
    }

    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        ensure_parent(path)?;
        let body = serde_json::to_string_pretty(self)?;
        fs::write(path, body).map_err(|source| ReportError::Io {
            context: "writing summary json",
            source,
        })
    }
}

fn push_table(out: &mut String, hands: &[HandSummary]) {
    out.push_str("| Hand | Rounds | Mean | Median |\n");
    out.push_str("|------|--------|------|--------|\n");
    for hand in hands {
        let _ = writeln!(
            out,
            "| {} | {} | {:.2} | {} |",
            display_token(&hand.signature),
            hand.rounds,
            hand.mean,
            hand.median
        );
    }
}

fn display_token(token: &str) -> &str {
    if token.is_empty() {
        EMPTY_HAND_LABEL
    } else {
        token
    }
}

/// File name for a hand's page: spaces become underscores.
pub fn hand_file_name(token: &str) -> String {
    if token.is_empty() {
        return "no_trump.html".to_string();
    }
    format!("{}.html", token.replace(' ', "_"))
}

/// One page per hand: average, median, confidence table and per-point odds.
pub fn render_hand_html(row: &SimulationRow) -> String {
    let title = display_token(row.token());
    let mut out = String::new();
    out.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>Pitch - {title}</title>");
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h1>{title}</h1>");
    out.push_str("<table border=\"1\" cellspacing=\"0\" cellpadding=\"8\">\n");
    push_row(&mut out, "Average", &format!("{:.2}", row.mean()));
    push_row(&mut out, "Median", &row.median().to_string());

    push_heading(&mut out, "Confidence Intervals");
    for confidence in CONFIDENCE_LEVELS {
        push_row(
            &mut out,
            &format!("{:.0}% Confidence", confidence * 100.0),
            &row.points_at_percentile(confidence).to_string(),
        );
    }

    push_heading(&mut out, "Probability of Points (Cumulative)");
    for points in (0..POINT_BUCKETS).rev() {
        let label = if points == 1 { "Point" } else { "Points" };
        push_row(
            &mut out,
            &format!("{points} {label}"),
            &format!(
                "{:.1}% ({:.1}%)",
                row.probability(points) * 100.0,
                row.cumulative_probability(points) * 100.0
            ),
        );
    }

    push_heading(&mut out, "Trivia");
    push_row(&mut out, "Data Points", &row.count().to_string());
    out.push_str("</table>\n</body>\n</html>\n");
    out
}

fn push_row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        out,
        "<tr>\n<td>{label}</td>\n<td align=\"right\">{value}</td>\n</tr>"
    );
}

fn push_heading(out: &mut String, label: &str) {
    let _ = writeln!(
        out,
        "<tr>\n<td colspan=\"2\"><strong>{label}</strong></td>\n</tr>"
    );
}

/// Writes a page for every hand into `dir`; returns the paths written.
pub fn write_hand_pages(data: &SimulationData, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        context: "creating html directory",
        source,
    })?;

    let mut written = Vec::with_capacity(data.len());
    for row in data.rows() {
        let path = dir.join(hand_file_name(row.token()));
        fs::write(&path, render_hand_html(row)).map_err(|source| ReportError::Io {
            context: "writing hand page",
            source,
        })?;
        written.push(path);
    }
    Ok(written)
}

fn ensure_parent(path: &Path) -> Result<(), ReportError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| ReportError::Io {
            context: "creating report directory",
            source,
        })?;
    }
    Ok(())
}
