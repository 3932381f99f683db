//! Report quality check.
//!
//! A pasted-back report starts at 100 points and loses points for each
//! shortfall against [`QualityThresholds`]. The score never drops below 0.

use crate::config::QualityThresholds;
use crate::error::{BsrsError, Result};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;

const LENGTH_PENALTY: u32 = 20;
const SECTION_PENALTY: u32 = 10;
const SOURCES_PENALTY: u32 = 15;
const CHARTS_PENALTY: u32 = 10;

/// A numbered reference line carrying a URL, e.g. `3. Statista https://...`.
static SOURCE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\d+\.\s+.*https?://").expect("Invalid source line regex")
});

/// One shortfall found in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityIssue {
    TooShort { chars: usize, min_chars: usize },
    MissingSection { section: String },
    TooFewSources { sources: usize, min_sources: usize },
    NoCharts,
}

impl QualityIssue {
    /// Points deducted for this issue.
    pub fn penalty(&self) -> u32 {
        match self {
            QualityIssue::TooShort { .. } => LENGTH_PENALTY,
            QualityIssue::MissingSection { .. } => SECTION_PENALTY,
            QualityIssue::TooFewSources { .. } => SOURCES_PENALTY,
            QualityIssue::NoCharts => CHARTS_PENALTY,
        }
    }
}

impl std::fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityIssue::TooShort { chars, min_chars } => {
                write!(f, "report is {} characters, expected at least {}", chars, min_chars)
            }
            QualityIssue::MissingSection { section } => {
                write!(f, "missing section '{}'", section)
            }
            QualityIssue::TooFewSources { sources, min_sources } => {
                write!(f, "{} cited source(s), expected at least {}", sources, min_sources)
            }
            QualityIssue::NoCharts => write!(f, "no chart image or table found"),
        }
    }
}

/// Outcome of checking one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub score: u32,
    pub pass_score: u32,
    pub passed: bool,
    pub chars: usize,
    pub sources: usize,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    /// `Err(QualityCheckFailed)` when the report scored below the threshold.
    pub fn ensure_passed(&self) -> Result<()> {
        if self.passed {
            return Ok(());
        }
        Err(BsrsError::QualityCheckFailed {
            score: self.score,
            threshold: self.pass_score,
        })
    }
}

/// Score `text` against `thresholds`.
pub fn check_report(text: &str, thresholds: &QualityThresholds) -> QualityReport {
    let mut issues = Vec::new();

    let chars = text.chars().count();
    if chars < thresholds.min_chars {
        issues.push(QualityIssue::TooShort {
            chars,
            min_chars: thresholds.min_chars,
        });
    }

    for section in &thresholds.required_sections {
        if !text.contains(section.as_str()) {
            issues.push(QualityIssue::MissingSection {
                section: section.clone(),
            });
        }
    }

    let sources = SOURCE_LINE.find_iter(text).count();
    if sources < thresholds.min_sources {
        issues.push(QualityIssue::TooFewSources {
            sources,
            min_sources: thresholds.min_sources,
        });
    }

    if thresholds.require_charts && !text.contains("![") && !text.contains('|') {
        issues.push(QualityIssue::NoCharts);
    }

    let penalty: u32 = issues.iter().map(QualityIssue::penalty).sum();
    let score = 100u32.saturating_sub(penalty);

    QualityReport {
        score,
        pass_score: thresholds.pass_score,
        passed: score >= thresholds.pass_score,
        chars,
        sources,
        issues,
    }
}

/// Read and score a report file.
pub fn check_report_file(path: &Path, thresholds: &QualityThresholds) -> Result<QualityReport> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        BsrsError::UserError(format!("failed to read report '{}': {}", path.display(), e))
    })?;
    let report = check_report(&text, thresholds);
    tracing::info!(path = %path.display(), score = report.score, passed = report.passed, "checked report");
    Ok(report)
}
