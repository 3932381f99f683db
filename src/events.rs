//! Append-only audit log of a research run.
//!
//! Every artifact written and every report checked adds one JSON object to
//! `<output_dir>/events.ndjson`:
//!
//! ```text
//! {"ts":"2026-03-09T10:15:02.114Z","action":"prompt_written","actor":"kim@desk","target":"phase_1/A/1","details":{...}}
//! ```
//!
//! `target` is the `phase/theme/step` the event concerns and is omitted when
//! there is none (a `check` of an arbitrary file).

use crate::error::{BsrsError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the event log inside the output directory.
pub const EVENTS_FILE: &str = "events.ndjson";

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    PromptWritten,
    ReportRecorded,
    ReportChecked,
}

impl EventAction {
    pub fn as_str(self) -> &'static str {
        match self {
            EventAction::PromptWritten => "prompt_written",
            EventAction::ReportRecorded => "report_recorded",
            EventAction::ReportChecked => "report_checked",
        }
    }
}

#[derive(Serialize)]
struct EventLine<'a> {
    ts: DateTime<Utc>,
    action: EventAction,
    actor: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<&'a str>,
    details: &'a Value,
}

/// The event log of one output directory.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
    actor: String,
}

impl EventLog {
    /// Log living in `output_dir`, attributed to the current `user@host`.
    pub fn new(output_dir: &Path) -> Self {
        Self {
            path: output_dir.join(EVENTS_FILE),
            actor: actor_string(),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line, creating the output directory and log as needed.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The line was written and synced
    /// * `Err(BsrsError::OutputWrite)` - The log could not be written
    pub fn append(&self, action: EventAction, target: Option<&str>, details: Value) -> Result<()> {
        let line = serde_json::to_string(&EventLine {
            ts: Utc::now(),
            action,
            actor: &self.actor,
            target,
            details: &details,
        })
        .map_err(|e| BsrsError::output(&self.path, format!("failed to serialize event: {}", e)))?;

        if let Some(dir) = self.path.parent()
            && !dir.exists()
        {
            fs::create_dir_all(dir).map_err(|e| {
                BsrsError::output(&self.path, format!("failed to create output directory: {}", e))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| BsrsError::output(&self.path, format!("failed to open event log: {}", e)))?;
        writeln!(file, "{}", line)
            .and_then(|()| file.sync_all())
            .map_err(|e| BsrsError::output(&self.path, format!("failed to write event: {}", e)))?;

        tracing::debug!(action = action.as_str(), target, "logged event");
        Ok(())
    }
}

fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}
