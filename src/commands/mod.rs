//! Command implementations for bsrs.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the output helpers they share.

mod check;
mod list;
mod prompt;
mod record;
mod scaffold;

use crate::cli::{Cli, Command};
use crate::context::Workspace;
use crate::error::Result;
use crate::events::EventAction;
use crate::quality::QualityReport;
use serde_json::Value;

/// Dispatch a command to its implementation.
///
/// The workspace is resolved once from the global path options and handed
/// to every command.
pub fn dispatch(cli: Cli) -> Result<()> {
    let ws = Workspace::resolve(&cli.global.overrides())?;

    match cli.command {
        Command::Prompt(args) => prompt::cmd_prompt(&ws, args),
        Command::List(args) => list::cmd_list(&ws, args),
        Command::Record(args) => record::cmd_record(&ws, args),
        Command::Check(args) => check::cmd_check(&ws, args),
        Command::Scaffold(args) => scaffold::cmd_scaffold(&ws, args),
    }
}

/// Append an event to the workspace log.
///
/// The artifact is already on disk when this runs, so a logging failure is
/// reported and the command still succeeds.
pub(crate) fn log_event(ws: &Workspace, action: EventAction, target: Option<&str>, details: Value) {
    if let Err(e) = ws.event_log().append(action, target, details) {
        eprintln!("Warning: failed to log {} event: {}", action.as_str(), e);
    }
}

/// Print a quality report in human-readable form.
pub(crate) fn print_quality(report: &QualityReport) {
    let verdict = if report.passed { "PASS" } else { "FAIL" };
    println!(
        "Quality score: {}/100 (pass threshold {}) {}",
        report.score, report.pass_score, verdict
    );
    println!("  characters: {}", report.chars);
    println!("  sources:    {}", report.sources);

    if !report.issues.is_empty() {
        println!("Issues:");
        for issue in &report.issues {
            println!("  - {} (-{})", issue, issue.penalty());
        }
    }
}
