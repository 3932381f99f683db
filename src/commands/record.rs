//! Implementation of the `bsrs record` command.
//!
//! Stores a research answer pasted back from the AI chat tool as a report
//! artifact, then runs the quality check on it. A low score is reported but
//! does not fail the command; use `bsrs check` for a gating result.

use super::{log_event, print_quality};
use crate::cli::RecordArgs;
use crate::context::Workspace;
use crate::error::{BsrsError, Result};
use crate::events::EventAction;
use crate::output::{ArtifactKind, ArtifactMeta};
use crate::quality::{QualityReport, check_report};
use crate::select::Target;
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;

/// Execute the `bsrs record` command.
pub fn cmd_record(ws: &Workspace, args: RecordArgs) -> Result<()> {
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            BsrsError::UserError(format!("failed to read report '{}': {}", path.display(), e))
        })?,
        None => {
            eprintln!("Paste the report, then press Ctrl-D:");
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| BsrsError::UserError(format!("failed to read report from stdin: {}", e)))?;
            text
        }
    };

    let (path, quality) = run_record(ws, &args, &text)?;

    println!("Report recorded: {}", path.display());
    print_quality(&quality);
    Ok(())
}

/// Write `text` as a report for `args.target` and score it.
pub(crate) fn run_record(
    ws: &Workspace,
    args: &RecordArgs,
    text: &str,
) -> Result<(PathBuf, QualityReport)> {
    let target = Target::parse(&args.target)?;
    let (Some(theme), Some(step)) = (target.theme.as_deref(), target.step) else {
        return Err(BsrsError::UserError(format!(
            "record needs a full target PHASE/THEME/STEP, got '{}'",
            args.target
        )));
    };
    if ws.system.theme(&target.phase, theme).is_none() {
        return Err(BsrsError::UserError(format!(
            "'{}/{}' is not a declared phase/theme",
            target.phase, theme
        )));
    }
    if text.trim().is_empty() {
        return Err(BsrsError::UserError("report is empty; nothing recorded".to_string()));
    }

    let topic = match &args.topic {
        Some(topic) => topic.clone(),
        None => ws.load_project()?.topic(),
    };
    let meta = ArtifactMeta {
        topic: topic.clone(),
        phase: target.phase.clone(),
        theme: theme.to_string(),
        step,
    };

    let path = ws.writer().write(&meta, ArtifactKind::Report, text)?;
    let target = meta.target();
    log_event(
        ws,
        EventAction::ReportRecorded,
        Some(&target),
        json!({
            "topic": topic,
            "path": path.display().to_string(),
            "chars": text.chars().count(),
        }),
    );

    let quality = check_report(text, &ws.system.quality);
    log_event(
        ws,
        EventAction::ReportChecked,
        Some(&target),
        json!({
            "path": path.display().to_string(),
            "score": quality.score,
            "passed": quality.passed,
        }),
    );

    Ok((path, quality))
}
