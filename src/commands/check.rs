//! Implementation of the `bsrs check` command.

use super::{log_event, print_quality};
use crate::cli::CheckArgs;
use crate::context::Workspace;
use crate::error::{BsrsError, Result};
use crate::events::EventAction;
use crate::quality::{QualityReport, check_report_file};
use serde_json::json;

/// Execute the `bsrs check` command.
///
/// Prints the score and issues, and fails with `QualityCheckFailed` when the
/// report scores below `quality.pass_score`.
pub fn cmd_check(ws: &Workspace, args: CheckArgs) -> Result<()> {
    let report = run_check(ws, &args)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| {
            BsrsError::UserError(format!("failed to serialize quality report: {}", e))
        })?;
        println!("{}", json);
    } else {
        print_quality(&report);
    }

    report.ensure_passed()
}

pub(crate) fn run_check(ws: &Workspace, args: &CheckArgs) -> Result<QualityReport> {
    let report = check_report_file(&args.path, &ws.system.quality)?;

    log_event(
        ws,
        EventAction::ReportChecked,
        None,
        json!({
            "path": args.path.display().to_string(),
            "score": report.score,
            "passed": report.passed,
        }),
    );

    Ok(report)
}
