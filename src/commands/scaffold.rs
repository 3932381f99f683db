//! Implementation of the `bsrs scaffold` command.

use crate::cli::ScaffoldArgs;
use crate::context::Workspace;
use crate::error::Result;
use crate::scaffold::{PROJECT_TEMPLATE_FILE, scaffold};

/// Execute the `bsrs scaffold` command.
///
/// Writes default step templates for every declared theme that has none
/// (every missing step file with `--force`) plus the project config
/// template. Existing files are never overwritten.
pub fn cmd_scaffold(ws: &Workspace, args: ScaffoldArgs) -> Result<()> {
    let report = scaffold(&ws.system, &ws.templates_dir, &ws.root, args.force)?;

    for path in &report.created {
        println!("created  {}", path.display());
    }
    for path in &report.existing {
        println!("exists   {}", path.display());
    }
    if !report.skipped_themes.is_empty() {
        println!(
            "skipped {} theme(s) that already have templates (use --force to fill missing steps)",
            report.skipped_themes.len()
        );
    }

    println!();
    println!(
        "{} file(s) created. Fill in {} and save it as project_config.md.",
        report.created.len(),
        PROJECT_TEMPLATE_FILE
    );
    Ok(())
}
