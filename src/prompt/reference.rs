//! Reference context: earlier reports that feed the next prompt.
//!
//! - Step N > 1 takes the newest report of the same phase/theme at step N-1.
//! - Step 1 of a later phase takes, for every theme of the previous phase,
//!   the newest report at that theme's highest recorded step.
//! - The first phase's step 1 has no reference.

use crate::config::SystemConfig;
use crate::error::{BsrsError, Result};
use crate::output::{ArtifactIndex, ArtifactKind};
use std::path::Path;

/// Collect the reference text for one template, truncated to
/// `max_reference_chars`.
pub fn gather_reference_context(
    system: &SystemConfig,
    index: &ArtifactIndex,
    phase: &str,
    theme: &str,
    step: u32,
) -> Result<String> {
    let text = if step > 1 {
        match index.newest(phase, theme, step - 1, ArtifactKind::Report) {
            Some(report) => read_report(&report.path)?,
            None => {
                tracing::info!(phase, theme, step = step - 1, "no report recorded for previous step");
                String::new()
            }
        }
    } else if let Some(previous) = system.previous_phase(phase) {
        let mut sections = Vec::new();
        for prev_theme in &previous.themes {
            let Some(report) =
                index.newest_final_step(&previous.id, &prev_theme.id, ArtifactKind::Report)
            else {
                continue;
            };
            sections.push(format!(
                "## {} / {}\n\n{}",
                previous.label,
                prev_theme.name,
                read_report(&report.path)?
            ));
        }
        if sections.is_empty() {
            tracing::info!(phase = %previous.id, "no reports recorded for previous phase");
        }
        sections.join("\n\n")
    } else {
        String::new()
    };

    Ok(truncate_reference(&text, system.max_reference_chars))
}

/// Cut `text` to at most `max_chars` characters, marking the cut.
pub fn truncate_reference(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_index, _)) => {
            tracing::debug!(max_chars, "truncating reference context");
            format!(
                "{}\n\n[... reference truncated at {} characters]",
                text[..byte_index].trim_end(),
                max_chars
            )
        }
    }
}

fn read_report(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map(|content| content.trim().to_string())
        .map_err(|e| {
            BsrsError::UserError(format!(
                "failed to read report '{}': {}",
                path.display(),
                e
            ))
        })
}
