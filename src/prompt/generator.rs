//! Prompt generation: template file + context -> resolved prompt.

use super::context::PromptContext;
use super::template::{TemplateError, render_template};
use crate::config::{QualityThresholds, SystemConfig};
use crate::error::{BsrsError, Result};
use crate::output::ArtifactMeta;
use crate::registry::TemplateEntry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A fully substituted prompt, ready to be written.
#[derive(Debug, Clone)]
pub struct ResolvedPrompt {
    pub meta: ArtifactMeta,
    /// Template the prompt was rendered from.
    pub template: PathBuf,
    pub text: String,
}

/// Render the template of `entry` with `ctx`.
///
/// The instruction block is appended after rendering when
/// `append_instructions` is set, so it is never scanned for placeholders.
pub fn generate_prompt(
    system: &SystemConfig,
    entry: &TemplateEntry,
    ctx: &PromptContext,
) -> Result<ResolvedPrompt> {
    let template = std::fs::read_to_string(&entry.path).map_err(|e| {
        BsrsError::UserError(format!(
            "failed to read template '{}': {}",
            entry.path.display(),
            e
        ))
    })?;

    let mut text = render(&template, &entry.path, &ctx.to_template_vars())?;
    if system.append_instructions {
        text.push_str(&research_instructions(&system.quality));
    }

    tracing::debug!(template = %entry.path.display(), chars = text.chars().count(), "resolved prompt");
    Ok(ResolvedPrompt {
        meta: ArtifactMeta {
            topic: ctx.topic.clone(),
            phase: entry.phase.clone(),
            theme: entry.theme.clone(),
            step: entry.step,
        },
        template: entry.path.clone(),
        text,
    })
}

/// Render template text, mapping engine errors to `BsrsError`.
pub fn render(template: &str, path: &Path, vars: &HashMap<String, String>) -> Result<String> {
    render_template(template, vars).map_err(|e| match e {
        TemplateError::UndefinedVariable { name, .. } => BsrsError::UnresolvedPlaceholder {
            key: name,
            template: path.to_path_buf(),
        },
        other => BsrsError::TemplateSyntax {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    })
}

/// Fixed block asking the chat tool for a researched, sourced answer.
pub fn research_instructions(quality: &QualityThresholds) -> String {
    let mut block = String::from("\n\n---\n\n## Research Instructions\n\n");
    block.push_str("- Research this topic with web search. Prefer recent primary sources.\n");
    block.push_str(&format!(
        "- Cite at least {} sources as a numbered list with URLs under a \"References\" heading.\n",
        quality.min_sources
    ));
    block.push_str(
        "- Back every finding with concrete figures (market size, growth rates, shares, prices).\n",
    );
    block.push_str("- Answer in markdown with headings");
    if quality.require_charts {
        block.push_str(", and include at least one table");
    }
    block.push_str(".\n");
    if !quality.required_sections.is_empty() {
        block.push_str(&format!(
            "- Include these sections: {}.\n",
            quality.required_sections.join(", ")
        ));
    }
    block
}
