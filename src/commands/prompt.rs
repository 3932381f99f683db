//! Implementation of the `bsrs prompt` command.
//!
//! Selects a template, resolves it against the project configuration and
//! earlier reports, and writes the prompt as a new output artifact.

use super::log_event;
use crate::cli::PromptArgs;
use crate::context::Workspace;
use crate::error::{BsrsError, Result};
use crate::events::EventAction;
use crate::output::{ArtifactIndex, ArtifactKind};
use crate::prompt::{PromptContext, ResolvedPrompt, gather_reference_context, generate_prompt};
use crate::select::{Selector, Target};
use serde_json::json;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Execute the `bsrs prompt` command.
///
/// The selection menu goes to stderr so that `--print` output on stdout can
/// be piped straight into a clipboard tool.
pub fn cmd_prompt(ws: &Workspace, args: PromptArgs) -> Result<()> {
    let (prompt, path) = {
        let stdin = std::io::stdin();
        let stderr = std::io::stderr();
        run_prompt(ws, &args, stdin.lock(), stderr.lock())?
    };

    if args.print {
        println!("{}", prompt.text);
    }
    eprintln!("Prompt written: {}", path.display());
    eprintln!(
        "Paste it into your AI chat tool, then store the answer with `bsrs record {}`.",
        prompt.meta.target()
    );
    Ok(())
}

/// Select, resolve and write one prompt.
///
/// Nothing is written unless every placeholder resolves.
pub(crate) fn run_prompt<R: BufRead, W: Write>(
    ws: &Workspace,
    args: &PromptArgs,
    input: R,
    output: W,
) -> Result<(ResolvedPrompt, PathBuf)> {
    let project = ws.load_project()?;
    let registry = ws.registry()?;
    let target = args.target.as_deref().map(Target::parse).transpose()?;

    let entry = Selector::new(&ws.system, &registry, input, output).select(target.as_ref())?;

    let (Some(phase), Some(theme)) = (
        ws.system.phase(&entry.phase),
        ws.system.theme(&entry.phase, &entry.theme),
    ) else {
        return Err(BsrsError::UserError(format!(
            "template '{}' is not declared in the system config",
            entry.target()
        )));
    };

    let topic = args.topic.clone().unwrap_or_else(|| project.topic());
    let index = ArtifactIndex::scan(&ws.output_dir, &topic)?;
    let reference =
        gather_reference_context(&ws.system, &index, &entry.phase, &entry.theme, entry.step)?;

    let ctx = PromptContext::new(&ws.system, &project, phase, theme, entry.step)
        .with_topic(&topic)
        .with_reference(reference);
    let prompt = generate_prompt(&ws.system, &entry, &ctx)?;

    let path = ws.writer().write(&prompt.meta, ArtifactKind::Prompt, &prompt.text)?;

    log_event(
        ws,
        EventAction::PromptWritten,
        Some(&prompt.meta.target()),
        json!({
            "topic": topic,
            "path": path.display().to_string(),
            "template": prompt.template.display().to_string(),
            "reference_chars": ctx.reference_context.chars().count(),
        }),
    );

    Ok((prompt, path))
}
