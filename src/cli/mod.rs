//! CLI argument parsing for bsrs.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::context::PathOverrides;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// bsrs: Template-driven prompt workflow for business strategy research.
///
/// Research runs through phases of themed, multi-step prompts:
/// - Pick a template (phase, then theme/step)
/// - bsrs fills it from your project configuration and writes the prompt
/// - Paste the prompt into your AI chat tool, then `record` the answer
/// - Recorded reports feed the next step as reference context
#[derive(Parser, Debug)]
#[command(name = "bsrs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Workspace root (default: current directory).
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Project configuration document (default: discovered in the root).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// System configuration JSON (default: config/system_config.json).
    #[arg(long, global = true)]
    pub system_config: Option<PathBuf>,

    /// Prompt template directory (default: from the system config).
    #[arg(long, global = true)]
    pub templates: Option<PathBuf>,

    /// Output directory (default: from the system config).
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Path overrides for workspace resolution.
    pub fn overrides(&self) -> PathOverrides {
        PathOverrides {
            root: self.root.clone(),
            project_config: self.config.clone(),
            system_config: self.system_config.clone(),
            templates_dir: self.templates.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}

/// Available commands for bsrs.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a prompt template and write it to the output directory.
    ///
    /// TARGET is PHASE[/THEME[/STEP]]; any missing part is asked
    /// interactively.
    Prompt(PromptArgs),

    /// List available templates in declared order.
    List(ListArgs),

    /// Store a pasted-back research report and quality-check it.
    ///
    /// Reads the report from --file, or from stdin until end of input.
    Record(RecordArgs),

    /// Quality-check a report file.
    ///
    /// Exits non-zero when the score is below the pass threshold.
    Check(CheckArgs),

    /// Write default templates and a project config template.
    ///
    /// Existing files are never overwritten.
    Scaffold(ScaffoldArgs),
}

/// Arguments for the `prompt` command.
#[derive(Parser, Debug)]
pub struct PromptArgs {
    /// Template to resolve: PHASE[/THEME[/STEP]].
    pub target: Option<String>,

    /// Also print the resolved prompt to stdout.
    #[arg(long)]
    pub print: bool,

    /// Override the research topic (default: the project name).
    #[arg(long)]
    pub topic: Option<String>,
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show each template's placeholders and flag keys missing from the
    /// project configuration.
    #[arg(long)]
    pub placeholders: bool,
}

/// Arguments for the `record` command.
#[derive(Parser, Debug)]
pub struct RecordArgs {
    /// Template the report answers: PHASE/THEME/STEP.
    pub target: String,

    /// Read the report from this file instead of stdin.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Override the research topic (default: the project name).
    #[arg(long)]
    pub topic: Option<String>,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Report file to check.
    pub path: PathBuf,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `scaffold` command.
#[derive(Parser, Debug)]
pub struct ScaffoldArgs {
    /// Also fill in missing steps of themes that already have templates.
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
