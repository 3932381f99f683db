//! Workspace resolution for bsrs.
//!
//! A research workspace is a directory holding the project configuration
//! document, `config/system_config.json`, the prompt template tree and the
//! output directory. This module resolves all of those paths once, applying
//! command-line overrides, so commands never guess at locations.
//!
//! Relative override paths are resolved against the workspace root.

use crate::config::{ProjectConfig, SystemConfig, discover_project_config};
use crate::error::{BsrsError, Result};
use crate::events::EventLog;
use crate::output::OutputWriter;
use crate::registry::TemplateRegistry;
use std::env;
use std::path::{Path, PathBuf};

/// Default system config path relative to the workspace root.
pub const DEFAULT_SYSTEM_CONFIG: &str = "config/system_config.json";

/// Paths given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub root: Option<PathBuf>,
    pub project_config: Option<PathBuf>,
    pub system_config: Option<PathBuf>,
    pub templates_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

/// Resolved paths and the loaded system configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Workspace root.
    pub root: PathBuf,

    /// System config file (may not exist; defaults are used then).
    pub system_config_path: PathBuf,

    /// Loaded system configuration.
    pub system: SystemConfig,

    /// Prompt template directory.
    pub templates_dir: PathBuf,

    /// Output directory for artifacts and the event log.
    pub output_dir: PathBuf,

    /// Explicit project config path, if one was given.
    project_config: Option<PathBuf>,
}

impl Workspace {
    /// Resolve the workspace from the current working directory, or from
    /// `overrides.root` when given.
    pub fn resolve(overrides: &PathOverrides) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            BsrsError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        let root = match &overrides.root {
            Some(root) => cwd.join(root),
            None => cwd,
        };
        Self::resolve_from(root, overrides)
    }

    /// Resolve the workspace rooted at `root`.
    ///
    /// # Returns
    ///
    /// * `Ok(Workspace)` - Paths resolved and system config loaded
    /// * `Err(BsrsError::UserError)` - `root` is not a directory
    /// * `Err(BsrsError::ConfigValidation)` - The system config is invalid
    pub fn resolve_from<P: AsRef<Path>>(root: P, overrides: &PathOverrides) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(BsrsError::UserError(format!(
                "workspace root '{}' is not a directory",
                root.display()
            )));
        }

        let system_config_path = match &overrides.system_config {
            Some(path) => root.join(path),
            None => root.join(DEFAULT_SYSTEM_CONFIG),
        };
        let system = SystemConfig::load(&system_config_path)?;

        let templates_dir = match &overrides.templates_dir {
            Some(path) => root.join(path),
            None => root.join(&system.templates_dir),
        };
        let output_dir = match &overrides.output_dir {
            Some(path) => root.join(path),
            None => root.join(&system.output.dir),
        };
        let project_config = overrides.project_config.as_ref().map(|p| root.join(p));

        tracing::debug!(
            root = %root.display(),
            templates = %templates_dir.display(),
            output = %output_dir.display(),
            "resolved workspace"
        );

        Ok(Self {
            root,
            system_config_path,
            system,
            templates_dir,
            output_dir,
            project_config,
        })
    }

    /// The project config document: the explicit path, else the first
    /// discovered one in the root.
    pub fn project_config_path(&self) -> Result<PathBuf> {
        match &self.project_config {
            Some(path) => Ok(path.clone()),
            None => discover_project_config(&self.root),
        }
    }

    /// Load and validate the project configuration.
    pub fn load_project(&self) -> Result<ProjectConfig> {
        ProjectConfig::load(self.project_config_path()?, &self.system)
    }

    /// Scan the template directory.
    pub fn registry(&self) -> Result<TemplateRegistry> {
        TemplateRegistry::scan(&self.system, &self.templates_dir)
    }

    /// Writer for output artifacts.
    pub fn writer(&self) -> OutputWriter {
        OutputWriter::new(&self.output_dir, self.system.output.naming)
    }

    /// Audit log in the output directory.
    pub fn event_log(&self) -> EventLog {
        EventLog::new(&self.output_dir)
    }
}
