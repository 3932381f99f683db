//! Error types for the bsrs CLI.
//!
//! Uses thiserror for derive macros. Every message names the offending path
//! or key so the user can fix the input file and re-run.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bsrs operations.
#[derive(Error, Debug)]
pub enum BsrsError {
    /// User provided invalid arguments or input that could not be read.
    #[error("{0}")]
    UserError(String),

    /// The project configuration document could not be found.
    #[error(
        "project configuration not found: {}\n\n\
         Run `bsrs scaffold` to create project_config.template.md, fill in the fields, and save it as project_config.md.",
        .path.display()
    )]
    ConfigNotFound { path: PathBuf },

    /// A configuration document failed to parse or validate.
    #[error("invalid configuration '{}': {message}", .path.display())]
    ConfigValidation { path: PathBuf, message: String },

    /// A declared phase has no template files.
    #[error("no templates found for phase '{phase}' in '{}'", .dir.display())]
    TemplateMissing { phase: String, dir: PathBuf },

    /// A template contains malformed placeholder syntax.
    #[error("template '{}' is malformed: {message}", .path.display())]
    TemplateSyntax { path: PathBuf, message: String },

    /// Interactive selection gave up after repeated invalid input.
    #[error("selection aborted after {attempts} invalid attempt(s)")]
    SelectionAborted { attempts: u32 },

    /// A template placeholder has no value in the configuration.
    #[error(
        "unresolved placeholder '{{{key}}}' in template '{}': add '{key}' to the project configuration",
        .template.display()
    )]
    UnresolvedPlaceholder { key: String, template: PathBuf },

    /// An output artifact could not be written.
    #[error("failed to write output '{}': {message}", .path.display())]
    OutputWrite { path: PathBuf, message: String },

    /// A report scored below the configured pass threshold.
    #[error("quality check failed: score {score} is below the pass threshold {threshold}")]
    QualityCheckFailed { score: u32, threshold: u32 },
}

impl BsrsError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            BsrsError::UserError(_) => exit_codes::USER_ERROR,
            BsrsError::ConfigNotFound { .. } | BsrsError::ConfigValidation { .. } => {
                exit_codes::CONFIG_FAILURE
            }
            BsrsError::TemplateMissing { .. } | BsrsError::TemplateSyntax { .. } => {
                exit_codes::TEMPLATE_FAILURE
            }
            BsrsError::SelectionAborted { .. } => exit_codes::SELECTION_ABORTED,
            BsrsError::UnresolvedPlaceholder { .. } => exit_codes::UNRESOLVED_PLACEHOLDER,
            BsrsError::OutputWrite { .. } => exit_codes::OUTPUT_FAILURE,
            BsrsError::QualityCheckFailed { .. } => exit_codes::QUALITY_FAILURE,
        }
    }

    /// Shorthand for a validation failure on a config document.
    pub(crate) fn invalid_config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        BsrsError::ConfigValidation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an output write failure.
    pub(crate) fn output(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        BsrsError::OutputWrite {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for bsrs operations.
pub type Result<T> = std::result::Result<T, BsrsError>;
