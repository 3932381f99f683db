//! Output writer: persists prompts and reports under unique names.

use super::naming::{
    ArtifactKind, artifact_file_name, parse_artifact_name, sequence_number, sequence_suffix,
    topic_slug, with_counter,
};
use crate::config::NamingPolicy;
use crate::error::{BsrsError, Result};
use crate::fs::{CreateOutcome, atomic_create_file};
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Upper bound on name candidates tried before giving up.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Identifies which template an artifact belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMeta {
    pub topic: String,
    pub phase: String,
    pub theme: String,
    pub step: u32,
}

impl ArtifactMeta {
    /// `phase/theme/step`, the form accepted on the command line.
    pub fn target(&self) -> String {
        format!("{}/{}/{}", self.phase, self.theme, self.step)
    }
}

/// Writes artifacts to `<root>/<topic-slug>/<phase>/`.
///
/// Files are created atomically and never replaced, so two writes with the
/// same metadata always produce two files.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
    naming: NamingPolicy,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>, naming: NamingPolicy) -> Self {
        Self {
            root: root.into(),
            naming,
        }
    }

    /// Directory holding the artifacts of one topic and phase.
    pub fn artifact_dir(&self, topic: &str, phase: &str) -> PathBuf {
        self.root.join(topic_slug(topic)).join(phase)
    }

    /// Write `text` as a new artifact and return its path.
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the newly created file
    /// * `Err(BsrsError::OutputWrite)` - I/O failure, or no free name found
    pub fn write(&self, meta: &ArtifactMeta, kind: ArtifactKind, text: &str) -> Result<PathBuf> {
        let dir = self.artifact_dir(&meta.topic, &meta.phase);

        let base = match self.naming {
            NamingPolicy::Timestamp => Utc::now().format("%Y%m%dT%H%M%S%3f").to_string(),
            NamingPolicy::Sequence => String::new(),
        };
        let mut next_sequence = match self.naming {
            NamingPolicy::Sequence => self.highest_sequence(&dir, meta, kind)? + 1,
            NamingPolicy::Timestamp => 0,
        };

        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let suffix = match self.naming {
                NamingPolicy::Timestamp => with_counter(&base, attempt),
                NamingPolicy::Sequence => sequence_suffix(next_sequence),
            };
            let path = dir.join(artifact_file_name(&meta.theme, meta.step, kind, &suffix));

            match atomic_create_file(&path, text)? {
                CreateOutcome::Created => {
                    tracing::info!(path = %path.display(), kind = %kind, "wrote artifact");
                    return Ok(path);
                }
                CreateOutcome::AlreadyExists => {
                    tracing::debug!(path = %path.display(), "artifact name taken, trying next");
                    next_sequence += 1;
                }
            }
        }

        Err(BsrsError::output(
            dir,
            format!(
                "no free file name after {} attempts for {}",
                MAX_NAME_ATTEMPTS,
                meta.target()
            ),
        ))
    }

    /// Highest sequence counter already used for this artifact slot.
    fn highest_sequence(&self, dir: &Path, meta: &ArtifactMeta, kind: ArtifactKind) -> Result<u32> {
        if !dir.exists() {
            return Ok(0);
        }

        let entries = std::fs::read_dir(dir).map_err(|e| {
            BsrsError::output(dir, format!("failed to read output directory: {}", e))
        })?;

        let highest = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str().and_then(parse_artifact_name))
            .filter(|parsed| {
                parsed.theme == meta.theme && parsed.step == meta.step && parsed.kind == kind
            })
            .filter_map(|parsed| sequence_number(&parsed.suffix))
            .max()
            .unwrap_or(0);

        Ok(highest)
    }
}
