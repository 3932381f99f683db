//! Artifact index: what has already been written for a topic.

use super::naming::{ArtifactKind, compare_suffixes, parse_artifact_name, topic_slug};
use crate::error::{BsrsError, Result};
use std::path::{Path, PathBuf};

/// One artifact found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub phase: String,
    pub theme: String,
    pub step: u32,
    pub kind: ArtifactKind,
    pub suffix: String,
    pub path: PathBuf,
}

/// All artifacts of one topic, parsed from file names.
#[derive(Debug, Clone, Default)]
pub struct ArtifactIndex {
    artifacts: Vec<Artifact>,
}

impl ArtifactIndex {
    /// Scan `<output_root>/<topic-slug>/*/` for artifacts.
    ///
    /// A missing topic directory yields an empty index.
    pub fn scan(output_root: &Path, topic: &str) -> Result<Self> {
        let topic_dir = output_root.join(topic_slug(topic));
        let mut artifacts = Vec::new();

        if !topic_dir.is_dir() {
            return Ok(Self { artifacts });
        }

        for phase_entry in read_dir(&topic_dir)? {
            let phase_path = phase_entry.path();
            if !phase_path.is_dir() {
                continue;
            }
            let Some(phase) = phase_entry.file_name().to_str().map(str::to_string) else {
                continue;
            };

            for entry in read_dir(&phase_path)? {
                let file_name = entry.file_name();
                let Some(parsed) = file_name.to_str().and_then(parse_artifact_name) else {
                    continue;
                };
                artifacts.push(Artifact {
                    phase: phase.clone(),
                    theme: parsed.theme,
                    step: parsed.step,
                    kind: parsed.kind,
                    suffix: parsed.suffix,
                    path: entry.path(),
                });
            }
        }

        tracing::debug!(topic, count = artifacts.len(), "scanned artifact index");
        Ok(Self { artifacts })
    }

    #[cfg(test)]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// The newest artifact of a kind for one phase/theme/step.
    pub fn newest(&self, phase: &str, theme: &str, step: u32, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts
            .iter()
            .filter(|a| a.phase == phase && a.theme == theme && a.step == step && a.kind == kind)
            .max_by(|a, b| compare_suffixes(&a.suffix, &b.suffix))
    }

    /// The newest artifact of a kind for a phase/theme at its highest step.
    pub fn newest_final_step(&self, phase: &str, theme: &str, kind: ArtifactKind) -> Option<&Artifact> {
        let last_step = self
            .artifacts
            .iter()
            .filter(|a| a.phase == phase && a.theme == theme && a.kind == kind)
            .map(|a| a.step)
            .max()?;
        self.newest(phase, theme, last_step, kind)
    }
}

fn read_dir(dir: &Path) -> Result<Vec<std::fs::DirEntry>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        BsrsError::UserError(format!(
            "failed to read output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;
    Ok(entries.filter_map(|entry| entry.ok()).collect())
}
