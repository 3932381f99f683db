//! Template registry: which prompt templates exist for the declared phases.
//!
//! Templates live at `<templates_dir>/<phase_id>/<theme_id>_step<N>.md`.
//! The registry only reports templates for phases and themes declared in the
//! system config, ordered by declaration (phase, then theme) and step number,
//! never by filesystem order.

use crate::config::{PhaseDef, SystemConfig, ThemeDef};
use crate::error::{BsrsError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static TEMPLATE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<theme>[A-Za-z0-9_-]+?)_step(?P<step>\d+)\.md$")
        .expect("Invalid template name regex")
});

/// One prompt template on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub phase: String,
    pub theme: String,
    pub step: u32,
    pub path: PathBuf,
}

impl TemplateEntry {
    /// `phase/theme/step`, the form accepted on the command line.
    pub fn target(&self) -> String {
        format!("{}/{}/{}", self.phase, self.theme, self.step)
    }
}

/// Ordered set of available templates.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    entries: Vec<TemplateEntry>,
}

impl TemplateRegistry {
    /// Scan `dir` for the templates of every declared phase.
    ///
    /// # Returns
    ///
    /// * `Ok(TemplateRegistry)` - Every declared phase has at least one template
    /// * `Err(BsrsError::TemplateMissing)` - The first declared phase without one
    pub fn scan(system: &SystemConfig, dir: &Path) -> Result<Self> {
        let mut entries = Vec::new();

        for phase in &system.phases {
            let found = scan_phase(phase, &dir.join(&phase.id));
            if found.is_empty() {
                return Err(BsrsError::TemplateMissing {
                    phase: phase.id.clone(),
                    dir: dir.to_path_buf(),
                });
            }
            entries.extend(found);
        }

        tracing::debug!(dir = %dir.display(), count = entries.len(), "scanned template registry");
        Ok(Self { entries })
    }

    #[cfg(test)]
    pub fn from_entries(entries: Vec<TemplateEntry>) -> Self {
        Self { entries }
    }

    /// All entries in declared order.
    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    /// Phase ids that have templates, in declared order.
    pub fn phases(&self) -> Vec<&str> {
        let mut phases: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if phases.last() != Some(&entry.phase.as_str()) {
                phases.push(&entry.phase);
            }
        }
        phases
    }

    /// Entries of one phase, in declared order.
    pub fn entries_for_phase<'a>(&'a self, phase: &'a str) -> impl Iterator<Item = &'a TemplateEntry> + 'a {
        self.entries.iter().filter(move |e| e.phase == phase)
    }

    #[cfg(test)]
    pub fn find(&self, phase: &str, theme: &str, step: u32) -> Option<&TemplateEntry> {
        self.entries
            .iter()
            .find(|e| e.phase == phase && e.theme == theme && e.step == step)
    }
}

/// Collect the templates of one phase in declared theme order.
fn scan_phase(phase: &PhaseDef, phase_dir: &Path) -> Vec<TemplateEntry> {
    let Ok(read_dir) = std::fs::read_dir(phase_dir) else {
        return Vec::new();
    };

    let mut found: Vec<(String, u32, PathBuf)> = Vec::new();
    for entry in read_dir.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(caps) = file_name.to_str().and_then(|n| TEMPLATE_NAME.captures(n)) else {
            tracing::debug!(path = %path.display(), "ignoring non-template file");
            continue;
        };
        let Ok(step) = caps["step"].parse::<u32>() else {
            continue;
        };
        if step == 0 {
            tracing::debug!(path = %path.display(), "ignoring template with step 0");
            continue;
        }
        let theme = caps["theme"].to_string();
        if phase.theme(&theme).is_none() {
            tracing::debug!(path = %path.display(), phase = %phase.id, theme = %theme, "ignoring template for undeclared theme");
            continue;
        }
        found.push((theme, step, path));
    }

    let mut entries = Vec::new();
    for theme in &phase.themes {
        let mut steps: Vec<&(String, u32, PathBuf)> =
            found.iter().filter(|(t, _, _)| *t == theme.id).collect();
        if steps.is_empty() {
            warn_missing_theme(phase, theme);
            continue;
        }
        steps.sort_by_key(|(_, step, _)| *step);
        entries.extend(steps.into_iter().map(|(theme, step, path)| TemplateEntry {
            phase: phase.id.clone(),
            theme: theme.clone(),
            step: *step,
            path: path.clone(),
        }));
    }
    entries
}

fn warn_missing_theme(phase: &PhaseDef, theme: &ThemeDef) {
    tracing::warn!(
        phase = %phase.id,
        theme = %theme.id,
        "declared theme '{}' has no templates",
        theme.name
    );
}
