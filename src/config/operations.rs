//! System config loading, validation, and lookup operations.

use super::model::SystemConfig;
use super::types::{PhaseDef, ThemeDef};
use crate::error::{BsrsError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// Identifiers end up in directory and file names, so keep them path-safe.
static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid id regex"));

impl SystemConfig {
    /// Load the system config from a JSON file.
    ///
    /// A missing file yields the built-in defaults. A file that exists but
    /// cannot be read, parsed, or validated is a `ConfigValidation` error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::info!(path = %path.display(), "no system config found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            BsrsError::invalid_config(path, format!("failed to read file: {}", e))
        })?;

        Self::from_json(&content, path)
    }

    /// Parse a system config from a JSON string.
    ///
    /// `origin` is only used to label errors.
    pub fn from_json(json: &str, origin: &Path) -> Result<Self> {
        let config: SystemConfig = serde_json::from_str(json)
            .map_err(|e| BsrsError::invalid_config(origin, format!("failed to parse JSON: {}", e)))?;

        config.validate(origin)?;
        Ok(config)
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            BsrsError::UserError(format!("failed to serialize system config to JSON: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - at least one phase; phase ids unique and path-safe
    /// - every phase has at least one theme; theme ids unique per phase and path-safe
    /// - `selection_attempts` and `max_reference_chars` are positive
    /// - `quality.pass_score` is at most 100
    /// - `required_fields` entries are non-empty
    /// - no placeholder fallback points at itself
    pub fn validate(&self, origin: &Path) -> Result<()> {
        let fail = |message: String| Err(BsrsError::invalid_config(origin, message));

        if self.phases.is_empty() {
            return fail("phases must declare at least one phase".to_string());
        }

        let mut phase_ids = HashSet::new();
        for phase in &self.phases {
            if !ID_PATTERN.is_match(&phase.id) {
                return fail(format!(
                    "phase id '{}' must contain only letters, digits, '_' or '-'",
                    phase.id
                ));
            }
            if !phase_ids.insert(phase.id.as_str()) {
                return fail(format!("duplicate phase id '{}'", phase.id));
            }
            if phase.themes.is_empty() {
                return fail(format!("phase '{}' must declare at least one theme", phase.id));
            }

            let mut theme_ids = HashSet::new();
            for theme in &phase.themes {
                if !ID_PATTERN.is_match(&theme.id) {
                    return fail(format!(
                        "theme id '{}' in phase '{}' must contain only letters, digits, '_' or '-'",
                        theme.id, phase.id
                    ));
                }
                if !theme_ids.insert(theme.id.as_str()) {
                    return fail(format!(
                        "duplicate theme id '{}' in phase '{}'",
                        theme.id, phase.id
                    ));
                }
            }
        }

        if self.selection_attempts == 0 {
            return fail("selection_attempts must be greater than 0".to_string());
        }

        if self.max_reference_chars == 0 {
            return fail("max_reference_chars must be greater than 0".to_string());
        }

        if self.quality.pass_score > 100 {
            return fail(format!(
                "quality.pass_score must be at most 100 (found {})",
                self.quality.pass_score
            ));
        }

        if self.required_fields.iter().any(|f| f.trim().is_empty()) {
            return fail("required_fields entries must be non-empty".to_string());
        }

        for (key, fallback) in &self.placeholder_fallbacks {
            if key == fallback {
                return fail(format!("placeholder_fallbacks entry '{}' points at itself", key));
            }
        }

        Ok(())
    }

    /// Find a phase by id.
    pub fn phase(&self, id: &str) -> Option<&PhaseDef> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// Position of a phase in the declared order.
    pub fn phase_index(&self, id: &str) -> Option<usize> {
        self.phases.iter().position(|p| p.id == id)
    }

    /// The phase declared immediately before `id`, if any.
    pub fn previous_phase(&self, id: &str) -> Option<&PhaseDef> {
        match self.phase_index(id)? {
            0 => None,
            i => self.phases.get(i - 1),
        }
    }

    /// Find a theme by phase and theme id.
    pub fn theme(&self, phase: &str, theme: &str) -> Option<&ThemeDef> {
        self.phase(phase).and_then(|p| p.theme(theme))
    }

    /// Canonical key for a project document label.
    pub fn canonical_key<'a>(&'a self, label: &'a str) -> &'a str {
        self.key_aliases
            .get(label)
            .map(String::as_str)
            .unwrap_or(label)
    }
}
