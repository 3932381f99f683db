//! Project configuration: the user-filled research parameters.
//!
//! The project document is either markdown, where each bullet line
//! `- key: value` (or the fill-in form `- key: [value]`) is one entry, or a
//! flat YAML mapping. Labels are mapped to canonical keys through the
//! system config's `key_aliases`.

use super::model::SystemConfig;
use crate::error::{BsrsError, Result};
use globset::Glob;
use regex::Regex;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// File name patterns searched, in priority order, when no path is given.
pub const DISCOVERY_PATTERNS: &[&str] = &[
    "project_config.md",
    "*_config.md",
    "research_config.md",
    "project_config.yaml",
    "project_config.yml",
];

static BULLET_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-*]\s+([^:]+?)\s*:\s*(.*?)\s*$").expect("Invalid bullet entry regex")
});

/// Research parameters supplied by the user for one project.
///
/// Immutable once loaded; components borrow it for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    source: PathBuf,
    values: BTreeMap<String, String>,
}

impl ProjectConfig {
    /// Load and validate a project config document.
    ///
    /// # Returns
    ///
    /// * `Ok(ProjectConfig)` - All required fields are present and non-empty
    /// * `Err(BsrsError::ConfigNotFound)` - `path` does not exist
    /// * `Err(BsrsError::ConfigValidation)` - Parse failure or missing fields
    pub fn load<P: AsRef<Path>>(path: P, system: &SystemConfig) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(BsrsError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            BsrsError::invalid_config(path, format!("failed to read file: {}", e))
        })?;

        let raw = if is_yaml(path) {
            parse_yaml(&content, path)?
        } else {
            parse_markdown(&content)
        };

        let config = Self::from_entries(path, raw, system);
        config.validate(&system.required_fields)?;

        tracing::debug!(
            path = %path.display(),
            keys = config.values.len(),
            "loaded project config"
        );
        Ok(config)
    }

    /// Build a config from already-parsed label/value entries.
    ///
    /// Labels are mapped to canonical keys; later entries win.
    pub fn from_entries<I>(source: impl Into<PathBuf>, entries: I, system: &SystemConfig) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let values = entries
            .into_iter()
            .map(|(label, value)| (system.canonical_key(&label).to_string(), value))
            .collect();

        Self {
            source: source.into(),
            values,
        }
    }

    /// Check that every required field is present and non-empty.
    ///
    /// All missing fields are reported together.
    pub fn validate(&self, required: &[String]) -> Result<()> {
        let missing: Vec<&str> = required
            .iter()
            .filter(|field| self.get(field).is_none_or(|v| v.trim().is_empty()))
            .map(String::as_str)
            .collect();

        if !missing.is_empty() {
            return Err(BsrsError::invalid_config(
                &self.source,
                format!("missing required field(s): {}", missing.join(", ")),
            ));
        }

        Ok(())
    }

    /// Look up a value by canonical key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// All entries, ordered by key.
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// The document this config was loaded from.
    #[cfg(test)]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Default research topic: the project name, else the document stem.
    pub fn topic(&self) -> String {
        match self.get("project_name").map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .source
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "research".to_string()),
        }
    }
}

/// Find the project config document in `root`.
///
/// Patterns in [`DISCOVERY_PATTERNS`] are tried in order; within a pattern
/// the alphabetically first file name wins.
pub fn discover_project_config(root: &Path) -> Result<PathBuf> {
    let not_found = || BsrsError::ConfigNotFound {
        path: root.join(DISCOVERY_PATTERNS[0]),
    };

    let mut names: Vec<String> = std::fs::read_dir(root)
        .map_err(|_| not_found())?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();

    for pattern in DISCOVERY_PATTERNS {
        let matcher = Glob::new(pattern)
            .map_err(|e| BsrsError::UserError(format!("invalid discovery pattern: {}", e)))?
            .compile_matcher();

        if let Some(name) = names.iter().find(|name| matcher.is_match(name.as_str())) {
            tracing::debug!(pattern, file = %name, "discovered project config");
            return Ok(root.join(name));
        }
    }

    Err(not_found())
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Parse `- label: value` bullet lines from a markdown document.
///
/// Bracketed fill-in groups are unwrapped; the unfilled form `[]` is empty.
pub(crate) fn parse_markdown(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| BULLET_ENTRY.captures(line))
        .map(|caps| {
            let label = caps[1].trim().to_string();
            let value = strip_brackets(&caps[2]);
            (label, value)
        })
        .collect()
}

/// Drop the fill-in brackets, so `[Alpha], [Beta]` reads `Alpha, Beta`.
fn strip_brackets(value: &str) -> String {
    value.replace(['[', ']'], "").trim().to_string()
}

/// Parse a flat YAML mapping into label/value entries.
pub(crate) fn parse_yaml(content: &str, origin: &Path) -> Result<Vec<(String, String)>> {
    let doc: Value = serde_yaml::from_str(content)
        .map_err(|e| BsrsError::invalid_config(origin, format!("failed to parse YAML: {}", e)))?;

    let mapping = match doc {
        Value::Mapping(m) => m,
        Value::Null => return Ok(Vec::new()),
        _ => {
            return Err(BsrsError::invalid_config(
                origin,
                "project config must be a mapping of keys to values",
            ));
        }
    };

    mapping
        .into_iter()
        .map(|(key, value)| {
            let key = scalar_to_string(&key).ok_or_else(|| {
                BsrsError::invalid_config(origin, "project config keys must be scalars")
            })?;
            let value = match &value {
                Value::Sequence(items) => items
                    .iter()
                    .map(|item| {
                        scalar_to_string(item).ok_or_else(|| {
                            BsrsError::invalid_config(
                                origin,
                                format!("list '{}' must contain only scalar values", key),
                            )
                        })
                    })
                    .collect::<Result<Vec<_>>>()?
                    .join(", "),
                other => scalar_to_string(other).ok_or_else(|| {
                    BsrsError::invalid_config(
                        origin,
                        format!("value of '{}' must be a scalar or a list", key),
                    )
                })?,
            };
            Ok((key, value))
        })
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
