//! System configuration model.

use super::types::{
    OutputSettings, PhaseDef, QualityThresholds, default_key_aliases, default_max_reference_chars,
    default_phases, default_placeholder_fallbacks, default_required_fields,
    default_selection_attempts, default_templates_dir, default_true,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// System configuration for a research workspace.
///
/// This struct represents the contents of `config/system_config.json`.
/// Unknown fields in the JSON are ignored for forward compatibility, and
/// every field has a default so a partial file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // =========================================================================
    // Taxonomy
    // =========================================================================
    /// Phases in execution order.
    #[serde(default = "default_phases")]
    pub phases: Vec<PhaseDef>,

    /// Template directory, relative to the workspace root.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    // =========================================================================
    // Project document
    // =========================================================================
    /// Keys that must be present and non-empty in the project config.
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<String>,

    /// Document labels mapped to canonical keys.
    #[serde(default = "default_key_aliases")]
    pub key_aliases: BTreeMap<String, String>,

    /// Placeholder keys that borrow another key's value when absent.
    #[serde(default = "default_placeholder_fallbacks")]
    pub placeholder_fallbacks: BTreeMap<String, String>,

    // =========================================================================
    // Prompt generation
    // =========================================================================
    /// Invalid answers accepted per selection question before aborting.
    #[serde(default = "default_selection_attempts")]
    pub selection_attempts: u32,

    /// Upper bound on the reference context inserted into a prompt.
    #[serde(default = "default_max_reference_chars")]
    pub max_reference_chars: usize,

    /// Whether to append the research instruction block to each prompt.
    #[serde(default = "default_true")]
    pub append_instructions: bool,

    // =========================================================================
    // Output and quality
    // =========================================================================
    /// Output directory and naming policy.
    pub output: OutputSettings,

    /// Thresholds for checking pasted-back reports.
    pub quality: QualityThresholds,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            phases: default_phases(),
            templates_dir: default_templates_dir(),
            required_fields: default_required_fields(),
            key_aliases: default_key_aliases(),
            placeholder_fallbacks: default_placeholder_fallbacks(),
            selection_attempts: default_selection_attempts(),
            max_reference_chars: default_max_reference_chars(),
            append_instructions: default_true(),
            output: OutputSettings::default(),
            quality: QualityThresholds::default(),
        }
    }
}
