//! Prompt context: the variables available to a prompt template.
//!
//! A `PromptContext` combines the project values (after placeholder
//! fallbacks) with the built-in variables describing the selected template.
//!
//! # Built-in variables
//!
//! - `phase`, `phase_label` - Phase id and display label
//! - `theme`, `theme_name`, `main_question` - Theme id, name and question
//! - `step` - Step number
//! - `date` - Today's date (`YYYY-MM-DD`, local time)
//! - `topic` - Research topic
//! - `reference_context` - Earlier reports feeding this step
//!
//! A non-empty project value wins over a built-in of the same name, so a
//! project that defines `theme` or `topic` controls what those render as.

use crate::config::{PhaseDef, ProjectConfig, SystemConfig, ThemeDef};
use chrono::{Local, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// Names of the variables every template can use.
pub const BUILTIN_VARS: &[&str] = &[
    "phase",
    "phase_label",
    "theme",
    "theme_name",
    "main_question",
    "step",
    "date",
    "topic",
    "reference_context",
];

/// Everything a template can reference.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    pub phase: String,
    pub phase_label: String,
    pub theme: String,
    pub theme_name: String,
    pub main_question: String,
    pub step: u32,
    pub date: String,
    pub topic: String,
    pub reference_context: String,

    /// Project values with fallbacks applied.
    pub project: BTreeMap<String, String>,
}

impl PromptContext {
    /// Build the context for one template, dated today.
    pub fn new(
        system: &SystemConfig,
        project: &ProjectConfig,
        phase: &PhaseDef,
        theme: &ThemeDef,
        step: u32,
    ) -> Self {
        Self::with_date(system, project, phase, theme, step, Local::now().date_naive())
    }

    /// Build the context for one template with an explicit date.
    pub fn with_date(
        system: &SystemConfig,
        project: &ProjectConfig,
        phase: &PhaseDef,
        theme: &ThemeDef,
        step: u32,
        date: NaiveDate,
    ) -> Self {
        Self {
            phase: phase.id.clone(),
            phase_label: phase.label.clone(),
            theme: theme.id.clone(),
            theme_name: theme.name.clone(),
            main_question: theme.main_question.clone(),
            step,
            date: date.format("%Y-%m-%d").to_string(),
            topic: project.topic(),
            reference_context: String::new(),
            project: apply_fallbacks(project.values(), &system.placeholder_fallbacks),
        }
    }

    /// Override the topic (e.g. from `--topic`).
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Set the reference context text.
    pub fn with_reference(mut self, reference_context: impl Into<String>) -> Self {
        self.reference_context = reference_context.into();
        self
    }

    /// Convert the context to template variables.
    ///
    /// Returns a HashMap suitable for use with `render_template`. Built-ins
    /// are inserted first; non-empty project values then replace them.
    pub fn to_template_vars(&self) -> HashMap<String, String> {
        let mut vars: HashMap<String, String> = HashMap::from([
            ("phase".to_string(), self.phase.clone()),
            ("phase_label".to_string(), self.phase_label.clone()),
            ("theme".to_string(), self.theme.clone()),
            ("theme_name".to_string(), self.theme_name.clone()),
            ("main_question".to_string(), self.main_question.clone()),
            ("step".to_string(), self.step.to_string()),
            ("date".to_string(), self.date.clone()),
            ("topic".to_string(), self.topic.clone()),
            ("reference_context".to_string(), self.reference_context.clone()),
        ]);

        for (key, value) in &self.project {
            if BUILTIN_VARS.contains(&key.as_str()) {
                if value.trim().is_empty() {
                    continue;
                }
                tracing::debug!(key = %key, "project value overrides built-in variable");
            }
            vars.insert(key.clone(), value.clone());
        }

        vars
    }
}

/// Fill missing or empty keys from their fallback key.
///
/// Fallbacks are resolved against the original values only, so chains
/// (`a -> b -> c`) are not followed.
pub fn apply_fallbacks(
    values: &BTreeMap<String, String>,
    fallbacks: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut resolved = values.clone();

    for (key, source) in fallbacks {
        let missing = values.get(key).is_none_or(|v| v.trim().is_empty());
        if !missing {
            continue;
        }
        if let Some(value) = values.get(source).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(key = %key, source = %source, "using placeholder fallback");
            resolved.insert(key.clone(), value.clone());
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase() -> PhaseDef {
        PhaseDef {
            id: "phase_2".to_string(),
            label: "Phase 2: External Environment".to_string(),
            themes: vec![theme()],
        }
    }

    fn theme() -> ThemeDef {
        ThemeDef {
            id: "3".to_string(),
            name: "Competitive Analysis".to_string(),
            main_question: "Who are we up against?".to_string(),
        }
    }

    fn project(entries: &[(&str, &str)]) -> ProjectConfig {
        let system = SystemConfig::default();
        ProjectConfig::from_entries(
            "/tmp/project_config.md",
            entries.iter().map(|(k, v)| (k.to_string(), v.to_string())),
            &system,
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    #[test]
    fn test_builtin_vars() {
        let system = SystemConfig::default();
        let project = project(&[("project_name", "Acme Growth"), ("industry", "retail")]);

        let ctx = PromptContext::with_date(&system, &project, &phase(), &theme(), 2, date());
        let vars = ctx.to_template_vars();

        assert_eq!(vars.get("phase"), Some(&"phase_2".to_string()));
        assert_eq!(
            vars.get("phase_label"),
            Some(&"Phase 2: External Environment".to_string())
        );
        assert_eq!(vars.get("theme"), Some(&"3".to_string()));
        assert_eq!(vars.get("theme_name"), Some(&"Competitive Analysis".to_string()));
        assert_eq!(
            vars.get("main_question"),
            Some(&"Who are we up against?".to_string())
        );
        assert_eq!(vars.get("step"), Some(&"2".to_string()));
        assert_eq!(vars.get("date"), Some(&"2026-03-09".to_string()));
        assert_eq!(vars.get("topic"), Some(&"Acme Growth".to_string()));
        assert_eq!(vars.get("reference_context"), Some(&String::new()));
        assert_eq!(vars.get("industry"), Some(&"retail".to_string()));
    }

    #[test]
    fn test_project_keys_override_builtins() {
        let system = SystemConfig::default();
        let project = project(&[("theme", "competitive analysis"), ("step", "99"), ("date", "")]);

        let vars = PromptContext::with_date(&system, &project, &phase(), &theme(), 1, date())
            .to_template_vars();

        assert_eq!(vars.get("theme"), Some(&"competitive analysis".to_string()));
        assert_eq!(vars.get("step"), Some(&"99".to_string()));
        assert_eq!(vars.get("date"), Some(&"2026-03-09".to_string()));
        assert_eq!(vars.get("theme_name"), Some(&"Competitive Analysis".to_string()));
    }

    #[test]
    fn test_topic_and_reference_overrides() {
        let system = SystemConfig::default();
        let project = project(&[("project_name", "Acme Growth")]);

        let vars = PromptContext::with_date(&system, &project, &phase(), &theme(), 1, date())
            .with_topic("Market Entry")
            .with_reference("previous report")
            .to_template_vars();

        assert_eq!(vars.get("topic"), Some(&"Market Entry".to_string()));
        assert_eq!(
            vars.get("reference_context"),
            Some(&"previous report".to_string())
        );
    }

    #[test]
    fn test_default_fallbacks_borrow_company_name() {
        let system = SystemConfig::default();
        let project = project(&[("company_name", "Acme"), ("division", "")]);

        let vars = PromptContext::with_date(&system, &project, &phase(), &theme(), 1, date())
            .to_template_vars();

        assert_eq!(vars.get("brand_name"), Some(&"Acme".to_string()));
        assert_eq!(vars.get("division"), Some(&"Acme".to_string()));
    }

    #[test]
    fn test_fallback_keeps_present_value() {
        let values = BTreeMap::from([
            ("company_name".to_string(), "Acme".to_string()),
            ("brand_name".to_string(), "AcmeOne".to_string()),
        ]);
        let fallbacks = BTreeMap::from([("brand_name".to_string(), "company_name".to_string())]);

        let resolved = apply_fallbacks(&values, &fallbacks);

        assert_eq!(resolved.get("brand_name"), Some(&"AcmeOne".to_string()));
    }

    #[test]
    fn test_fallback_without_source_leaves_key_missing() {
        let values = BTreeMap::new();
        let fallbacks = BTreeMap::from([("brand_name".to_string(), "company_name".to_string())]);

        let resolved = apply_fallbacks(&values, &fallbacks);

        assert!(resolved.get("brand_name").is_none());
    }

    #[test]
    fn test_fallback_chains_are_not_followed() {
        let values = BTreeMap::from([("c".to_string(), "value".to_string())]);
        let fallbacks = BTreeMap::from([
            ("a".to_string(), "b".to_string()),
            ("b".to_string(), "c".to_string()),
        ]);

        let resolved = apply_fallbacks(&values, &fallbacks);

        assert!(resolved.get("a").is_none());
        assert_eq!(resolved.get("b"), Some(&"value".to_string()));
    }
}
