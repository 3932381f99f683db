//! Default templates for a new research workspace.
//!
//! Every declared theme gets three step templates: current-state analysis,
//! strategy formulation and an action plan. Files are created atomically and
//! existing files are never touched.

use crate::config::SystemConfig;
use crate::error::{BsrsError, Result};
use crate::fs::{CreateOutcome, atomic_create_file};
use std::path::{Path, PathBuf};

/// Number of steps written per theme.
pub const DEFAULT_STEPS: u32 = 3;

/// Fill-in-the-blanks project document written next to the templates.
pub const PROJECT_TEMPLATE_FILE: &str = "project_config.template.md";

const STEP1_TEMPLATE: &str = r#"# {phase_label} / {theme_name} / Step 1: Current State Analysis

## Main Question
{main_question}

## Subject
{company_name} ({industry})

## Research Brief
Act as an expert in this field and analyze the current state from the following angles:

1. **Current situation**
   - Quantitative and qualitative analysis of where things stand today
   - Comparison with industry standards and best practices
   - Key strengths and weaknesses

2. **Data collection**
   - Latest market data and statistics
   - Relevant case studies and research
   - Citations from reliable sources

3. **Issues and opportunities**
   - Problems and room for improvement
   - Latent risks and opportunities
   - Differences from competitors

Structure the answer under "Current State Analysis", "Strategic Recommendations", "Action Plan" and "References".
"#;

const STEP2_TEMPLATE: &str = r#"# {phase_label} / {theme_name} / Step 2: Strategy Formulation

## Main Question
{main_question}

## Subject
{company_name} ({industry})

## Findings So Far
{reference_context}

## Research Brief
Building on the analysis above, propose a strategy:

1. **Strategic options**
   - At least three alternative strategies
   - Benefits, drawbacks and feasibility of each
   - Expected return on investment

2. **Recommended strategy**
   - The most effective option and the evidence for it
   - Expected outcomes and when they are reached
   - Required resources and preconditions

3. **Risk assessment**
   - Execution risks and mitigations
   - Fallback options
"#;

const STEP3_TEMPLATE: &str = r#"# {phase_label} / {theme_name} / Step 3: Action Plan

## Main Question
{main_question}

## Subject
{company_name} ({industry})

## Chosen Strategy
{reference_context}

## Research Brief
Draw up a concrete plan to carry out the chosen strategy:

1. **Action plan**
   - Tasks and milestones
   - Owners and delivery team
   - Timeline and deadlines

2. **Resources**
   - People (skills, headcount)
   - Budget (initial investment, running cost)
   - Tools and systems

3. **Success metrics (KPIs)**
   - Measurable targets
   - Monitoring method and cadence
   - Review criteria and triggers for course correction

4. **Implementation notes**
   - Expected obstacles and countermeasures
   - Stakeholder communication plan
   - Change management
"#;

const PROJECT_TEMPLATE: &str = r#"# Business Research Configuration

Fill in the brackets and save this file as project_config.md.

## 1. Project
- Project Name: []
- Research Objective: []
- Timeline: []

## 2. Company and Offering
- Company Name: []
- Industry: []
- Product/Service Overview: []

## 3. Market and Competition
- Target Market: []
- Region: []
- Competitors: []

## 4. Customers
- Target Customer Segment: []
- Customer Persona: []
"#;

/// Default template text for a step, if one exists.
pub fn default_template(step: u32) -> Option<&'static str> {
    match step {
        1 => Some(STEP1_TEMPLATE),
        2 => Some(STEP2_TEMPLATE),
        3 => Some(STEP3_TEMPLATE),
        _ => None,
    }
}

/// What a scaffold run did.
#[derive(Debug, Default)]
pub struct ScaffoldReport {
    /// Files written by this run.
    pub created: Vec<PathBuf>,
    /// Files left alone because they already existed.
    pub existing: Vec<PathBuf>,
    /// `phase/theme` pairs skipped because they already have templates.
    pub skipped_themes: Vec<String>,
}

/// Write default templates under `templates_dir` and the project document
/// template under `root`.
///
/// Without `force`, a theme that already has any template is skipped.
/// With `force`, missing step files are re-created for every theme.
pub fn scaffold(
    system: &SystemConfig,
    templates_dir: &Path,
    root: &Path,
    force: bool,
) -> Result<ScaffoldReport> {
    let mut report = ScaffoldReport::default();

    for phase in &system.phases {
        let phase_dir = templates_dir.join(&phase.id);
        for theme in &phase.themes {
            if !force && has_templates(&phase_dir, &theme.id)? {
                report.skipped_themes.push(format!("{}/{}", phase.id, theme.id));
                continue;
            }
            for step in 1..=DEFAULT_STEPS {
                let Some(text) = default_template(step) else {
                    continue;
                };
                let path = phase_dir.join(format!("{}_step{}.md", theme.id, step));
                record(&mut report, path.clone(), atomic_create_file(&path, text)?);
            }
        }
    }

    let project_template = root.join(PROJECT_TEMPLATE_FILE);
    let outcome = atomic_create_file(&project_template, PROJECT_TEMPLATE)?;
    record(&mut report, project_template, outcome);

    tracing::info!(
        created = report.created.len(),
        existing = report.existing.len(),
        skipped = report.skipped_themes.len(),
        "scaffold finished"
    );
    Ok(report)
}

fn record(report: &mut ScaffoldReport, path: PathBuf, outcome: CreateOutcome) {
    match outcome {
        CreateOutcome::Created => {
            tracing::debug!(path = %path.display(), "created");
            report.created.push(path);
        }
        CreateOutcome::AlreadyExists => report.existing.push(path),
    }
}

/// Whether `phase_dir` holds any `<theme>_step<N>.md` file.
fn has_templates(phase_dir: &Path, theme: &str) -> Result<bool> {
    if !phase_dir.is_dir() {
        return Ok(false);
    }
    let entries = std::fs::read_dir(phase_dir).map_err(|e| {
        BsrsError::UserError(format!(
            "failed to read template directory '{}': {}",
            phase_dir.display(),
            e
        ))
    })?;

    let prefix = format!("{}_step", theme);
    Ok(entries.filter_map(|e| e.ok()).any(|entry| {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            return false;
        };
        name.strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(".md"))
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    }))
}
