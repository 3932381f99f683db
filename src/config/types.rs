//! Configuration types and defaults for bsrs.
//!
//! This module defines the phase taxonomy, quality thresholds, output
//! settings, and the default value functions used by `SystemConfig`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How disambiguating suffixes are chosen for output artifact names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// UTC timestamp with millisecond precision (default).
    #[default]
    Timestamp,
    /// Zero-padded counter one past the highest existing one.
    Sequence,
}

/// A theme within a phase. Each theme owns one template per step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDef {
    /// Identifier used in template file names (e.g., `3` or `A`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// The question the theme's research should answer.
    #[serde(default)]
    pub main_question: String,
}

/// A top-level research phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDef {
    /// Identifier used as the template subdirectory (e.g., `phase_2`).
    pub id: String,
    /// Display label shown during selection.
    pub label: String,
    /// Themes in display order.
    #[serde(default)]
    pub themes: Vec<ThemeDef>,
}

impl PhaseDef {
    /// Find a theme of this phase by id.
    pub fn theme(&self, id: &str) -> Option<&ThemeDef> {
        self.themes.iter().find(|t| t.id == id)
    }
}

/// Thresholds applied when checking a pasted-back report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Minimum report length in characters.
    pub min_chars: usize,
    /// Minimum number of numbered references carrying a URL.
    pub min_sources: usize,
    /// Section titles that must appear in the report.
    pub required_sections: Vec<String>,
    /// Whether the report must contain an image or a markdown table.
    pub require_charts: bool,
    /// Minimum score (0-100) for the report to pass.
    pub pass_score: u32,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_chars: 3000,
            min_sources: 10,
            required_sections: default_required_sections(),
            require_charts: true,
            pass_score: 70,
        }
    }
}

/// Where and how output artifacts are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output directory, relative to the workspace root.
    pub dir: String,
    /// Suffix policy for artifact names.
    pub naming: NamingPolicy,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: "outputs".to_string(),
            naming: NamingPolicy::default(),
        }
    }
}

pub fn default_required_sections() -> Vec<String> {
    vec![
        "Current State Analysis".to_string(),
        "Strategic Recommendations".to_string(),
        "Action Plan".to_string(),
        "References".to_string(),
    ]
}

pub fn default_required_fields() -> Vec<String> {
    vec![
        "project_name".to_string(),
        "company_name".to_string(),
        "industry".to_string(),
    ]
}

pub fn default_placeholder_fallbacks() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("brand_name".to_string(), "company_name".to_string()),
        ("division".to_string(), "company_name".to_string()),
    ])
}

/// Labels accepted in the project document, mapped to canonical keys.
///
/// The project config template is written for Japanese and English users,
/// so both label sets resolve to the same keys.
pub fn default_key_aliases() -> BTreeMap<String, String> {
    const ALIASES: &[(&str, &str)] = &[
        ("プロジェクト名", "project_name"),
        ("自社名", "company_name"),
        ("業界", "industry"),
        ("製品/サービスの概要", "product_service"),
        ("対象市場", "target_market"),
        ("国・地域", "region"),
        ("競合企業", "competitors"),
        ("ターゲット顧客セグメント", "target_customer"),
        ("顧客ペルソナ", "persona"),
        ("調査目的", "objective"),
        ("タイムライン", "timeline"),
        ("Project Name", "project_name"),
        ("Company Name", "company_name"),
        ("Industry", "industry"),
        ("Product/Service Overview", "product_service"),
        ("Target Market", "target_market"),
        ("Region", "region"),
        ("Competitors", "competitors"),
        ("Target Customer Segment", "target_customer"),
        ("Customer Persona", "persona"),
        ("Research Objective", "objective"),
        ("Timeline", "timeline"),
    ];
    ALIASES
        .iter()
        .map(|(label, key)| (label.to_string(), key.to_string()))
        .collect()
}

pub fn default_selection_attempts() -> u32 {
    3
}

pub fn default_max_reference_chars() -> usize {
    6000
}

pub fn default_templates_dir() -> String {
    "prompts".to_string()
}

pub fn default_true() -> bool {
    true
}

fn theme(id: &str, name: &str, main_question: &str) -> ThemeDef {
    ThemeDef {
        id: id.to_string(),
        name: name.to_string(),
        main_question: main_question.to_string(),
    }
}

fn phase(id: &str, label: &str, themes: Vec<ThemeDef>) -> PhaseDef {
    PhaseDef {
        id: id.to_string(),
        label: label.to_string(),
        themes,
    }
}

/// The nine-phase research programme used when no system config exists.
pub fn default_phases() -> Vec<PhaseDef> {
    vec![
        phase(
            "phase_1",
            "Phase I: Internal Environment and Business Model Assessment",
            vec![
                theme("A", "Business Model Assessment", "How sound is the current business model and where does it create value?"),
                theme("B", "Internal Capabilities", "Which capabilities and resources give us a durable edge?"),
            ],
        ),
        phase(
            "phase_2",
            "Phase II: External Environment and Opportunity Identification",
            vec![
                theme("1", "Market Environment", "Which macro trends shape demand in our market?"),
                theme("2", "Industry Structure", "How attractive is the industry and where do profits pool?"),
                theme("3", "Competitor Analysis", "How do our main competitors win and where are they exposed?"),
                theme("4", "Technology Trends", "Which technologies will change how the market is served?"),
            ],
        ),
        phase(
            "phase_3",
            "Phase III: Target Customers and Insights",
            vec![
                theme("5", "Customer Segmentation", "Which segments should we serve first and why?"),
                theme("6", "Purchase Journey", "How do target customers discover, compare and buy?"),
                theme("7", "Customer Experience", "Where does the current experience fail the customer?"),
            ],
        ),
        phase(
            "phase_4",
            "Phase IV: Value Proposition and Go-to-Market Strategy",
            vec![
                theme("8", "Product Strategy", "What offering best fits the chosen segments?"),
                theme("9", "Brand Positioning", "What position can the brand credibly own?"),
                theme("10", "Go-to-Market Plan", "Through which channels and sequence do we enter?"),
                theme("11", "Partnerships", "Which partners accelerate reach or capability?"),
            ],
        ),
        phase(
            "phase_5",
            "Phase V: Growth Strategy and Profitability",
            vec![
                theme("12", "Geographic Expansion", "Which markets should follow the home market?"),
                theme("13", "Growth Levers", "Which levers compound growth at acceptable cost?"),
                theme("14", "Unit Economics", "Is each customer profitable, and when?"),
                theme("15", "Pricing and Freemium Model", "How should pricing tiers convert free users?"),
            ],
        ),
        phase(
            "phase_6",
            "Phase VI: Marketing Communication Strategy",
            vec![
                theme("16", "Marketing Strategy", "What is the overall communication strategy?"),
                theme("17", "Creative Strategy", "Which messages and formats resonate?"),
                theme("18", "Public Relations", "How do we earn attention and trust?"),
                theme("19", "Media Planning", "How should the media budget be allocated?"),
                theme("20", "YouTube", "How do we use long-form video?"),
                theme("21", "Instagram", "How do we use visual social channels?"),
                theme("22", "X (Twitter)", "How do we use real-time conversation?"),
                theme("23", "TikTok", "How do we use short-form video?"),
                theme("24", "Affiliate Marketing", "Can affiliates acquire customers profitably?"),
                theme("25", "Influencer Marketing", "Which creators move our audience?"),
                theme("26", "Community", "How do we build a community around the product?"),
            ],
        ),
        phase(
            "phase_7",
            "Phase VII: Organization and Infrastructure for Execution",
            vec![
                theme("27", "Marketing Technology", "Which tools does the team need?"),
                theme("28", "Sales Enablement", "How do we equip sales to close?"),
                theme("29", "KPI Design", "Which metrics steer the strategy?"),
                theme("30", "Talent and Budget", "Which people and budget does execution need?"),
                theme("31", "Data-Driven Decisions", "How do decisions use data consistently?"),
                theme("32", "Organizational Change", "How does the organization adapt?"),
            ],
        ),
        phase(
            "phase_8",
            "Phase VIII: Sustainability and Risk Management",
            vec![
                theme("33", "ESG Strategy", "How does the strategy address ESG expectations?"),
                theme("34", "Risk Management", "Which risks threaten the plan and how are they mitigated?"),
                theme("35", "Crisis Management", "How do we respond when something goes wrong?"),
            ],
        ),
        phase(
            "final_phase",
            "Final Phase: Integrated Strategy and Recommendations",
            vec![theme("Z", "Integrated Strategy", "What is the integrated strategy and the first 90 days of execution?")],
        ),
    ]
}
