//! Artifact naming: topic slugs, file names and disambiguating suffixes.

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// What an output artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// A resolved prompt, ready to paste into a chat tool.
    Prompt,
    /// A research result pasted back by the user.
    Report,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Prompt => "prompt",
            ArtifactKind::Report => "report",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "prompt" => Some(Self::Prompt),
            "report" => Some(Self::Report),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format: `{theme}_step{step}_{kind}_{suffix}.md`
static ARTIFACT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<theme>[A-Za-z0-9_-]+?)_step(?P<step>\d+)_(?P<kind>prompt|report)_(?P<suffix>[0-9A-Za-z]+(?:-\d+)?)\.md$",
    )
    .expect("Invalid artifact name regex")
});

/// The parts encoded in an artifact file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub theme: String,
    pub step: u32,
    pub kind: ArtifactKind,
    pub suffix: String,
}

/// Build an artifact file name.
pub fn artifact_file_name(theme: &str, step: u32, kind: ArtifactKind, suffix: &str) -> String {
    format!("{}_step{}_{}_{}.md", theme, step, kind, suffix)
}

/// Parse an artifact file name; `None` for anything else in the directory.
pub fn parse_artifact_name(name: &str) -> Option<ParsedName> {
    let caps = ARTIFACT_NAME.captures(name)?;
    Some(ParsedName {
        theme: caps["theme"].to_string(),
        step: caps["step"].parse().ok()?,
        kind: ArtifactKind::from_str(&caps["kind"])?,
        suffix: caps["suffix"].to_string(),
    })
}

/// Sanitize a topic for use as a directory name.
///
/// Lowercases, keeps letters and digits (including non-ASCII), collapses
/// every other run of characters into one hyphen, and trims hyphens.
pub fn topic_slug(topic: &str) -> String {
    let mut result = String::new();
    let mut last_was_hyphen = true; // Start true to avoid leading hyphen

    for c in topic.chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "untitled".to_string()
    } else {
        result
    }
}

/// Append a collision counter to a base suffix (`base`, `base-2`, `base-3`, ...).
pub fn with_counter(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

/// Zero-padded sequence suffix.
pub fn sequence_suffix(n: u32) -> String {
    format!("{:03}", n)
}

/// Numeric value of a pure sequence suffix.
pub fn sequence_number(suffix: &str) -> Option<u32> {
    if suffix.chars().all(|c| c.is_ascii_digit()) {
        suffix.parse().ok()
    } else {
        None
    }
}

/// Order two suffixes from oldest to newest.
///
/// Bases compare by length then text, so `1000` sorts after `999` and
/// equal-length timestamps sort chronologically. Collision counters break
/// ties numerically.
pub fn compare_suffixes(a: &str, b: &str) -> Ordering {
    let (a_base, a_counter) = split_counter(a);
    let (b_base, b_counter) = split_counter(b);

    a_base
        .len()
        .cmp(&b_base.len())
        .then_with(|| a_base.cmp(b_base))
        .then_with(|| a_counter.cmp(&b_counter))
}

fn split_counter(suffix: &str) -> (&str, u32) {
    match suffix.rsplit_once('-') {
        Some((base, counter)) => match counter.parse() {
            Ok(n) => (base, n),
            Err(_) => (suffix, 1),
        },
        None => (suffix, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_slug() {
        assert_eq!(topic_slug("Acme Growth 2026"), "acme-growth-2026");
        assert_eq!(topic_slug("  --Retail / E-Commerce!! "), "retail-e-commerce");
        assert_eq!(topic_slug("新規事業 戦略"), "新規事業-戦略");
        assert_eq!(topic_slug("!!!"), "untitled");
        assert_eq!(topic_slug(""), "untitled");
    }

    #[test]
    fn test_artifact_file_name_roundtrip() {
        let name = artifact_file_name("3", 2, ArtifactKind::Prompt, "20261018T101500123");
        assert_eq!(name, "3_step2_prompt_20261018T101500123.md");

        let parsed = parse_artifact_name(&name).unwrap();
        assert_eq!(parsed.theme, "3");
        assert_eq!(parsed.step, 2);
        assert_eq!(parsed.kind, ArtifactKind::Prompt);
        assert_eq!(parsed.suffix, "20261018T101500123");
    }

    #[test]
    fn test_parse_theme_with_underscores() {
        let parsed = parse_artifact_name("go_to_market_step1_report_001-2.md").unwrap();
        assert_eq!(parsed.theme, "go_to_market");
        assert_eq!(parsed.step, 1);
        assert_eq!(parsed.kind, ArtifactKind::Report);
        assert_eq!(parsed.suffix, "001-2");
    }

    #[test]
    fn test_parse_rejects_other_files() {
        assert!(parse_artifact_name("events.ndjson").is_none());
        assert!(parse_artifact_name("3_step2_draft_001.md").is_none());
        assert!(parse_artifact_name(".3_step2_prompt_001.md.4242.tmp").is_none());
        assert!(parse_artifact_name("notes.md").is_none());
    }

    #[test]
    fn test_with_counter() {
        assert_eq!(with_counter("base", 1), "base");
        assert_eq!(with_counter("base", 2), "base-2");
        assert_eq!(with_counter("base", 10), "base-10");
    }

    #[test]
    fn test_sequence_helpers() {
        assert_eq!(sequence_suffix(1), "001");
        assert_eq!(sequence_suffix(1234), "1234");
        assert_eq!(sequence_number("007"), Some(7));
        assert_eq!(sequence_number("20261018T101500123"), None);
    }

    #[test]
    fn test_compare_suffixes() {
        assert_eq!(compare_suffixes("999", "1000"), Ordering::Less);
        assert_eq!(compare_suffixes("002", "010"), Ordering::Less);
        assert_eq!(
            compare_suffixes("20261018T101500123", "20261018T101500124"),
            Ordering::Less
        );
        assert_eq!(
            compare_suffixes("20261018T101500123-2", "20261018T101500123-10"),
            Ordering::Less
        );
        assert_eq!(
            compare_suffixes("20261018T101500123", "20261018T101500123-2"),
            Ordering::Less
        );
        assert_eq!(compare_suffixes("005", "005"), Ordering::Equal);
    }
}
