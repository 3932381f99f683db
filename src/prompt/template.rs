//! Template engine for placeholder substitution.
//!
//! # Syntax
//!
//! - `{name}` - Substitutes the value of variable `name`. Names match
//!   `[A-Za-z_][A-Za-z0-9_.-]*` and are looked up exactly (case-sensitive,
//!   no whitespace).
//! - `{{` - Renders as literal `{`
//! - `}}` - Renders as literal `}`
//! - A lone `}` is literal text
//!
//! Any other use of `{` is a syntax error, so a template that shows code or
//! JSON must write `{{` for every opening brace. Values are inserted verbatim
//! and never scanned for placeholders.
//!
//! # Error Handling
//!
//! Rendering is all-or-nothing: an undefined variable or a syntax error fails
//! the whole render, and no partially substituted text is returned.

use std::collections::HashMap;
use std::fmt;

/// Error type for template rendering failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A variable was referenced but not provided.
    UndefinedVariable {
        /// The name of the undefined variable.
        name: String,
        /// Byte offset of the opening `{`.
        position: usize,
    },
    /// A `{` was found without a matching `}`.
    UnmatchedBrace {
        /// Byte offset of the unmatched `{`.
        position: usize,
    },
    /// An empty variable name was found (e.g., `{}`).
    EmptyVariableName {
        /// Byte offset of the opening `{`.
        position: usize,
    },
    /// The text between braces is not a valid variable name.
    InvalidVariableName {
        /// The offending text.
        name: String,
        /// Byte offset of the opening `{`.
        position: usize,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UndefinedVariable { name, position } => {
                write!(
                    f,
                    "undefined variable '{}' at position {} in template",
                    name, position
                )
            }
            TemplateError::UnmatchedBrace { position } => {
                write!(f, "unmatched '{{' at position {} in template", position)
            }
            TemplateError::EmptyVariableName { position } => {
                write!(
                    f,
                    "empty variable name '{{}}' at position {} in template",
                    position
                )
            }
            TemplateError::InvalidVariableName { name, position } => {
                write!(
                    f,
                    "invalid variable name '{}' at position {} in template (write '{{{{' for a literal brace)",
                    name, position
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// A parsed piece of template text.
enum Segment<'a> {
    Literal(char),
    Placeholder { name: &'a str, position: usize },
}

/// Split a template into literal characters and placeholders.
fn parse(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut segments = Vec::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                // Check for escape sequence {{
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    segments.push(Segment::Literal('{'));
                    continue;
                }

                let start = pos + 1;
                let end = loop {
                    match chars.next() {
                        Some((end, '}')) => break end,
                        Some(_) => {}
                        None => return Err(TemplateError::UnmatchedBrace { position: pos }),
                    }
                };

                let name = &template[start..end];
                if name.is_empty() {
                    return Err(TemplateError::EmptyVariableName { position: pos });
                }
                if !is_valid_name(name) {
                    return Err(TemplateError::InvalidVariableName {
                        name: name.to_string(),
                        position: pos,
                    });
                }
                segments.push(Segment::Placeholder {
                    name,
                    position: pos,
                });
            }
            '}' => {
                // Both `}}` and a lone `}` render as a single brace
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                }
                segments.push(Segment::Literal('}'));
            }
            _ => segments.push(Segment::Literal(ch)),
        }
    }

    Ok(segments)
}

/// Whether `name` is a valid placeholder name.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Render a template string by substituting variables.
///
/// # Returns
///
/// * `Ok(String)` - The rendered string with all variables substituted
/// * `Err(TemplateError)` - The first undefined variable in template order,
///   or the first syntax error
///
/// # Examples
///
/// ```text
/// vars = {theme: "competitive analysis", industry: "retail"}
/// "Analyze {theme} in the {industry} sector."
///   -> "Analyze competitive analysis in the retail sector."
/// "Use {{braces}}" -> "Use {braces}"
/// ```
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let segments = parse(template)?;
    let mut result = String::with_capacity(template.len());

    for segment in segments {
        match segment {
            Segment::Literal(ch) => result.push(ch),
            Segment::Placeholder { name, position } => match variables.get(name) {
                Some(value) => result.push_str(value),
                None => {
                    return Err(TemplateError::UndefinedVariable {
                        name: name.to_string(),
                        position,
                    });
                }
            },
        }
    }

    Ok(result)
}

/// List the distinct placeholder names a template references, in order of
/// first appearance.
pub fn placeholders(template: &str) -> Result<Vec<String>, TemplateError> {
    let mut names: Vec<String> = Vec::new();
    for segment in parse(template)? {
        if let Segment::Placeholder { name, .. } = segment
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Helper to create a variables map from a list of key-value pairs.
#[cfg(test)]
pub fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_scenario() {
        let vars = vars([("theme", "competitive analysis"), ("industry", "retail")]);
        let result = render_template("Analyze {theme} in the {industry} sector.", &vars).unwrap();
        assert_eq!(result, "Analyze competitive analysis in the retail sector.");
    }

    #[test]
    fn test_research_scenario_missing_key() {
        let vars = vars([("theme", "competitive analysis")]);
        let err = render_template("Analyze {theme} in the {industry} sector.", &vars).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedVariable {
                name: "industry".to_string(),
                position: 23,
            }
        );
    }

    #[test]
    fn test_no_variables() {
        let vars = HashMap::new();
        let result = render_template("Just plain text", &vars).unwrap();
        assert_eq!(result, "Just plain text");
    }

    #[test]
    fn test_empty_template() {
        let vars = HashMap::new();
        assert_eq!(render_template("", &vars).unwrap(), "");
    }

    #[test]
    fn test_escape_braces() {
        let vars = HashMap::new();
        let result = render_template("Use {{var}} for variables", &vars).unwrap();
        assert_eq!(result, "Use {var} for variables");
    }

    #[test]
    fn test_escaped_json_example() {
        let vars = vars([("company_name", "Acme")]);
        let template = "Reply as JSON: {{\"company\": \"{company_name}\"}}";
        let result = render_template(template, &vars).unwrap();
        assert_eq!(result, "Reply as JSON: {\"company\": \"Acme\"}");
    }

    #[test]
    fn test_lone_closing_brace() {
        let vars = HashMap::new();
        assert_eq!(render_template("a } b", &vars).unwrap(), "a } b");
    }

    #[test]
    fn test_unescaped_json_is_rejected() {
        let vars = HashMap::new();
        let err = render_template("{\"a\": 1}", &vars).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::InvalidVariableName { position: 0, .. }
        ));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let vars = vars([("Industry", "retail")]);
        let err = render_template("{industry}", &vars).unwrap_err();
        assert!(matches!(err, TemplateError::UndefinedVariable { ref name, .. } if name == "industry"));
    }

    #[test]
    fn test_whitespace_in_name_is_invalid() {
        let vars = vars([("name", "Alice")]);
        let err = render_template("Hello { name }!", &vars).unwrap_err();
        assert_eq!(
            err,
            TemplateError::InvalidVariableName {
                name: " name ".to_string(),
                position: 6,
            }
        );
    }

    #[test]
    fn test_unmatched_brace_error() {
        let vars = HashMap::new();
        let err = render_template("Hello {name", &vars).unwrap_err();
        assert_eq!(err, TemplateError::UnmatchedBrace { position: 6 });
    }

    #[test]
    fn test_empty_variable_name_error() {
        let vars = HashMap::new();
        let err = render_template("Hello {}", &vars).unwrap_err();
        assert_eq!(err, TemplateError::EmptyVariableName { position: 6 });
    }

    #[test]
    fn test_syntax_error_reported_before_missing_variable() {
        let vars = HashMap::new();
        let err = render_template("{missing} then {", &vars).unwrap_err();
        assert_eq!(err, TemplateError::UnmatchedBrace { position: 15 });
    }

    #[test]
    fn test_multiple_occurrences() {
        let vars = vars([("x", "X")]);
        assert_eq!(render_template("{x}-{x}-{x}", &vars).unwrap(), "X-X-X");
    }

    #[test]
    fn test_adjacent_variables() {
        let vars = vars([("a", "A"), ("b", "B")]);
        assert_eq!(render_template("{a}{b}", &vars).unwrap(), "AB");
    }

    #[test]
    fn test_dotted_and_dashed_names() {
        let vars = vars([("market.size", "10B"), ("go-live", "Q3")]);
        let result = render_template("{market.size} by {go-live}", &vars).unwrap();
        assert_eq!(result, "10B by Q3");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let vars = vars([("code", "{industry}")]);
        let result = render_template("Code: {code}", &vars).unwrap();
        assert_eq!(result, "Code: {industry}");
    }

    #[test]
    fn test_resubstitution_is_noop_without_delimiters() {
        let vars = vars([("theme", "pricing"), ("industry", "retail")]);
        let once = render_template("Study {theme} for {industry}.", &vars).unwrap();
        let twice = render_template(&once, &vars).unwrap();
        assert_eq!(once, twice);
        assert!(!once.contains('{') && !once.contains('}'));
    }

    #[test]
    fn test_unicode_in_template_and_values() {
        let vars = vars([("company_name", "株式会社アクメ"), ("industry", "小売")]);
        let result = render_template("{company_name}の{industry}市場を分析", &vars).unwrap();
        assert_eq!(result, "株式会社アクメの小売市場を分析");
    }

    #[test]
    fn test_position_is_byte_offset() {
        let vars = HashMap::new();
        let err = render_template("日本{x}", &vars).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedVariable {
                name: "x".to_string(),
                position: 6,
            }
        );
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("industry"));
        assert!(is_valid_name("_private"));
        assert!(is_valid_name("a.b-c_1"));
        assert!(!is_valid_name("1st"));
        assert!(!is_valid_name("two words"));
        assert!(!is_valid_name("\"a\": 1"));
        assert!(!is_valid_name(""));
    }

    #[test]
    fn test_placeholders_in_order_without_duplicates() {
        let names = placeholders("{b} {a} {{c}} {b}").unwrap();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_error_display() {
        let err = TemplateError::UndefinedVariable {
            name: "foo".to_string(),
            position: 10,
        };
        assert_eq!(
            err.to_string(),
            "undefined variable 'foo' at position 10 in template"
        );

        let err = TemplateError::UnmatchedBrace { position: 5 };
        assert_eq!(err.to_string(), "unmatched '{' at position 5 in template");

        let err = TemplateError::EmptyVariableName { position: 3 };
        assert_eq!(
            err.to_string(),
            "empty variable name '{}' at position 3 in template"
        );

        let err = TemplateError::InvalidVariableName {
            name: "a b".to_string(),
            position: 0,
        };
        assert_eq!(
            err.to_string(),
            "invalid variable name 'a b' at position 0 in template (write '{{' for a literal brace)"
        );
    }
}
