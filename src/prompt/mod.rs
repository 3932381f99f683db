//! Prompt resolution.
//!
//! This module provides:
//!
//! - **Template**: Placeholder substitution engine
//! - **Context**: Built-in and project variables for a selected template
//! - **Reference**: Earlier reports inserted as `{reference_context}`
//! - **Generator**: Template file to resolved prompt
//!
//! # Template Syntax
//!
//! Templates use `{variable}` placeholders:
//!
//! ```text
//! # {phase_label} / {theme_name}
//!
//! Company: {company_name} ({industry})
//!
//! {reference_context}
//! ```
//!
//! Use `{{` to escape and render a literal `{`.

mod context;
mod generator;
mod reference;
pub mod template;

pub use context::{BUILTIN_VARS, PromptContext, apply_fallbacks};
pub use generator::{ResolvedPrompt, generate_prompt};
pub use reference::gather_reference_context;
pub use template::placeholders;
