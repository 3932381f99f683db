//! Configuration for bsrs.
//!
//! Two documents feed every run:
//!
//! - the system config (`config/system_config.json`): phase taxonomy,
//!   required project fields, quality thresholds and output policy
//! - the project config (`project_config.md` or `.yaml`): the user's
//!   research parameters, substituted into prompt templates
//!
//! Both are loaded once into immutable values and passed to each component.

mod model;
mod operations;
mod project;
pub mod types;


// Re-export public API
pub use model::SystemConfig;
pub use project::{ProjectConfig, discover_project_config};
pub use types::{NamingPolicy, PhaseDef, QualityThresholds, ThemeDef};
