//! Output artifacts for bsrs.
//!
//! Resolved prompts and pasted-back reports are written under the output
//! directory as
//!
//! ```text
//! <output_dir>/<topic-slug>/<phase>/<theme>_step<N>_<kind>_<suffix>.md
//! ```
//!
//! The directory is append-only: artifacts are created atomically, never
//! edited, and never overwritten. The suffix comes from the configured
//! [`NamingPolicy`](crate::config::NamingPolicy).

mod index;
mod naming;
mod writer;

#[cfg(test)]
mod tests;

pub use index::ArtifactIndex;
pub use naming::ArtifactKind;
pub use writer::{ArtifactMeta, OutputWriter};
