//! Filesystem utilities for bsrs.
//!
//! Output artifacts are created atomically and never overwrite an existing
//! file, so a failed run leaves the output directory unchanged.

pub mod atomic;

pub use atomic::{CreateOutcome, atomic_create_file};
