//! Drift detection between target and live resource state.
//!
//! This module decides whether a resource is out of sync after normalization
//! and renders the difference as a unified diff for review.

mod digest;
mod engine;
mod render;

pub use digest::state_digest;
pub use engine::{DiffEngine, DiffOptions, DiffResult, DiffSummary};
pub use render::{
    DEFAULT_CONTEXT_LINES, DiffLine, Hunk, LineKind, UnifiedDiff, canonical_text, positional_hunks,
};
