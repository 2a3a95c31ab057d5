//! Interactive review.
//!
//! This module provides the generic pager and the displayers that feed it
//! drift results and orphan reports.

mod displayers;
mod paginator;

pub use displayers::{DiffDisplayer, OrphanDisplayer, orphan_table};
pub use paginator::{Displayer, ReviewCommand, ReviewOutcome, ReviewPaginator};
