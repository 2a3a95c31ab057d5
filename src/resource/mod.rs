//! Resource model shared by the diff and orphan engines.
//!
//! This module defines resource identities, parsed resource state and the
//! ignore rules and directives that exclude resources or fields.

mod identity;
mod ignore;
mod state;

pub use identity::{ResourceIdentity, group_of};
pub use ignore::{IgnoreDirective, IgnoreRule, WILDCARD, is_ignored, rules_from_project};
pub use state::{NULL_TOKEN, ResourceState, is_absent, parse_document};
