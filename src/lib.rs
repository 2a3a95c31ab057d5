// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # appdrift
//!
//! Drift and orphan review for GitOps-managed Kubernetes resources.
//!
//! ## Overview
//!
//! appdrift answers two questions about a cluster managed by a GitOps
//! controller:
//!
//! - Does the live state of each managed resource differ from its declared
//!   state once noise fields are stripped?
//! - Which live resources are no longer declared by any application?
//!
//! ## Architecture
//!
//! The core is synchronous and holds no state between calls:
//!
//! 1. **Normalization**: noise fields and ignored paths are removed from copies of each state
//! 2. **Diff**: normalized states are compared and rendered as a unified diff
//! 3. **Orphans**: live inventories minus managed inventories, filtered by ignore rules
//!
//! Inventories reach the core through the async [`inventory::InventorySource`]
//! trait, and results are reviewed page by page with [`review::ReviewPaginator`].
//!
//! ## Modules
//!
//! - [`resource`]: Resource identities, states and ignore rules
//! - [`normalize`]: State normalizer and normalizer chain
//! - [`diff`]: Diff engine and unified diff rendering
//! - [`orphan`]: Set subtraction, cluster-scoped catalog and orphan detection
//! - [`inventory`]: Inventory collaborator trait and snapshot source
//! - [`review`]: Interactive pager and displayers
//! - [`config`]: Configuration parsing and validation
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! project: default
//! review:
//!   diff_page_size: 1
//!   orphan_page_size: 20
//! diff:
//!   context_lines: 3
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod inventory;
pub mod normalize;
pub mod orphan;
pub mod resource;
pub mod review;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, DriftConfig};
pub use diff::{DiffEngine, DiffOptions, DiffResult, DiffSummary, Hunk, UnifiedDiff};
pub use error::{AppDriftError, Result};
pub use inventory::{InventorySource, SnapshotSource};
pub use normalize::{NormalizerChain, StateNormalizer};
pub use orphan::{ClusterScopedKind, OrphanDetector, OrphanRecord, OrphanReport, subtract};
pub use resource::{IgnoreRule, ResourceIdentity, is_ignored};
pub use review::{Displayer, ReviewPaginator};
