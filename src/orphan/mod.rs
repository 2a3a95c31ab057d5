//! Orphan detection.
//!
//! This module provides set subtraction over resource identities, the
//! catalog of cluster-scoped kinds, and the detector that combines both with
//! the project's ignore rules.

mod catalog;
mod detector;
mod set_diff;

pub use catalog::{ClusterScopedKind, DEFAULT_CLUSTER_SCOPED_KINDS, default_catalog};
pub use detector::{
    OrphanDetector, OrphanRecord, OrphanReport, cluster_scoped_orphans, namespaced_orphans,
};
pub use set_diff::subtract;
