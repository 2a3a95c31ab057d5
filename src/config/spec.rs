//! Configuration specification types.
//!
//! This module defines the structs that map to the `appdrift.yaml` file.
//! Every section has defaults, so an empty or missing file is a valid
//! configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::diff::{DEFAULT_CONTEXT_LINES, DiffOptions};
use crate::orphan::{ClusterScopedKind, default_catalog};

/// Default number of resources per page in diff review.
pub const DEFAULT_DIFF_PAGE_SIZE: usize = 1;

/// Default number of orphans per page in orphan review.
pub const DEFAULT_ORPHAN_PAGE_SIZE: usize = 20;

/// The root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriftConfig {
    /// Project scanned for orphans when none is given on the command line.
    #[serde(default = "default_project")]
    pub project: String,
    /// Interactive review settings.
    #[serde(default)]
    pub review: ReviewConfig,
    /// Diff rendering settings.
    #[serde(default)]
    pub diff: DiffConfig,
    /// Cluster-scoped kinds to scan. Replaces the built-in catalog when set.
    #[serde(default)]
    pub catalog: Option<Vec<ClusterScopedKind>>,
}

/// Interactive review settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ReviewConfig {
    /// Resources per page in diff review.
    #[serde(default = "default_diff_page_size")]
    #[validate(range(min = 1, max = 1000, message = "must be between 1 and 1000"))]
    pub diff_page_size: usize,
    /// Orphans per page in orphan review.
    #[serde(default = "default_orphan_page_size")]
    #[validate(range(min = 1, max = 1000, message = "must be between 1 and 1000"))]
    pub orphan_page_size: usize,
    /// Hide diff bodies of resources whose application upstream reports as
    /// synced.
    #[serde(default = "default_true")]
    pub trust_upstream_sync: bool,
}

/// Diff rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct DiffConfig {
    /// Context lines around each change.
    #[serde(default = "default_context_lines")]
    #[validate(range(max = 100, message = "must be at most 100"))]
    pub context_lines: usize,
}

fn default_project() -> String {
    String::from("default")
}

const fn default_diff_page_size() -> usize {
    DEFAULT_DIFF_PAGE_SIZE
}

const fn default_orphan_page_size() -> usize {
    DEFAULT_ORPHAN_PAGE_SIZE
}

const fn default_true() -> bool {
    true
}

const fn default_context_lines() -> usize {
    DEFAULT_CONTEXT_LINES
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            review: ReviewConfig::default(),
            diff: DiffConfig::default(),
            catalog: None,
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            diff_page_size: DEFAULT_DIFF_PAGE_SIZE,
            orphan_page_size: DEFAULT_ORPHAN_PAGE_SIZE,
            trust_upstream_sync: true,
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }
}

impl DriftConfig {
    /// Returns the configured catalog, or the built-in one.
    #[must_use]
    pub fn effective_catalog(&self) -> Vec<ClusterScopedKind> {
        self.catalog.clone().unwrap_or_else(default_catalog)
    }

    /// Returns true if the built-in catalog is in use.
    #[must_use]
    pub const fn uses_default_catalog(&self) -> bool {
        self.catalog.is_none()
    }

    /// Builds diff engine options from this configuration.
    #[must_use]
    pub const fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            context_lines: self.diff.context_lines,
            trust_upstream_sync: self.review.trust_upstream_sync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DriftConfig::default();
        assert_eq!(config.project, "default");
        assert_eq!(config.review.diff_page_size, 1);
        assert_eq!(config.review.orphan_page_size, 20);
        assert!(config.review.trust_upstream_sync);
        assert_eq!(config.diff.context_lines, 3);
        assert!(config.uses_default_catalog());
        assert_eq!(config.effective_catalog().len(), 12);
    }

    #[test]
    fn test_custom_catalog_replaces_default() {
        let config = DriftConfig {
            catalog: Some(vec![ClusterScopedKind::new("Namespace", "")]),
            ..DriftConfig::default()
        };
        assert_eq!(config.effective_catalog(), vec![ClusterScopedKind::new("Namespace", "")]);
    }

    #[test]
    fn test_diff_options() {
        let mut config = DriftConfig::default();
        config.diff.context_lines = 5;
        config.review.trust_upstream_sync = false;

        let options = config.diff_options();
        assert_eq!(options.context_lines, 5);
        assert!(!options.trust_upstream_sync);
    }

    #[test]
    fn test_range_validation() {
        let review = ReviewConfig {
            diff_page_size: 0,
            ..ReviewConfig::default()
        };
        assert!(review.validate().is_err());
        assert!(ReviewConfig::default().validate().is_ok());

        let diff = DiffConfig { context_lines: 500 };
        assert!(diff.validate().is_err());
    }
}
