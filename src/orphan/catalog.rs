//! Catalog of cluster-scoped kinds scanned for orphans.
//!
//! Cluster-scoped kinds have no owning namespace, so they are not covered by
//! any application's resource tree. The catalog is configuration data, not
//! discovered from the cluster.

use serde::{Deserialize, Serialize};

use crate::resource::ResourceIdentity;

/// A non-namespaced kind together with its API group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterScopedKind {
    /// Kind name.
    pub kind: String,
    /// API group (empty for the core group).
    #[serde(default)]
    pub group: String,
}

/// Built-in catalog as `(kind, group)` pairs.
pub const DEFAULT_CLUSTER_SCOPED_KINDS: &[(&str, &str)] = &[
    ("PriorityClass", "scheduling.k8s.io"),
    ("StorageClass", "storage.k8s.io"),
    ("ClusterRole", "rbac.authorization.k8s.io"),
    ("ClusterRoleBinding", "rbac.authorization.k8s.io"),
    ("CustomResourceDefinition", "apiextensions.k8s.io"),
    ("IngressClass", "networking.k8s.io"),
    ("CSIDriver", "storage.k8s.io"),
    ("Namespace", ""),
    ("ConstraintTemplate", "templates.gatekeeper.sh"),
    ("ValidatingWebhookConfiguration", "admissionregistration.k8s.io"),
    ("MutatingWebhookConfiguration", "admissionregistration.k8s.io"),
    ("PersistentVolume", ""),
];

impl ClusterScopedKind {
    /// Creates a catalog entry.
    #[must_use]
    pub fn new(kind: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            group: group.into(),
        }
    }

    /// Returns true if the resource is an instance of this kind.
    #[must_use]
    pub fn matches(&self, resource: &ResourceIdentity) -> bool {
        self.kind == resource.kind && self.group == resource.group
    }
}

impl std::fmt::Display for ClusterScopedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}.{}", self.kind, self.group)
        }
    }
}

/// Returns the built-in catalog.
#[must_use]
pub fn default_catalog() -> Vec<ClusterScopedKind> {
    DEFAULT_CLUSTER_SCOPED_KINDS
        .iter()
        .map(|(kind, group)| ClusterScopedKind::new(*kind, *group))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_no_duplicates() {
        let catalog = default_catalog();
        let unique: std::collections::HashSet<_> = catalog.iter().collect();
        assert_eq!(unique.len(), catalog.len());
    }

    #[test]
    fn test_matches_kind_and_group() {
        let kind = ClusterScopedKind::new("StorageClass", "storage.k8s.io");
        assert!(kind.matches(&ResourceIdentity::cluster_scoped("storage.k8s.io", "StorageClass", "gp2")));
        assert!(!kind.matches(&ResourceIdentity::cluster_scoped("", "StorageClass", "gp2")));
    }

    #[test]
    fn test_display() {
        assert_eq!(ClusterScopedKind::new("Namespace", "").to_string(), "Namespace");
        assert_eq!(
            ClusterScopedKind::new("ClusterRole", "rbac.authorization.k8s.io").to_string(),
            "ClusterRole.rbac.authorization.k8s.io"
        );
    }
}
