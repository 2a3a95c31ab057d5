//! Resource identity tuples.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity of a Kubernetes-style resource.
///
/// Equality and hashing are structural over all four fields, which makes the
/// type usable as a set key for orphan detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceIdentity {
    /// API group (empty for the core group).
    #[serde(default)]
    pub group: String,
    /// Resource kind.
    pub kind: String,
    /// Resource name.
    pub name: String,
    /// Namespace (empty for cluster-scoped resources).
    #[serde(default)]
    pub namespace: String,
}

impl ResourceIdentity {
    /// Creates a new identity.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            kind: kind.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Creates an identity for a cluster-scoped resource.
    #[must_use]
    pub fn cluster_scoped(
        group: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::new(group, kind, name, "")
    }

    /// Derives the identity from a resource document.
    ///
    /// The group is taken from `apiVersion` (`apps/v1` gives `apps`, `v1`
    /// gives the empty core group). Missing fields become empty strings.
    #[must_use]
    pub fn from_document(doc: &Value) -> Self {
        let text = |pointer: &str| {
            doc.pointer(pointer)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            group: group_of(&text("/apiVersion")).to_string(),
            kind: text("/kind"),
            name: text("/metadata/name"),
            namespace: text("/metadata/namespace"),
        }
    }

    /// Returns true if the resource has no namespace.
    #[must_use]
    pub fn is_cluster_scoped(&self) -> bool {
        self.namespace.is_empty()
    }
}

/// Extracts the API group from an `apiVersion` string.
#[must_use]
pub fn group_of(api_version: &str) -> &str {
    api_version
        .rsplit_once('/')
        .map_or("", |(group, _version)| group)
}

impl std::fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let segments = [
            self.group.as_str(),
            self.kind.as_str(),
            self.namespace.as_str(),
            self.name.as_str(),
        ];
        let mut first = true;
        for segment in segments.iter().filter(|s| !s.is_empty()) {
            if !first {
                write!(f, "/")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}
