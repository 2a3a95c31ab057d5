//! Known-type adjustments.
//!
//! Some common kinds carry fields that the control plane fills in at runtime.
//! They are removed from both sides before comparison.

use serde_json::Value;
use tracing::trace;

use super::pointer::remove_pointer;
use crate::error::NormalizeError;
use crate::resource::ResourceIdentity;

/// A runtime-computed field of a well-known kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownTypeField {
    /// API group of the kind.
    pub group: &'static str,
    /// Kind name.
    pub kind: &'static str,
    /// JSON pointer to the runtime-computed field.
    pub pointer: &'static str,
}

const fn field(group: &'static str, kind: &'static str, pointer: &'static str) -> KnownTypeField {
    KnownTypeField {
        group,
        kind,
        pointer,
    }
}

/// Runtime-computed fields removed before comparison.
pub const KNOWN_TYPE_FIELDS: &[KnownTypeField] = &[
    field("", "Service", "/spec/clusterIP"),
    field("", "Service", "/spec/clusterIPs"),
    field("", "Service", "/spec/ipFamilies"),
    field("", "Service", "/spec/ipFamilyPolicy"),
    field("", "ServiceAccount", "/secrets"),
    field("", "PersistentVolumeClaim", "/spec/volumeName"),
    field("apps", "Deployment", "/spec/template/metadata/creationTimestamp"),
    field("apps", "StatefulSet", "/spec/template/metadata/creationTimestamp"),
    field("apps", "DaemonSet", "/spec/template/metadata/creationTimestamp"),
    field("batch", "Job", "/spec/selector"),
    field("batch", "Job", "/spec/template/metadata/labels/controller-uid"),
    field("batch", "Job", "/spec/template/metadata/labels/batch.kubernetes.io~1controller-uid"),
];

/// Returns a copy of `doc` with the known runtime fields of its kind removed.
///
/// # Errors
///
/// Returns an error if a catalog pointer is malformed.
pub fn apply(doc: Value, identity: &ResourceIdentity) -> Result<Value, NormalizeError> {
    let mut adjusted = doc;

    for known in KNOWN_TYPE_FIELDS
        .iter()
        .filter(|f| f.group == identity.group && f.kind == identity.kind)
    {
        if remove_pointer(&mut adjusted, known.pointer)? {
            trace!("Removed {} from {}", known.pointer, identity);
        }
    }

    Ok(adjusted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_cluster_ip_removed() {
        let doc = json!({
            "apiVersion": "v1",
            "kind": "Service",
            "spec": {"clusterIP": "10.0.0.1", "clusterIPs": ["10.0.0.1"], "ports": [{"port": 80}]}
        });
        let identity = ResourceIdentity::from_document(&doc);

        let adjusted = apply(doc, &identity).expect("catalog pointers are valid");
        assert_eq!(adjusted["spec"], json!({"ports": [{"port": 80}]}));
    }

    #[test]
    fn test_other_kinds_untouched() {
        let doc = json!({"apiVersion": "v1", "kind": "ConfigMap", "spec": {"clusterIP": "x"}});
        let identity = ResourceIdentity::from_document(&doc);

        let adjusted = apply(doc.clone(), &identity).expect("catalog pointers are valid");
        assert_eq!(adjusted, doc);
    }

    #[test]
    fn test_catalog_pointers_are_valid() {
        for known in KNOWN_TYPE_FIELDS {
            assert!(known.pointer.starts_with('/'), "{known:?}");
        }
    }
}
