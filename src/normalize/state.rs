//! State normalizer.
//!
//! Strips fields that the runtime manages and that never belong to the
//! desired state, so that two states can be compared semantically.

use serde_json::{Map, Value};

use crate::resource::parse_document;

/// Metadata fields written by the API server.
pub const METADATA_NOISE_FIELDS: &[&str] = &[
    "creationTimestamp",
    "managedFields",
    "resourceVersion",
    "uid",
    "generation",
    "selfLink",
];

/// Annotations known to produce false positives.
pub const NOISE_ANNOTATIONS: &[&str] = &[
    "kubectl.kubernetes.io/last-applied-configuration",
    "deployment.kubernetes.io/revision",
];

/// Normalizer for a single resource state.
///
/// Normalization is total and idempotent. The caller's value is never touched:
/// every call works on a copy.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateNormalizer;

impl StateNormalizer {
    /// Creates a new state normalizer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Normalizes a raw state string.
    ///
    /// Parseable input is returned as canonical JSON. Input that is not a
    /// structured document comes back unchanged; callers must then treat the
    /// state as unverifiable.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        parse_document(raw).map_or_else(
            || raw.to_string(),
            |doc| self.normalize_value(&doc).to_string(),
        )
    }

    /// Returns a normalized copy of a parsed document.
    #[must_use]
    pub fn normalize_value(&self, doc: &Value) -> Value {
        let mut normalized = doc.clone();

        if let Value::Object(root) = &mut normalized {
            root.remove("status");

            if let Some(Value::Object(metadata)) = root.get_mut("metadata") {
                strip_metadata(metadata);
            }
        }

        normalized
    }
}

fn strip_metadata(metadata: &mut Map<String, Value>) {
    for field in METADATA_NOISE_FIELDS {
        metadata.remove(*field);
    }

    let annotations_empty = match metadata.get_mut("annotations") {
        Some(Value::Object(annotations)) => {
            for annotation in NOISE_ANNOTATIONS {
                annotations.remove(*annotation);
            }
            annotations.is_empty()
        }
        _ => false,
    };

    if annotations_empty {
        metadata.remove("annotations");
    }
}
