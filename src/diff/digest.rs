//! Digests of normalized state.
//!
//! A digest lets JSON consumers tell two normalized states apart without
//! shipping the documents themselves.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Computes the SHA-256 digest of a document's canonical JSON form.
#[must_use]
pub fn state_digest(doc: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(doc.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
