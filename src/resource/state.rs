//! Parsed resource state.
//!
//! State arrives as a string. JSON is tried first and YAML is the fallback
//! decode path. Only a mapping counts as a structured document.

use serde_json::Value;

/// Literal token an upstream system uses for an absent state.
pub const NULL_TOKEN: &str = "null";

/// A resource state: the parsed document plus its raw string form.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState {
    raw: String,
    document: Value,
}

impl ResourceState {
    /// Parses a raw state string.
    ///
    /// Returns `None` when the input is neither a JSON nor a YAML mapping.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        parse_document(raw).map(|document| Self {
            raw: raw.to_string(),
            document,
        })
    }

    /// Returns the raw string the state was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed document.
    #[must_use]
    pub const fn document(&self) -> &Value {
        &self.document
    }

    /// Consumes the state and returns the parsed document.
    #[must_use]
    pub fn into_document(self) -> Value {
        self.document
    }
}

/// Returns true if a raw state is empty or the literal null token.
#[must_use]
pub fn is_absent(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == NULL_TOKEN
}

/// Decodes a structured document, JSON first and YAML second.
#[must_use]
pub fn parse_document(raw: &str) -> Option<Value> {
    let value = serde_json::from_str::<Value>(raw)
        .ok()
        .or_else(|| serde_yaml::from_str::<Value>(raw).ok())?;

    value.is_object().then_some(value)
}
