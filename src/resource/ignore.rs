//! Ignore rules and ignore directives.
//!
//! Two kinds of exclusion exist:
//!
//! - [`IgnoreRule`]: identity patterns that exempt whole resources from
//!   orphan reports. They are read from a project document.
//! - [`IgnoreDirective`]: field-level exclusions applied while diffing a
//!   resource. Their pointers and expressions are forwarded verbatim to the
//!   field normalizers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::identity::ResourceIdentity;

/// Wildcard accepted in the `name` position of an ignore rule.
pub const WILDCARD: &str = "*";

/// An identity pattern exempting resources from orphan reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IgnoreRule {
    /// API group. An empty group only matches the core group.
    #[serde(default)]
    pub group: String,
    /// Resource kind, compared exactly.
    #[serde(default = "wildcard")]
    pub kind: String,
    /// Literal name or [`WILDCARD`].
    #[serde(default = "wildcard")]
    pub name: String,
}

fn wildcard() -> String {
    String::from(WILDCARD)
}

impl IgnoreRule {
    /// Creates a new rule.
    #[must_use]
    pub fn new(group: impl Into<String>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Returns true if this rule matches the resource.
    ///
    /// Group and kind must be equal, including the empty group. The name must
    /// be equal or the rule name must be the wildcard.
    #[must_use]
    pub fn matches(&self, resource: &ResourceIdentity) -> bool {
        self.group == resource.group
            && self.kind == resource.kind
            && (self.name == WILDCARD || self.name == resource.name)
    }
}

impl std::fmt::Display for IgnoreRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{group: {:?}, kind: {}, name: {}}}", self.group, self.kind, self.name)
    }
}

/// Returns true if any rule matches the resource.
#[must_use]
pub fn is_ignored(resource: &ResourceIdentity, rules: &[IgnoreRule]) -> bool {
    rules.iter().any(|rule| rule.matches(resource))
}

/// Reads orphan ignore rules from a project document.
///
/// Rules live under `spec.orphanedResources.ignore`. A missing list yields no
/// rules. Absent fields take the defaults of [`IgnoreRule`]; entries that are
/// not mappings are skipped.
#[must_use]
pub fn rules_from_project(project: &Value) -> Vec<IgnoreRule> {
    let Some(entries) = project
        .pointer("/spec/orphanedResources/ignore")
        .and_then(Value::as_array)
    else {
        debug!("Project declares no orphaned resource ignore rules");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<IgnoreRule>(entry.clone()) {
            Ok(rule) => Some(rule),
            Err(e) => {
                warn!("Skipping malformed ignore rule {entry}: {e}");
                None
            }
        })
        .collect()
}

/// A field-level ignore directive attached to an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreDirective {
    /// API group the directive applies to.
    #[serde(default)]
    pub group: String,
    /// Kind the directive applies to. A directive without a kind matches
    /// nothing.
    #[serde(default)]
    pub kind: String,
    /// Optional resource name. Empty means every resource of the kind.
    #[serde(default)]
    pub name: String,
    /// Optional namespace. Empty means every namespace.
    #[serde(default)]
    pub namespace: String,
    /// RFC 6901 JSON pointers to drop before comparison.
    #[serde(default)]
    pub json_pointers: Vec<String>,
    /// JQ-style path expressions to drop before comparison.
    #[serde(default)]
    pub jq_path_expressions: Vec<String>,
    /// Field managers whose owned fields are dropped before comparison.
    #[serde(default)]
    pub managed_fields_managers: Vec<String>,
}

impl IgnoreDirective {
    /// Returns true if the directive applies to the resource.
    #[must_use]
    pub fn applies_to(&self, resource: &ResourceIdentity) -> bool {
        self.group == resource.group
            && self.kind == resource.kind
            && (self.name.is_empty() || self.name == resource.name)
            && (self.namespace.is_empty() || self.namespace == resource.namespace)
    }
}
