//! Types handed to the core by inventory collaborators.

use serde::{Deserialize, Serialize};

use crate::resource::{IgnoreDirective, ResourceIdentity};

/// Sync status an upstream GitOps controller reports for an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    /// Upstream considers the application fully synchronized.
    Synced,
    /// Upstream reports drift.
    OutOfSync,
    /// Status is not known.
    #[default]
    Unknown,
}

/// A declaratively managed application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Application name.
    pub name: String,
    /// Project the application belongs to.
    #[serde(default = "default_project")]
    pub project: String,
    /// Upstream sync status.
    #[serde(default)]
    pub sync_status: SyncStatus,
    /// Field-level ignore directives configured on the application.
    #[serde(default)]
    pub ignore_differences: Vec<IgnoreDirective>,
}

fn default_project() -> String {
    String::from("default")
}

/// A resource managed by an application, with both of its states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedResource {
    /// Resource identity.
    #[serde(flatten)]
    pub identity: ResourceIdentity,
    /// Declared state (JSON or YAML). Empty or `null` when not declared.
    #[serde(default)]
    pub target_state: String,
    /// Live state (JSON or YAML). Empty or `null` when absent at runtime.
    #[serde(default)]
    pub live_state: String,
}

/// A node of an application's live resource tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Resource identity.
    #[serde(flatten)]
    pub identity: ResourceIdentity,
    /// Whether the controller classified the node as orphaned.
    #[serde(default)]
    pub orphaned: bool,
}

/// An application's live resource tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationTree {
    /// Owning application.
    pub application: String,
    /// Nodes of the tree.
    pub nodes: Vec<ResourceNode>,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Synced => "Synced",
            Self::OutOfSync => "OutOfSync",
            Self::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}
