//! Snapshot-file inventory source.
//!
//! A snapshot is a YAML or JSON file capturing applications, their managed
//! resources and resource trees, project documents and the live cluster-scoped
//! inventory. It lets drift and orphan reviews run offline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use super::source::InventorySource;
use super::types::{Application, ApplicationTree, ManagedResource, ResourceNode};
use crate::error::{InventoryError, Result};
use crate::orphan::ClusterScopedKind;
use crate::resource::ResourceIdentity;

/// Root of a snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Captured applications.
    #[serde(default)]
    pub applications: Vec<SnapshotApplication>,
    /// Project documents by name.
    #[serde(default)]
    pub projects: HashMap<String, Value>,
    /// Live cluster-scoped inventory.
    #[serde(default)]
    pub cluster: ClusterSnapshot,
}

/// An application together with its captured resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotApplication {
    /// Application metadata.
    #[serde(flatten)]
    pub application: Application,
    /// Managed resources with target and live state.
    #[serde(default)]
    pub resources: Vec<ManagedResource>,
    /// Live resource tree.
    #[serde(default)]
    pub tree: Vec<ResourceNode>,
}

/// Captured cluster-scoped inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    /// Live cluster-scoped resources.
    #[serde(default)]
    pub live: Vec<ResourceIdentity>,
    /// Kinds whose listing failed when the snapshot was captured.
    #[serde(default)]
    pub unavailable: Vec<ClusterScopedKind>,
}

/// Inventory source backed by a snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    /// Creates a source from an in-memory snapshot.
    #[must_use]
    pub const fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Loads a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading snapshot from: {}", path.display());

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            InventoryError::SnapshotUnreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        Self::parse(&content, path)
    }

    /// Parses snapshot content, JSON first and YAML second.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is neither valid JSON nor valid YAML.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let snapshot = match serde_json::from_str::<Snapshot>(content) {
            Ok(snapshot) => snapshot,
            Err(json_error) => {
                debug!("Snapshot is not JSON ({json_error}), trying YAML");
                serde_yaml::from_str::<Snapshot>(content).map_err(|e| {
                    InventoryError::SnapshotInvalid {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    }
                })?
            }
        };

        debug!(
            "Snapshot holds {} applications and {} live cluster-scoped resources",
            snapshot.applications.len(),
            snapshot.cluster.live.len()
        );
        Ok(Self::new(snapshot))
    }

    fn application(&self, name: &str) -> Result<&SnapshotApplication> {
        self.snapshot
            .applications
            .iter()
            .find(|a| a.application.name == name)
            .ok_or_else(|| {
                InventoryError::ApplicationNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }

    fn ensure_available(&self, kind: &ClusterScopedKind) -> Result<()> {
        if self.snapshot.cluster.unavailable.contains(kind) {
            return Err(InventoryError::lookup(
                kind.to_string(),
                "the server could not find the requested resource",
            )
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl InventorySource for SnapshotSource {
    async fn list_applications(&self) -> Result<Vec<Application>> {
        Ok(self
            .snapshot
            .applications
            .iter()
            .map(|a| a.application.clone())
            .collect())
    }

    async fn managed_resources(&self, application: &str) -> Result<Vec<ManagedResource>> {
        Ok(self.application(application)?.resources.clone())
    }

    async fn resource_tree(&self, application: &str) -> Result<ApplicationTree> {
        Ok(ApplicationTree {
            application: application.to_string(),
            nodes: self.application(application)?.tree.clone(),
        })
    }

    async fn list_live(&self, kind: &ClusterScopedKind) -> Result<Vec<ResourceIdentity>> {
        self.ensure_available(kind)?;
        Ok(self
            .snapshot
            .cluster
            .live
            .iter()
            .filter(|r| kind.matches(r))
            .cloned()
            .collect())
    }

    async fn list_managed(&self, kind: &ClusterScopedKind) -> Result<Vec<ResourceIdentity>> {
        self.ensure_available(kind)?;
        Ok(self
            .snapshot
            .applications
            .iter()
            .flat_map(|a| a.resources.iter())
            .map(|r| &r.identity)
            .filter(|r| kind.matches(r))
            .cloned()
            .collect())
    }

    async fn project(&self, name: &str) -> Result<Value> {
        self.snapshot.projects.get(name).cloned().ok_or_else(|| {
            InventoryError::ProjectNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn source_type(&self) -> &'static str {
        "snapshot"
    }
}
