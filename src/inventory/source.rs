//! Inventory collaborator trait.
//!
//! The core never talks to a control plane itself. Everything it compares is
//! handed over through this trait, which a live API client, a cache or a
//! snapshot file can implement.

use async_trait::async_trait;
use serde_json::Value;

use super::types::{Application, ApplicationTree, ManagedResource};
use crate::error::Result;
use crate::orphan::ClusterScopedKind;
use crate::resource::ResourceIdentity;

/// Source of managed and live resource inventories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Lists all applications.
    async fn list_applications(&self) -> Result<Vec<Application>>;

    /// Lists the managed resources of an application with both states.
    async fn managed_resources(&self, application: &str) -> Result<Vec<ManagedResource>>;

    /// Returns the live resource tree of an application.
    async fn resource_tree(&self, application: &str) -> Result<ApplicationTree>;

    /// Lists every live instance of a cluster-scoped kind.
    async fn list_live(&self, kind: &ClusterScopedKind) -> Result<Vec<ResourceIdentity>>;

    /// Lists instances of a cluster-scoped kind referenced by any application.
    async fn list_managed(&self, kind: &ClusterScopedKind) -> Result<Vec<ResourceIdentity>>;

    /// Returns the declarative project document.
    async fn project(&self, name: &str) -> Result<Value>;

    /// Gets the source type name.
    fn source_type(&self) -> &'static str;
}
