//! Inventory collaborators.
//!
//! This module defines the types and the trait through which the core
//! receives applications, managed resources, resource trees and live
//! cluster-scoped inventories, plus a snapshot-file implementation.

mod snapshot;
mod source;
mod types;

pub use snapshot::{ClusterSnapshot, Snapshot, SnapshotApplication, SnapshotSource};
pub use source::InventorySource;
#[cfg(test)]
pub use source::MockInventorySource;
pub use types::{Application, ApplicationTree, ManagedResource, ResourceNode, SyncStatus};
