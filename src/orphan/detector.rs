//! Orphan detection.
//!
//! Namespaced orphans come from each application's resource tree, where the
//! controller has already flagged them. Cluster-scoped orphans are computed
//! per catalog kind as `live - managed`, minus the project's ignore rules.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::catalog::ClusterScopedKind;
use super::set_diff::subtract;
use crate::error::Result;
use crate::inventory::{ApplicationTree, InventorySource};
use crate::resource::{IgnoreRule, ResourceIdentity, is_ignored, rules_from_project};

/// Orphans grouped under one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanRecord {
    /// Owning application, or empty for cluster-scoped orphans.
    pub owner: String,
    /// Orphaned resources.
    pub resources: Vec<ResourceIdentity>,
}

impl OrphanRecord {
    /// Returns true if the record holds cluster-scoped orphans.
    #[must_use]
    pub fn is_cluster_scoped(&self) -> bool {
        self.owner.is_empty()
    }
}

/// Result of an orphan detection run.
#[derive(Debug, Clone, Serialize)]
pub struct OrphanReport {
    /// Run identifier.
    pub run_id: Uuid,
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
    /// Project that was scanned.
    pub project: String,
    /// Orphans by owner. Applications without orphans are omitted.
    pub records: Vec<OrphanRecord>,
    /// Catalog kinds whose lookup failed and were skipped.
    pub skipped_kinds: Vec<ClusterScopedKind>,
}

impl OrphanReport {
    /// Returns the number of orphaned resources across all records.
    #[must_use]
    pub fn total_orphans(&self) -> usize {
        self.records.iter().map(|r| r.resources.len()).sum()
    }

    /// Returns true if no orphans were found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.total_orphans() == 0
    }

    /// Iterates over `(owner, resource)` pairs in record order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ResourceIdentity)> {
        self.records
            .iter()
            .flat_map(|r| r.resources.iter().map(move |res| (r.owner.as_str(), res)))
    }
}

impl std::fmt::Display for OrphanReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_clean() {
            write!(f, "No orphaned resources in project {}", self.project)?;
        } else {
            writeln!(f, "Orphaned resources in project {}:", self.project)?;
            for (owner, resource) in self.entries() {
                let owner = if owner.is_empty() { "<cluster>" } else { owner };
                writeln!(f, "  - {owner}: {resource}")?;
            }
        }
        Ok(())
    }
}

/// Collects the nodes flagged as orphaned, keyed by owning application.
#[must_use]
pub fn namespaced_orphans(trees: &[ApplicationTree]) -> BTreeMap<String, Vec<ResourceIdentity>> {
    let mut orphans = BTreeMap::new();
    for tree in trees {
        let flagged: Vec<ResourceIdentity> = tree
            .nodes
            .iter()
            .filter(|n| n.orphaned)
            .map(|n| n.identity.clone())
            .collect();
        if !flagged.is_empty() {
            orphans.insert(tree.application.clone(), flagged);
        }
    }
    orphans
}

/// Returns live resources that no application manages and no rule ignores.
#[must_use]
pub fn cluster_scoped_orphans(
    managed: &[ResourceIdentity],
    live: &[ResourceIdentity],
    rules: &[IgnoreRule],
) -> Vec<ResourceIdentity> {
    subtract(live, managed)
        .into_iter()
        .filter(|r| !is_ignored(r, rules))
        .collect()
}

/// Orchestrates an orphan detection run against an inventory source.
pub struct OrphanDetector<'a, S: InventorySource + ?Sized> {
    /// Inventory source.
    source: &'a S,
    /// Cluster-scoped kinds to scan.
    catalog: &'a [ClusterScopedKind],
    /// Project to scan.
    project: String,
    /// Whether to scan cluster-scoped kinds.
    cluster_scoped: bool,
}

impl<'a, S: InventorySource + ?Sized> OrphanDetector<'a, S> {
    /// Creates a detector scanning the `default` project.
    #[must_use]
    pub fn new(source: &'a S, catalog: &'a [ClusterScopedKind]) -> Self {
        Self {
            source,
            catalog,
            project: String::from("default"),
            cluster_scoped: true,
        }
    }

    /// Sets the project to scan.
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    /// Restricts detection to namespaced orphans.
    #[must_use]
    pub const fn namespaced_only(mut self, namespaced_only: bool) -> Self {
        self.cluster_scoped = !namespaced_only;
        self
    }

    /// Runs detection.
    ///
    /// A failing lookup for one catalog kind skips that kind only.
    ///
    /// # Errors
    ///
    /// Returns an error if applications or their resource trees cannot be
    /// listed.
    pub async fn detect(&self) -> Result<OrphanReport> {
        let run_id = Uuid::new_v4();
        info!(
            "Detecting orphans in project {} from {} source (run {run_id})",
            self.project,
            self.source.source_type()
        );

        let mut records: Vec<OrphanRecord> = self
            .collect_namespaced()
            .await?
            .into_iter()
            .map(|(owner, resources)| OrphanRecord { owner, resources })
            .collect();

        let mut skipped_kinds = Vec::new();
        if self.cluster_scoped {
            let rules = self.project_rules().await;
            let mut cluster = Vec::new();

            for kind in self.catalog {
                match self.scan_kind(kind, &rules).await {
                    Ok(orphans) => {
                        debug!("{} orphan(s) of kind {kind}", orphans.len());
                        cluster.extend(orphans);
                    }
                    Err(e) => {
                        warn!("Skipping kind {kind}: {e}");
                        skipped_kinds.push(kind.clone());
                    }
                }
            }

            if !cluster.is_empty() {
                records.push(OrphanRecord {
                    owner: String::new(),
                    resources: cluster,
                });
            }
        }

        let report = OrphanReport {
            run_id,
            generated_at: Utc::now(),
            project: self.project.clone(),
            records,
            skipped_kinds,
        };
        info!(
            "Found {} orphaned resource(s), {} kind(s) skipped (run {run_id})",
            report.total_orphans(),
            report.skipped_kinds.len()
        );
        Ok(report)
    }

    async fn collect_namespaced(&self) -> Result<BTreeMap<String, Vec<ResourceIdentity>>> {
        let applications = self.source.list_applications().await?;
        let mut trees = Vec::new();
        for app in applications.iter().filter(|a| a.project == self.project) {
            trees.push(self.source.resource_tree(&app.name).await?);
        }
        debug!("Scanned {} application tree(s)", trees.len());
        Ok(namespaced_orphans(&trees))
    }

    async fn project_rules(&self) -> Vec<IgnoreRule> {
        match self.source.project(&self.project).await {
            Ok(document) => rules_from_project(&document),
            Err(e) => {
                warn!("No ignore rules for project {}: {e}", self.project);
                Vec::new()
            }
        }
    }

    async fn scan_kind(
        &self,
        kind: &ClusterScopedKind,
        rules: &[IgnoreRule],
    ) -> Result<Vec<ResourceIdentity>> {
        let live = self.source.list_live(kind).await?;
        let managed = self.source.list_managed(kind).await?;
        Ok(cluster_scoped_orphans(&managed, &live, rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InventoryError;
    use crate::inventory::{Application, MockInventorySource, ResourceNode, SyncStatus};
    use serde_json::json;

    fn storage(name: &str) -> ResourceIdentity {
        ResourceIdentity::cluster_scoped("storage.k8s.io", "StorageClass", name)
    }

    fn app(name: &str, project: &str) -> Application {
        Application {
            name: name.to_string(),
            project: project.to_string(),
            sync_status: SyncStatus::Synced,
            ignore_differences: Vec::new(),
        }
    }

    fn node(name: &str, orphaned: bool) -> ResourceNode {
        ResourceNode {
            identity: ResourceIdentity::new("", "ConfigMap", name, "demo"),
            orphaned,
        }
    }

    #[test]
    fn test_namespaced_orphans_omit_clean_apps() {
        let trees = vec![
            ApplicationTree {
                application: "web".to_string(),
                nodes: vec![node("kept", false), node("stale", true)],
            },
            ApplicationTree {
                application: "api".to_string(),
                nodes: vec![node("kept", false)],
            },
        ];

        let orphans = namespaced_orphans(&trees);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans["web"], vec![node("stale", true).identity]);
    }

    #[test]
    fn test_cluster_scoped_live_minus_managed() {
        let managed = vec![storage("x"), storage("y")];
        let live = vec![storage("x"), storage("y"), storage("z")];
        assert_eq!(cluster_scoped_orphans(&managed, &live, &[]), vec![storage("z")]);
    }

    #[test]
    fn test_cluster_scoped_respects_ignore_rules() {
        let live = vec![ResourceIdentity::cluster_scoped("", "Namespace", "kube-system")];
        let rules = vec![IgnoreRule::new("", "Namespace", "kube-system")];
        assert!(cluster_scoped_orphans(&[], &live, &rules).is_empty());
    }

    #[test]
    fn test_report_display_and_counts() {
        let report = OrphanReport {
            run_id: Uuid::nil(),
            generated_at: Utc::now(),
            project: "default".to_string(),
            records: vec![
                OrphanRecord {
                    owner: "web".to_string(),
                    resources: vec![node("stale", true).identity],
                },
                OrphanRecord {
                    owner: String::new(),
                    resources: vec![storage("z")],
                },
            ],
            skipped_kinds: Vec::new(),
        };

        assert_eq!(report.total_orphans(), 2);
        assert!(!report.is_clean());
        assert!(report.records[1].is_cluster_scoped());
        let text = report.to_string();
        assert!(text.contains("web: ConfigMap/demo/stale"));
        assert!(text.contains("<cluster>: storage.k8s.io/StorageClass/z"));
    }

    fn mock_source() -> MockInventorySource {
        let mut source = MockInventorySource::new();
        source.expect_source_type().return_const("mock");
        source
            .expect_list_applications()
            .returning(|| Ok(vec![app("web", "default"), app("billing", "finance")]));
        source
            .expect_resource_tree()
            .times(1)
            .returning(|name| {
                Ok(ApplicationTree {
                    application: name.to_string(),
                    nodes: vec![node("stale", true)],
                })
            });
        source
    }

    #[tokio::test]
    async fn test_detect_skips_failing_kind() {
        let mut source = mock_source();
        source.expect_project().returning(|_| {
            Ok(json!({"spec": {"orphanedResources": {"ignore": [{"group": "storage.k8s.io", "kind": "StorageClass", "name": "gp2"}]}}}))
        });
        source.expect_list_live().returning(|kind| {
            if kind.kind == "ConstraintTemplate" {
                Err(InventoryError::lookup(kind.to_string(), "no matches for kind").into())
            } else {
                Ok(vec![storage("fast"), storage("gp2"), storage("slow")])
            }
        });
        source
            .expect_list_managed()
            .times(1)
            .returning(|_| Ok(vec![storage("fast")]));

        let catalog = vec![
            ClusterScopedKind::new("ConstraintTemplate", "templates.gatekeeper.sh"),
            ClusterScopedKind::new("StorageClass", "storage.k8s.io"),
        ];
        let report = OrphanDetector::new(&source, &catalog)
            .detect()
            .await
            .expect("detection should succeed");

        assert_eq!(report.project, "default");
        assert_eq!(report.skipped_kinds, vec![catalog[0].clone()]);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].owner, "web");
        assert!(report.records[1].is_cluster_scoped());
        assert_eq!(report.records[1].resources, vec![storage("slow")]);
    }

    #[tokio::test]
    async fn test_detect_namespaced_only() {
        let source = mock_source();
        let catalog = vec![ClusterScopedKind::new("StorageClass", "storage.k8s.io")];

        let report = OrphanDetector::new(&source, &catalog)
            .namespaced_only(true)
            .detect()
            .await
            .expect("detection should succeed");

        assert_eq!(report.total_orphans(), 1);
        assert!(report.skipped_kinds.is_empty());
    }

    #[tokio::test]
    async fn test_detect_other_project() {
        let mut source = MockInventorySource::new();
        source.expect_source_type().return_const("mock");
        source
            .expect_list_applications()
            .returning(|| Ok(vec![app("web", "default"), app("billing", "finance")]));
        source
            .expect_resource_tree()
            .withf(|name: &str| name == "billing")
            .times(1)
            .returning(|name| {
                Ok(ApplicationTree {
                    application: name.to_string(),
                    nodes: Vec::new(),
                })
            });
        source
            .expect_project()
            .returning(|name| Err(InventoryError::ProjectNotFound { name: name.to_string() }.into()));
        source.expect_list_live().returning(|_| Ok(Vec::new()));
        source.expect_list_managed().returning(|_| Ok(Vec::new()));

        let catalog = vec![ClusterScopedKind::new("StorageClass", "storage.k8s.io")];
        let report = OrphanDetector::new(&source, &catalog)
            .with_project("finance")
            .detect()
            .await
            .expect("detection should succeed");

        assert!(report.is_clean());
        assert!(report.records.is_empty());
    }
}
