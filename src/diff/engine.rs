//! Diff engine for comparing target vs live resource state.
//!
//! The engine decides whether a resource is out of sync and renders a
//! reviewable unified diff. It holds no state between calls.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::digest::state_digest;
use super::render::{DEFAULT_CONTEXT_LINES, Hunk, UnifiedDiff, canonical_text, positional_hunks};
use crate::error::NormalizeError;
use crate::inventory::{Application, ManagedResource, SyncStatus};
use crate::normalize::{FieldNormalizer, NormalizerChain, PointerFieldNormalizer, StateNormalizer};
use crate::resource::{IgnoreDirective, ResourceIdentity, ResourceState, is_absent};

/// Options controlling diff computation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// Context lines around each change.
    pub context_lines: usize,
    /// Suppress the diff body of resources whose application upstream
    /// reports as synced.
    pub trust_upstream_sync: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
            trust_upstream_sync: true,
        }
    }
}

/// Engine for computing diffs between target and live states.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    normalizer: StateNormalizer,
    fields: Arc<dyn FieldNormalizer>,
    options: DiffOptions,
}

/// Diff outcome for a single resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    /// Resource identity.
    pub resource: ResourceIdentity,
    /// Whether target and live differ after normalization.
    pub out_of_sync: bool,
    /// Whether the body was withheld because upstream reports the
    /// application as synced.
    pub suppressed: bool,
    /// Rendered hunks. Empty when in sync or suppressed.
    pub hunks: Vec<Hunk>,
    /// Digest of the normalized target state, when parseable.
    pub target_digest: Option<String>,
    /// Digest of the normalized live state, when parseable.
    pub live_digest: Option<String>,
}

/// Aggregate counts over a set of diff results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    /// Number of resources compared.
    pub total: usize,
    /// Number of resources out of sync.
    pub out_of_sync: usize,
    /// Number of out-of-sync resources whose body was suppressed.
    pub suppressed: usize,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new(DiffOptions::default())
    }
}

impl DiffEngine {
    /// Creates a new diff engine using the built-in pointer field normalizer.
    #[must_use]
    pub fn new(options: DiffOptions) -> Self {
        Self {
            normalizer: StateNormalizer::new(),
            fields: Arc::new(PointerFieldNormalizer),
            options,
        }
    }

    /// Replaces the field normalizer that applies ignore directives.
    #[must_use]
    pub fn with_field_normalizer(mut self, fields: Arc<dyn FieldNormalizer>) -> Self {
        self.fields = fields;
        self
    }

    /// Returns the engine options.
    #[must_use]
    pub const fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Returns true if the target and live states differ.
    ///
    /// An empty or `null` state on either side falls back to plain string
    /// equality. A state that cannot be parsed, or a normalizer step that
    /// fails, counts as different.
    ///
    /// Directives are matched against the identity each document declares.
    /// Use [`DiffEngine::diff_resource`] when the resource identity is known.
    #[must_use]
    pub fn is_out_of_sync(&self, target: &str, live: &str, directives: &[IgnoreDirective]) -> bool {
        self.compare(target, live, None, directives)
    }

    /// Renders positional hunks between the live and target states.
    #[must_use]
    pub fn render(&self, target: &str, live: &str, directives: &[IgnoreDirective]) -> Vec<Hunk> {
        self.render_for(target, live, None, directives)
    }

    fn compare(
        &self,
        target: &str,
        live: &str,
        identity: Option<&ResourceIdentity>,
        directives: &[IgnoreDirective],
    ) -> bool {
        if is_absent(target) || is_absent(live) {
            return target != live;
        }

        let (Some(target_state), Some(live_state)) =
            (ResourceState::parse(target), ResourceState::parse(live))
        else {
            debug!("Unparseable state, assuming drift");
            return true;
        };

        match (
            self.prepare(target_state.document(), identity, directives),
            self.prepare(live_state.document(), identity, directives),
        ) {
            (Ok(target_doc), Ok(live_doc)) => target_doc != live_doc,
            (Err(e), _) | (_, Err(e)) => {
                warn!("Normalizer failed, assuming drift: {e}");
                true
            }
        }
    }

    fn render_for(
        &self,
        target: &str,
        live: &str,
        identity: Option<&ResourceIdentity>,
        directives: &[IgnoreDirective],
    ) -> Vec<Hunk> {
        let desired = self.display_text(target, identity, directives);
        let current = self.display_text(live, identity, directives);

        let desired: Vec<&str> = desired.lines().collect();
        let current: Vec<&str> = current.lines().collect();
        positional_hunks(&current, &desired, self.options.context_lines)
    }

    /// Diffs one managed resource and applies the display policy.
    #[must_use]
    pub fn diff_resource(
        &self,
        resource: &ManagedResource,
        sync_status: SyncStatus,
        directives: &[IgnoreDirective],
    ) -> DiffResult {
        let identity = Some(&resource.identity);
        let out_of_sync =
            self.compare(&resource.target_state, &resource.live_state, identity, directives);
        let suppressed =
            out_of_sync && self.options.trust_upstream_sync && sync_status == SyncStatus::Synced;

        let hunks = if out_of_sync && !suppressed {
            self.render_for(&resource.target_state, &resource.live_state, identity, directives)
        } else {
            Vec::new()
        };

        if suppressed {
            debug!(
                "{} differs locally but upstream reports it synced, suppressing diff",
                resource.identity
            );
        }

        DiffResult {
            resource: resource.identity.clone(),
            out_of_sync,
            suppressed,
            hunks,
            target_digest: self.digest(&resource.target_state, identity, directives),
            live_digest: self.digest(&resource.live_state, identity, directives),
        }
    }

    /// Diffs every resource of an application.
    #[must_use]
    pub fn diff_application(
        &self,
        application: &Application,
        resources: &[ManagedResource],
    ) -> Vec<DiffResult> {
        let results: Vec<DiffResult> = resources
            .iter()
            .map(|r| {
                self.diff_resource(r, application.sync_status, &application.ignore_differences)
            })
            .collect();

        debug!(
            "Application {}: {} of {} resources out of sync",
            application.name,
            results.iter().filter(|r| r.out_of_sync).count(),
            results.len()
        );

        results
    }

    fn prepare(
        &self,
        doc: &Value,
        identity: Option<&ResourceIdentity>,
        directives: &[IgnoreDirective],
    ) -> Result<Value, NormalizeError> {
        let normalized = self.normalizer.normalize_value(doc);
        let chain = NormalizerChain::standard(directives, Arc::clone(&self.fields));
        match identity {
            Some(identity) => chain.apply_for(&normalized, identity),
            None => chain.apply(&normalized),
        }
    }

    /// Normalized document, falling back to the state-only normalization when
    /// the chain fails.
    fn normalized_document(
        &self,
        raw: &str,
        identity: Option<&ResourceIdentity>,
        directives: &[IgnoreDirective],
    ) -> Option<Value> {
        if is_absent(raw) {
            return None;
        }
        let doc = ResourceState::parse(raw)?.into_document();
        Some(
            self.prepare(&doc, identity, directives)
                .unwrap_or_else(|_| self.normalizer.normalize_value(&doc)),
        )
    }

    fn display_text(
        &self,
        raw: &str,
        identity: Option<&ResourceIdentity>,
        directives: &[IgnoreDirective],
    ) -> String {
        if is_absent(raw) {
            return String::new();
        }
        self.normalized_document(raw, identity, directives)
            .map_or_else(|| raw.to_string(), |doc| canonical_text(&doc))
    }

    fn digest(
        &self,
        raw: &str,
        identity: Option<&ResourceIdentity>,
        directives: &[IgnoreDirective],
    ) -> Option<String> {
        self.normalized_document(raw, identity, directives)
            .map(|doc| state_digest(&doc))
    }
}

impl DiffResult {
    /// Returns a unified diff view of this result.
    #[must_use]
    pub fn unified(&self) -> UnifiedDiff<'_> {
        UnifiedDiff::new(&self.resource, &self.hunks)
    }
}

impl DiffSummary {
    /// Summarizes a set of results.
    #[must_use]
    pub fn from_results(results: &[DiffResult]) -> Self {
        Self {
            total: results.len(),
            out_of_sync: results.iter().filter(|r| r.out_of_sync).count(),
            suppressed: results.iter().filter(|r| r.suppressed).count(),
        }
    }

    /// Returns true if every resource is in sync.
    #[must_use]
    pub const fn is_converged(&self) -> bool {
        self.out_of_sync == 0
    }
}

impl std::fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} resources out of sync",
            self.out_of_sync, self.total
        )?;
        if self.suppressed > 0 {
            write!(f, " ({} hidden, upstream reports synced)", self.suppressed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::LineKind;
    use serde_json::json;

    fn engine() -> DiffEngine {
        DiffEngine::default()
    }

    fn marked_lines(hunk: &Hunk) -> Vec<String> {
        hunk.lines
            .iter()
            .map(|line| {
                let marker = match line.kind {
                    LineKind::Context => ' ',
                    LineKind::Added => '+',
                    LineKind::Removed => '-',
                };
                format!("{marker}{}", line.text)
            })
            .collect()
    }

    fn managed(target: &str, live: &str) -> ManagedResource {
        ManagedResource {
            identity: ResourceIdentity::new("apps", "Deployment", "web", "demo"),
            target_state: target.to_string(),
            live_state: live.to_string(),
        }
    }

    #[test]
    fn test_changed_value_is_out_of_sync() {
        let target = r#"{"a":1,"b":2}"#;
        let live = r#"{"a":1,"b":3}"#;

        assert!(engine().is_out_of_sync(target, live, &[]));

        let hunks = engine().render(target, live, &[]);
        assert_eq!(hunks.len(), 1);
        assert_eq!(marked_lines(&hunks[0]), vec![" a: 1", "-b: 3", "+b: 2"]);
    }

    #[test]
    fn test_creation_timestamp_is_ignored() {
        let target = json!({"kind": "ConfigMap", "metadata": {"name": "cfg"}, "data": {"k": "v"}});
        let live = json!({
            "kind": "ConfigMap",
            "metadata": {"name": "cfg", "creationTimestamp": "2024-01-01T00:00:00Z"},
            "data": {"k": "v"}
        });

        assert!(!engine().is_out_of_sync(&target.to_string(), &live.to_string(), &[]));
    }

    #[test]
    fn test_null_on_both_sides_is_in_sync() {
        assert!(!engine().is_out_of_sync("null", "null", &[]));
        assert!(!engine().is_out_of_sync("", "", &[]));
    }

    #[test]
    fn test_one_side_absent_is_out_of_sync() {
        assert!(engine().is_out_of_sync("", r#"{"a":1}"#, &[]));
        assert!(engine().is_out_of_sync(r#"{"a":1}"#, "null", &[]));
    }

    #[test]
    fn test_unparseable_is_out_of_sync() {
        assert!(engine().is_out_of_sync("{broken", "{broken", &[]));
        assert!(engine().is_out_of_sync(r#"{"a":1}"#, "- just\n- a list", &[]));
    }

    #[test]
    fn test_yaml_and_json_compare_structurally() {
        let target = "kind: ConfigMap\ndata:\n  k: v\n";
        let live = r#"{"data":{"k":"v"},"kind":"ConfigMap","status":{"x":1}}"#;
        assert!(!engine().is_out_of_sync(target, live, &[]));
    }

    #[test]
    fn test_ignore_directive_hides_field() {
        let target = json!({"apiVersion": "apps/v1", "kind": "Deployment", "spec": {"replicas": 2}});
        let live = json!({"apiVersion": "apps/v1", "kind": "Deployment", "spec": {"replicas": 5}});
        let directive = IgnoreDirective {
            group: String::from("apps"),
            kind: String::from("Deployment"),
            json_pointers: vec![String::from("/spec/replicas")],
            ..IgnoreDirective::default()
        };

        let (target, live) = (target.to_string(), live.to_string());
        assert!(engine().is_out_of_sync(&target, &live, &[]));
        assert!(!engine().is_out_of_sync(&target, &live, &[directive]));
    }

    #[test]
    fn test_failing_directive_counts_as_drift() {
        let doc = json!({"apiVersion": "apps/v1", "kind": "Deployment"}).to_string();
        let directive = IgnoreDirective {
            group: String::from("apps"),
            kind: String::from("Deployment"),
            json_pointers: vec![String::from("no-slash")],
            ..IgnoreDirective::default()
        };

        assert!(engine().is_out_of_sync(&doc, &doc, &[directive]));
    }

    #[test]
    fn test_results_are_deterministic() {
        let target = r#"{"kind":"ConfigMap","data":{"a":"1","b":"2"}}"#;
        let live = r#"{"kind":"ConfigMap","data":{"a":"1","b":"3"}}"#;
        let e = engine();

        assert_eq!(e.is_out_of_sync(target, live, &[]), e.is_out_of_sync(target, live, &[]));
        assert_eq!(e.render(target, live, &[]), e.render(target, live, &[]));
    }

    #[test]
    fn test_synced_application_suppresses_body() {
        let resource = managed(r#"{"a":1}"#, r#"{"a":2}"#);

        let result = engine().diff_resource(&resource, SyncStatus::Synced, &[]);
        assert!(result.out_of_sync);
        assert!(result.suppressed);
        assert!(result.hunks.is_empty());

        let summary = DiffSummary::from_results(&[result]);
        assert_eq!(summary.out_of_sync, 1);
        assert_eq!(summary.suppressed, 1);
    }

    #[test]
    fn test_suppression_can_be_disabled() {
        let options = DiffOptions {
            trust_upstream_sync: false,
            ..DiffOptions::default()
        };
        let resource = managed(r#"{"a":1}"#, r#"{"a":2}"#);

        let result = DiffEngine::new(options).diff_resource(&resource, SyncStatus::Synced, &[]);
        assert!(!result.suppressed);
        assert_eq!(result.hunks.len(), 1);
    }

    #[test]
    fn test_in_sync_resource_has_no_hunks() {
        let resource = managed(r#"{"a":1}"#, r#"{"a":1}"#);

        let result = engine().diff_resource(&resource, SyncStatus::OutOfSync, &[]);
        assert!(!result.out_of_sync);
        assert!(result.hunks.is_empty());
        assert_eq!(result.target_digest, result.live_digest);
        assert!(result.target_digest.is_some());
    }

    #[test]
    fn test_missing_live_renders_full_addition() {
        let resource = managed("a: 1\nb: 2\n", "");

        let result = engine().diff_resource(&resource, SyncStatus::OutOfSync, &[]);
        assert!(result.out_of_sync);
        assert_eq!(result.live_digest, None);
        assert_eq!(result.hunks.len(), 1);
        assert_eq!(result.hunks[0].header(), "@@ -0,2 +0,0 @@");
    }

    #[test]
    fn test_directive_matches_resource_identity_not_manifest() {
        let resource = ManagedResource {
            identity: ResourceIdentity::new("apps", "Deployment", "web", "demo"),
            target_state: json!({
                "apiVersion": "apps/v1",
                "kind": "Deployment",
                "metadata": {"name": "web"},
                "spec": {"replicas": 2}
            })
            .to_string(),
            live_state: json!({
                "apiVersion": "apps/v1",
                "kind": "Deployment",
                "metadata": {"name": "web", "namespace": "demo"},
                "spec": {"replicas": 5}
            })
            .to_string(),
        };
        let directive = IgnoreDirective {
            group: String::from("apps"),
            kind: String::from("Deployment"),
            namespace: String::from("demo"),
            json_pointers: vec![String::from("/spec/replicas")],
            ..IgnoreDirective::default()
        };

        let result = engine().diff_resource(&resource, SyncStatus::OutOfSync, &[directive]);
        assert!(!result.out_of_sync);
        assert!(result.hunks.is_empty());
        assert_eq!(result.target_digest, result.live_digest);
    }

    #[test]
    fn test_diff_application_uses_app_directives() {
        let app = Application {
            name: String::from("guestbook"),
            project: String::from("default"),
            sync_status: SyncStatus::OutOfSync,
            ignore_differences: vec![IgnoreDirective {
                kind: String::from("ConfigMap"),
                json_pointers: vec![String::from("/data/noise")],
                ..IgnoreDirective::default()
            }],
        };
        let resources = vec![ManagedResource {
            identity: ResourceIdentity::new("", "ConfigMap", "cfg", "demo"),
            target_state: json!({"apiVersion": "v1", "kind": "ConfigMap", "data": {"noise": "a"}}).to_string(),
            live_state: json!({"apiVersion": "v1", "kind": "ConfigMap", "data": {"noise": "b"}}).to_string(),
        }];

        let results = engine().diff_application(&app, &resources);
        assert_eq!(results.len(), 1);
        assert!(!results[0].out_of_sync);
    }
}
