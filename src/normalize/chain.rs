//! Composed normalizer chain.
//!
//! A chain is an ordered list of tagged normalizer steps. Every step receives
//! the previous step's output by value and returns a new document, so no step
//! can reach into another step's working copy.

use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::known_types;
use super::pointer::remove_pointer;
use crate::error::NormalizeError;
use crate::resource::{IgnoreDirective, ResourceIdentity};

/// Collaborator that applies the field-level parts of an ignore directive.
///
/// Pointers, path expressions and field managers are handed over verbatim.
pub trait FieldNormalizer: Send + Sync + Debug {
    /// Returns `doc` with the fields selected by `directive` removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directive cannot be applied.
    fn normalize(&self, doc: Value, directive: &IgnoreDirective) -> Result<Value, NormalizeError>;
}

/// Built-in field normalizer handling RFC 6901 JSON pointers.
///
/// Path expressions and field managers need an evaluator this crate does not
/// ship; they are logged and left in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointerFieldNormalizer;

impl FieldNormalizer for PointerFieldNormalizer {
    fn normalize(&self, doc: Value, directive: &IgnoreDirective) -> Result<Value, NormalizeError> {
        let mut out = doc;
        for pointer in &directive.json_pointers {
            remove_pointer(&mut out, pointer)?;
        }

        if !directive.jq_path_expressions.is_empty() {
            debug!(
                "Skipping {} path expression(s) for {}: no evaluator configured",
                directive.jq_path_expressions.len(),
                directive.kind
            );
        }
        if !directive.managed_fields_managers.is_empty() {
            debug!(
                "Skipping field manager filters for {}: no evaluator configured",
                directive.kind
            );
        }

        Ok(out)
    }
}

/// A single normalizer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalizer {
    /// Removes runtime-computed fields of well-known kinds.
    KnownTypes,
    /// Applies caller-supplied ignore directives through the field normalizer.
    IgnoreDifferences(Vec<IgnoreDirective>),
}

/// Ordered normalizer steps sharing one field normalizer.
#[derive(Debug, Clone)]
pub struct NormalizerChain {
    steps: Vec<Normalizer>,
    fields: Arc<dyn FieldNormalizer>,
}

impl NormalizerChain {
    /// Creates a chain from explicit steps.
    #[must_use]
    pub fn new(steps: Vec<Normalizer>, fields: Arc<dyn FieldNormalizer>) -> Self {
        Self { steps, fields }
    }

    /// Creates the standard chain: known types first, then the directives.
    #[must_use]
    pub fn standard(directives: &[IgnoreDirective], fields: Arc<dyn FieldNormalizer>) -> Self {
        Self::new(
            vec![
                Normalizer::KnownTypes,
                Normalizer::IgnoreDifferences(directives.to_vec()),
            ],
            fields,
        )
    }

    /// Returns the steps in application order.
    #[must_use]
    pub fn steps(&self) -> &[Normalizer] {
        &self.steps
    }

    /// Applies every step in order to a copy of `doc`, matching directives
    /// against the identity read from the document itself.
    ///
    /// # Errors
    ///
    /// Returns the first step error; later steps are not run.
    pub fn apply(&self, doc: &Value) -> Result<Value, NormalizeError> {
        self.apply_for(doc, &ResourceIdentity::from_document(doc))
    }

    /// Applies every step in order to a copy of `doc` on behalf of `identity`.
    ///
    /// Both sides of a comparison must be normalized for the same identity,
    /// even when one manifest omits fields such as the namespace.
    ///
    /// # Errors
    ///
    /// Returns the first step error; later steps are not run.
    pub fn apply_for(&self, doc: &Value, identity: &ResourceIdentity) -> Result<Value, NormalizeError> {
        self.steps
            .iter()
            .try_fold(doc.clone(), |current, step| self.apply_step(step, identity, current))
    }

    fn apply_step(
        &self,
        step: &Normalizer,
        identity: &ResourceIdentity,
        doc: Value,
    ) -> Result<Value, NormalizeError> {
        match step {
            Normalizer::KnownTypes => known_types::apply(doc, identity),
            Normalizer::IgnoreDifferences(directives) => directives
                .iter()
                .filter(|d| d.applies_to(identity))
                .try_fold(doc, |current, directive| self.fields.normalize(current, directive)),
        }
    }
}
