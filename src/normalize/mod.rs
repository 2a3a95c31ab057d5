//! Normalization of resource state before comparison.
//!
//! This module strips runtime-managed noise from resource documents and
//! composes the ordered normalizer chain used by the diff engine.

mod chain;
mod known_types;
mod pointer;
mod state;

pub use chain::{FieldNormalizer, Normalizer, NormalizerChain, PointerFieldNormalizer};
pub use known_types::{KNOWN_TYPE_FIELDS, KnownTypeField};
pub use pointer::remove_pointer;
pub use state::{METADATA_NOISE_FIELDS, NOISE_ANNOTATIONS, StateNormalizer};
