//! Error types for the appdrift system.
//!
//! The drift and orphan core never raises on bad resource state; the errors
//! here cover the ambient concerns around it: configuration, inventory
//! collaborators, field normalizers and the interactive review loop.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for appdrift.
#[derive(Debug, Error)]
pub enum AppDriftError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Inventory collaborator errors.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Field normalizer errors.
    #[error("Normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Interactive review errors.
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// An environment override holds an unusable value.
    #[error("Invalid value for environment variable {name}: {value}")]
    InvalidEnvVar {
        /// Name of the variable.
        name: String,
        /// The rejected value.
        value: String,
    },
}

/// Errors raised by inventory collaborators.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The snapshot file could not be read.
    #[error("Failed to read snapshot {path}: {message}")]
    SnapshotUnreadable {
        /// Path to the snapshot.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },

    /// The snapshot file could not be decoded.
    #[error("Failed to decode snapshot {path}: {message}")]
    SnapshotInvalid {
        /// Path to the snapshot.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },

    /// The requested application does not exist.
    #[error("Application not found: {name}")]
    ApplicationNotFound {
        /// Application name.
        name: String,
    },

    /// The requested project does not exist.
    #[error("Project not found: {name}")]
    ProjectNotFound {
        /// Project name.
        name: String,
    },

    /// Listing resources of a kind failed.
    #[error("Failed to list {kind} resources: {message}")]
    LookupFailed {
        /// Kind that was being listed.
        kind: String,
        /// Description of the failure.
        message: String,
    },
}

/// Errors raised by a normalizer step.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A JSON pointer in an ignore directive is malformed.
    #[error("Invalid JSON pointer '{pointer}': must start with '/'")]
    InvalidPointer {
        /// The rejected pointer.
        pointer: String,
    },

    /// A path expression could not be evaluated.
    #[error("Failed to evaluate path expression '{expression}': {message}")]
    ExpressionFailed {
        /// The expression.
        expression: String,
        /// Description of the failure.
        message: String,
    },
}

/// Errors raised by the interactive review loop.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Page size must be at least one.
    #[error("Page size must be at least 1")]
    ZeroPageSize,

    /// Reading or writing the terminal failed.
    #[error("Terminal IO failed: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Result type alias for appdrift operations.
pub type Result<T> = std::result::Result<T, AppDriftError>;

impl AppDriftError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl InventoryError {
    /// Creates a lookup error for a kind.
    #[must_use]
    pub fn lookup(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LookupFailed {
            kind: kind.into(),
            message: message.into(),
        }
    }
}
