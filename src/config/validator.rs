//! Configuration validation.
//!
//! Range checks come from the `validator` derives on the config sections;
//! catalog and project checks are done here.

use crate::error::{AppDriftError, ConfigError, Result};
use ::validator::{Validate, ValidationErrors};
use std::collections::HashSet;
use tracing::debug;

use super::spec::DriftConfig;
use crate::orphan::ClusterScopedKind;

/// Validator for drift configurations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a configuration and collects every problem found.
    #[must_use]
    pub fn check(&self, config: &DriftConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_project(&config.project, &mut result);
        if let Err(errors) = config.review.validate() {
            Self::collect_field_errors("review", &errors, &mut result);
        }
        if let Err(errors) = config.diff.validate() {
            Self::collect_field_errors("diff", &errors, &mut result);
        }
        if let Some(catalog) = &config.catalog {
            Self::validate_catalog(catalog, &mut result);
        }

        result
    }

    /// Validates a configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error if any check fails.
    pub fn validate(&self, config: &DriftConfig) -> Result<ValidationResult> {
        let result = self.check(config);

        if result.errors.is_empty() {
            debug!("Configuration validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(AppDriftError::Config(ConfigError::validation(
                first_error.message.clone(),
                first_error.field.clone(),
            )))
        }
    }

    /// Validates the default project name.
    fn validate_project(project: &str, result: &mut ValidationResult) {
        if project.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("project"),
                message: String::from("Project name cannot be empty"),
            });
        } else if !is_valid_name(project) {
            result.errors.push(ValidationError {
                field: String::from("project"),
                message: format!(
                    "Project name '{project}' is invalid. Must be lowercase alphanumeric with hyphens or dots."
                ),
            });
        }
    }

    /// Converts derive-based range errors into field errors.
    fn collect_field_errors(section: &str, errors: &ValidationErrors, result: &mut ValidationResult) {
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                result.errors.push(ValidationError {
                    field: format!("{section}.{field}"),
                    message,
                });
            }
        }
    }

    /// Validates a custom cluster-scoped catalog.
    fn validate_catalog(catalog: &[ClusterScopedKind], result: &mut ValidationResult) {
        if catalog.is_empty() {
            result.warnings.push(String::from(
                "catalog: Empty catalog, no cluster-scoped kinds will be scanned",
            ));
            return;
        }

        let mut seen = HashSet::new();
        for (i, entry) in catalog.iter().enumerate() {
            if entry.kind.trim().is_empty() {
                result.errors.push(ValidationError {
                    field: format!("catalog[{i}].kind"),
                    message: String::from("Kind cannot be empty"),
                });
                continue;
            }

            if !seen.insert(entry) {
                result.errors.push(ValidationError {
                    field: format!("catalog[{i}]"),
                    message: format!("Duplicate catalog entry: {entry}"),
                });
            }

            if entry.group.is_empty() && entry.kind != "Namespace" && entry.kind != "PersistentVolume" {
                result.warnings.push(format!(
                    "catalog[{i}]: Kind '{}' has no group, only core kinds match an empty group",
                    entry.kind
                ));
            }
        }
    }
}

/// Validates that a name follows the naming convention.
/// Names must be lowercase alphanumeric with hyphens or dots, starting and
/// ending with an alphanumeric character.
fn is_valid_name(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    let Some(last) = name.chars().last() else {
        return false;
    };

    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return false;
    }

    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of errors.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_name() {
        assert!(is_valid_name("default"));
        assert!(is_valid_name("team-a"));
        assert!(is_valid_name("platform.prod"));
        assert!(is_valid_name("1st"));
    }

    #[test]
    fn test_invalid_name() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("Team")); // uppercase
        assert!(!is_valid_name("team_a")); // underscore
        assert!(!is_valid_name("team-")); // ends with hyphen
        assert!(!is_valid_name(".team")); // starts with dot
    }

    #[test]
    fn test_default_config_is_valid() {
        let result = ConfigValidator::new()
            .validate(&DriftConfig::default())
            .expect("defaults should validate");
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let mut config = DriftConfig::default();
        config.review.orphan_page_size = 0;

        let result = ConfigValidator::new().check(&config);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.errors[0].field, "review.orphan_page_size");
        assert!(ConfigValidator::new().validate(&config).is_err());
    }

    #[test]
    fn test_validate_fails_on_first_error() {
        let mut config = DriftConfig::default();
        config.project = String::from("Bad_Name");
        config.diff.context_lines = 500;

        match ConfigValidator::new().validate(&config) {
            Err(AppDriftError::Config(ConfigError::ValidationError { field, .. })) => {
                assert_eq!(field.as_deref(), Some("project"));
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_catalog_entry() {
        let config = DriftConfig {
            catalog: Some(vec![
                ClusterScopedKind::new("StorageClass", "storage.k8s.io"),
                ClusterScopedKind::new("StorageClass", "storage.k8s.io"),
            ]),
            ..DriftConfig::default()
        };

        let result = ConfigValidator::new().check(&config);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.errors[0].field, "catalog[1]");
    }

    #[test]
    fn test_empty_kind_and_empty_catalog() {
        let config = DriftConfig {
            catalog: Some(vec![ClusterScopedKind::new(" ", "")]),
            ..DriftConfig::default()
        };
        assert_eq!(ConfigValidator::new().check(&config).errors[0].field, "catalog[0].kind");

        let config = DriftConfig {
            catalog: Some(Vec::new()),
            ..DriftConfig::default()
        };
        let result = ConfigValidator::new().check(&config);
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_groupless_custom_kind_warns() {
        let config = DriftConfig {
            catalog: Some(vec![ClusterScopedKind::new("ClusterRole", "")]),
            ..DriftConfig::default()
        };
        let result = ConfigValidator::new().check(&config);
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 1);
    }
}
