//! Configuration parser for loading configuration files.
//!
//! This module handles loading configuration from YAML files and environment
//! variables, with proper precedence and error handling.

use crate::error::{AppDriftError, ConfigError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::DriftConfig;

/// Environment variable overriding `review.diff_page_size`.
pub const ENV_DIFF_PAGE_SIZE: &str = "APPDRIFT_DIFF_PAGE_SIZE";

/// Environment variable overriding `review.orphan_page_size`.
pub const ENV_ORPHAN_PAGE_SIZE: &str = "APPDRIFT_ORPHAN_PAGE_SIZE";

/// Environment variable overriding `diff.context_lines`.
pub const ENV_CONTEXT_LINES: &str = "APPDRIFT_CONTEXT_LINES";

/// Configuration parser.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving the `.env` file.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving the `.env` file.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<DriftConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(AppDriftError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppDriftError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<DriftConfig> {
        debug!("Parsing YAML configuration");

        if content.trim().is_empty() {
            return Ok(DriftConfig::default());
        }

        let config: DriftConfig = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            AppDriftError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })?;

        debug!("Successfully parsed configuration for project: {}", config.project);
        Ok(config)
    }

    /// Loads configuration with environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an
    /// override is not a number.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<DriftConfig> {
        let mut config = self.load_file(path)?;
        Self::apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Loads the configuration for a run.
    ///
    /// An explicit path must exist. Without one, the file is searched for
    /// with [`find_config_file`] and the defaults apply when none is found.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file cannot be loaded.
    pub fn load_or_default(&self, explicit: Option<&Path>) -> Result<DriftConfig> {
        if let Some(path) = explicit {
            return self.load_with_env(path);
        }

        let start = self
            .base_path
            .clone()
            .map_or_else(std::env::current_dir, Ok)?;

        match find_config_file(&start) {
            Ok(path) => self.load_with_env(path),
            Err(_) => {
                debug!("No configuration file found, using defaults");
                let mut config = DriftConfig::default();
                Self::apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
                Ok(config)
            }
        }
    }

    /// Applies environment variable overrides to the configuration.
    ///
    /// `lookup` resolves a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is not a non-negative integer.
    pub fn apply_env_overrides(
        config: &mut DriftConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(size) = parse_override(&lookup, ENV_DIFF_PAGE_SIZE)? {
            debug!("Overriding review.diff_page_size from environment");
            config.review.diff_page_size = size;
        }

        if let Some(size) = parse_override(&lookup, ENV_ORPHAN_PAGE_SIZE)? {
            debug!("Overriding review.orphan_page_size from environment");
            config.review.orphan_page_size = size;
        }

        if let Some(lines) = parse_override(&lookup, ENV_CONTEXT_LINES)? {
            debug!("Overriding diff.context_lines from environment");
            config.diff.context_lines = lines;
        }

        Ok(())
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                AppDriftError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

fn parse_override(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<usize>> {
    let Some(value) = lookup(name) else {
        return Ok(None);
    };
    value.trim().parse::<usize>().map(Some).map_err(|_| {
        AppDriftError::Config(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        })
    })
}

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["appdrift.yaml", "appdrift.yml", ".appdrift.yaml"];

/// Finds the configuration file in the given directory, its parents, or the
/// user configuration directory.
///
/// # Errors
///
/// Returns an error if no configuration file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        if let Some(found) = find_in(&current) {
            return Ok(found);
        }

        if !current.pop() {
            break;
        }
    }

    if let Some(found) = dirs::config_dir().and_then(|dir| find_in(&dir.join("appdrift"))) {
        return Ok(found);
    }

    Err(AppDriftError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }))
}

fn find_in(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_FILES
        .iter()
        .map(|filename| dir.join(filename))
        .find(|path| path.exists())
        .inspect(|path| info!("Found configuration file: {}", path.display()))
}
