//! Configuration module for appdrift.
//!
//! This module handles all configuration-related functionality:
//! - Parsing and deserializing `appdrift.yaml`
//! - Environment overrides and `.env` loading
//! - Validation of configuration values

mod parser;
mod spec;
mod validator;

pub use parser::{
    ConfigParser, DEFAULT_CONFIG_FILES, ENV_CONTEXT_LINES, ENV_DIFF_PAGE_SIZE,
    ENV_ORPHAN_PAGE_SIZE, find_config_file,
};
pub use spec::{
    DEFAULT_DIFF_PAGE_SIZE, DEFAULT_ORPHAN_PAGE_SIZE, DiffConfig, DriftConfig, ReviewConfig,
};
pub use self::validator::{ConfigValidator, ValidationError, ValidationResult};
