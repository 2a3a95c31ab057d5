//! CLI module for appdrift.
//!
//! This module provides the command-line interface for reviewing drift and
//! orphaned resources.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
