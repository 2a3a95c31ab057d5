//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// appdrift - Drift and orphan review for GitOps-managed resources.
#[derive(Parser, Debug)]
#[command(name = "appdrift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, env = "APPDRIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review differences between desired and live state.
    Diff {
        /// Inventory snapshot file (YAML or JSON).
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Only diff this application.
        #[arg(short, long)]
        app: Option<String>,

        /// Resources per review page.
        #[arg(long)]
        page_size: Option<usize>,

        /// Print every diff without interactive paging.
        #[arg(long)]
        no_pager: bool,
    },

    /// Review resources no application manages anymore.
    Orphans {
        /// Inventory snapshot file (YAML or JSON).
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Project to scan (defaults to the configured project).
        #[arg(short, long)]
        project: Option<String>,

        /// Skip cluster-scoped kinds.
        #[arg(long)]
        namespaced_only: bool,

        /// Orphans per review page.
        #[arg(long)]
        page_size: Option<usize>,

        /// Print every orphan without interactive paging.
        #[arg(long)]
        no_pager: bool,
    },

    /// Show the cluster-scoped kinds scanned for orphans.
    Catalog,

    /// Validate the configuration.
    Validate {
        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_diff() {
        let cli = Cli::try_parse_from([
            "appdrift", "diff", "--snapshot", "snap.yaml", "--app", "web", "--no-pager",
        ])
        .expect("arguments should parse");

        match cli.command {
            Commands::Diff {
                snapshot,
                app,
                page_size,
                no_pager,
            } => {
                assert_eq!(snapshot, PathBuf::from("snap.yaml"));
                assert_eq!(app.as_deref(), Some("web"));
                assert_eq!(page_size, None);
                assert!(no_pager);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_orphans_with_global_flags() {
        let cli = Cli::try_parse_from([
            "appdrift", "orphans", "-s", "snap.json", "--namespaced-only", "--output", "json", "-v",
        ])
        .expect("arguments should parse");

        assert!(cli.verbose);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Orphans {
                namespaced_only: true,
                ..
            }
        ));
    }

    #[test]
    fn test_snapshot_is_required() {
        assert!(Cli::try_parse_from(["appdrift", "diff"]).is_err());
    }
}
