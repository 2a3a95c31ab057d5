//! appdrift CLI entrypoint.
//!
//! This is the main entrypoint for the appdrift command-line tool.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use appdrift::cli::{Cli, Commands, OutputFormatter};
use appdrift::config::{ConfigParser, ConfigValidator, DriftConfig, find_config_file};
use appdrift::diff::{DiffEngine, DiffResult};
use appdrift::error::{AppDriftError, InventoryError, Result};
use appdrift::inventory::{InventorySource, SnapshotSource};
use appdrift::orphan::{OrphanDetector, OrphanReport};
use appdrift::review::{DiffDisplayer, OrphanDisplayer, ReviewOutcome, ReviewPaginator};

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    let styled = std::io::stdout().is_terminal();
    if !styled {
        colored::control::set_override(false);
    }

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!(
                "Error: {}",
                AppDriftError::internal(format!("Failed to create async runtime: {e}"))
            );
            return ExitCode::FAILURE;
        }
    };

    let pending = match runtime.block_on(run(cli, styled)) {
        Ok(pending) => pending,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    drop(runtime);

    // Interactive review blocks on stdin, so it runs outside the runtime.
    let Some(review) = pending else {
        return ExitCode::SUCCESS;
    };
    match review.run() {
        Ok(ReviewOutcome::Completed) => ExitCode::SUCCESS,
        Ok(ReviewOutcome::Quit) => {
            debug!("Review stopped before the last page");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// A review to run once async work is done.
enum PendingReview {
    /// Page through drifted resources.
    Diffs {
        results: Vec<DiffResult>,
        page_size: usize,
        styled: bool,
    },
    /// Page through orphaned resources.
    Orphans {
        report: OrphanReport,
        page_size: usize,
    },
}

impl PendingReview {
    /// Runs the review on the terminal.
    fn run(&self) -> Result<ReviewOutcome> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();

        let outcome = match self {
            Self::Diffs {
                results,
                page_size,
                styled,
            } => ReviewPaginator::new(stdin.lock(), stdout.lock(), *page_size)?
                .run(&DiffDisplayer::new(results, *styled))?,
            Self::Orphans { report, page_size } => {
                ReviewPaginator::new(stdin.lock(), stdout.lock(), *page_size)?
                    .run(&OrphanDisplayer::new(report))?
            }
        };
        Ok(outcome)
    }
}

/// Main async entry point.
async fn run(cli: Cli, styled: bool) -> Result<Option<PendingReview>> {
    let formatter = OutputFormatter::new(cli.output).with_styling(styled);

    match cli.command {
        Commands::Validate { warnings } => {
            cmd_validate(cli.config.as_ref(), warnings, &formatter)?;
            Ok(None)
        }
        Commands::Catalog => {
            let config = load_config(cli.config.as_deref())?;
            cmd_catalog(&config, &formatter)?;
            Ok(None)
        }
        Commands::Diff {
            snapshot,
            app,
            page_size,
            no_pager,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let page_size = page_size.unwrap_or(config.review.diff_page_size);
            cmd_diff(&config, &snapshot, app.as_deref(), page_size, no_pager, &formatter).await
        }
        Commands::Orphans {
            snapshot,
            project,
            namespaced_only,
            page_size,
            no_pager,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let page_size = page_size.unwrap_or(config.review.orphan_page_size);
            let project = project.unwrap_or_else(|| config.project.clone());
            cmd_orphans(
                &config,
                &snapshot,
                &project,
                namespaced_only,
                page_size,
                no_pager,
                &formatter,
            )
            .await
        }
    }
}

/// Validate configuration.
fn cmd_validate(
    config_path: Option<&PathBuf>,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let config_file = resolve_config_path(config_path)?;
    info!("Validating configuration: {}", config_file.display());

    // Load .env
    let parser = ConfigParser::new().with_base_path(
        config_file
            .parent()
            .unwrap_or_else(|| Path::new(".")),
    );
    parser.load_dotenv()?;

    let config = parser.load_with_env(&config_file)?;

    // Report every problem, then fail on the first error
    let validator = ConfigValidator::new();
    emit(&formatter.format_validation(&validator.check(&config), show_warnings))?;
    validator.validate(&config)?;
    Ok(())
}

/// Show the effective cluster-scoped catalog.
fn cmd_catalog(config: &DriftConfig, formatter: &OutputFormatter) -> Result<()> {
    let catalog = config.effective_catalog();
    emit(&formatter.format_catalog(&catalog, config.uses_default_catalog()))
}

/// Review drift between target and live state.
async fn cmd_diff(
    config: &DriftConfig,
    snapshot: &Path,
    app: Option<&str>,
    page_size: usize,
    no_pager: bool,
    formatter: &OutputFormatter,
) -> Result<Option<PendingReview>> {
    let source = SnapshotSource::load(snapshot).await?;
    let engine = DiffEngine::new(config.diff_options());

    let applications: Vec<_> = source
        .list_applications()
        .await?
        .into_iter()
        .filter(|a| app.is_none_or(|name| a.name == name))
        .collect();

    if let Some(name) = app
        && applications.is_empty()
    {
        return Err(InventoryError::ApplicationNotFound {
            name: name.to_string(),
        }
        .into());
    }

    let mut results = Vec::new();
    for application in &applications {
        let resources = source.managed_resources(&application.name).await?;
        results.extend(engine.diff_application(application, &resources));
    }
    info!(
        "Compared {} resource(s) across {} application(s)",
        results.len(),
        applications.len()
    );

    if no_pager || formatter.is_json() {
        emit(&formatter.format_diffs(&results))?;
        return Ok(None);
    }

    Ok(Some(PendingReview::Diffs {
        results,
        page_size,
        styled: formatter.is_styled(),
    }))
}

/// Review orphaned resources.
async fn cmd_orphans(
    config: &DriftConfig,
    snapshot: &Path,
    project: &str,
    namespaced_only: bool,
    page_size: usize,
    no_pager: bool,
    formatter: &OutputFormatter,
) -> Result<Option<PendingReview>> {
    let source = SnapshotSource::load(snapshot).await?;
    let catalog = config.effective_catalog();

    let report = OrphanDetector::new(&source, &catalog)
        .with_project(project)
        .namespaced_only(namespaced_only)
        .detect()
        .await?;

    if no_pager || formatter.is_json() {
        emit(&formatter.format_orphans(&report))?;
        return Ok(None);
    }

    Ok(Some(PendingReview::Orphans { report, page_size }))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Resolves the configuration file path.
fn resolve_config_path(config_path: Option<&PathBuf>) -> Result<PathBuf> {
    config_path.map_or_else(|| find_config_file("."), |path| Ok(path.clone()))
}

/// Loads the configuration, falling back to defaults when no file exists.
fn load_config(config_path: Option<&Path>) -> Result<DriftConfig> {
    let parser = ConfigParser::new();
    parser.load_dotenv()?;
    parser.load_or_default(config_path)
}

/// Writes a report to stdout.
fn emit(output: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output.trim_end())?;
    Ok(())
}
