//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::ValidationResult;
use crate::diff::{DiffResult, DiffSummary};
use crate::orphan::{ClusterScopedKind, OrphanReport};
use crate::review::orphan_table;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
    /// Whether terminal styling is enabled.
    styled: bool,
}

/// Catalog row for table display.
#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Group")]
    group: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self {
            format,
            styled: true,
        }
    }

    /// Enables or disables terminal styling.
    #[must_use]
    pub const fn with_styling(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Returns true if output is JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Returns true if terminal styling is enabled.
    #[must_use]
    pub const fn is_styled(&self) -> bool {
        self.styled
    }

    /// Formats diff results for non-interactive display.
    #[must_use]
    pub fn format_diffs(&self, results: &[DiffResult]) -> String {
        let summary = DiffSummary::from_results(results);
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&DiffsJson { summary, results })
                .unwrap_or_default(),
            OutputFormat::Text => self.format_diffs_text(results, summary),
        }
    }

    /// Formats diff results as text.
    fn format_diffs_text(&self, results: &[DiffResult], summary: DiffSummary) -> String {
        let mut output = String::new();

        for result in results.iter().filter(|r| r.out_of_sync) {
            if result.suppressed {
                let _ = writeln!(
                    output,
                    "{} {} differs locally but upstream reports it synced",
                    self.mark_warning(),
                    result.resource
                );
                continue;
            }
            let diff = result.unified();
            output.push_str(&if self.styled { diff.colored() } else { diff.plain() });
            output.push('\n');
        }

        let mark = if summary.is_converged() {
            self.mark_success()
        } else {
            self.mark_warning()
        };
        let _ = writeln!(output, "{mark} {summary}");
        output
    }

    /// Formats an orphan report for non-interactive display.
    #[must_use]
    pub fn format_orphans(&self, report: &OrphanReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = String::new();

                if report.is_clean() {
                    let _ = writeln!(
                        output,
                        "{} No orphaned resources in project {}",
                        self.mark_success(),
                        report.project
                    );
                } else {
                    output.push_str(&orphan_table(report.entries()));
                    output.push('\n');
                    let _ = writeln!(
                        output,
                        "\n{} {} orphaned resource(s) in project {}",
                        self.mark_warning(),
                        report.total_orphans(),
                        report.project
                    );
                }

                for kind in &report.skipped_kinds {
                    let _ = writeln!(
                        output,
                        "{} Skipped {kind}: lookup failed",
                        self.mark_warning()
                    );
                }

                let _ = writeln!(
                    output,
                    "   Run {} at {}",
                    report.run_id,
                    report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
                output
            }
        }
    }

    /// Formats the effective cluster-scoped catalog.
    #[must_use]
    pub fn format_catalog(&self, catalog: &[ClusterScopedKind], is_default: bool) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&CatalogJson {
                source: if is_default { "default" } else { "config" },
                kinds: catalog,
            })
            .unwrap_or_default(),
            OutputFormat::Text => {
                let rows: Vec<CatalogRow> = catalog
                    .iter()
                    .enumerate()
                    .map(|(i, k)| CatalogRow {
                        index: i + 1,
                        kind: k.kind.clone(),
                        group: if k.group.is_empty() {
                            String::from("(core)")
                        } else {
                            k.group.clone()
                        },
                    })
                    .collect();

                let mut output = Table::new(rows).to_string();
                let _ = write!(
                    output,
                    "\n\n{} cluster-scoped kind(s) from {} catalog\n",
                    catalog.len(),
                    if is_default { "built-in" } else { "configured" }
                );
                output
            }
        }
    }

    /// Formats a configuration validation result.
    #[must_use]
    pub fn format_validation(&self, result: &ValidationResult, show_warnings: bool) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&ValidationJson {
                valid: result.is_valid(),
                errors: result.errors.iter().map(ToString::to_string).collect(),
                warnings: &result.warnings,
            })
            .unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = String::new();

                for error in &result.errors {
                    let _ = writeln!(output, "{} {error}", self.mark_error());
                }
                if show_warnings {
                    for warning in &result.warnings {
                        let _ = writeln!(output, "{} {warning}", self.mark_warning());
                    }
                }

                if result.is_valid() {
                    let _ = writeln!(
                        output,
                        "{} Configuration is valid ({} warning(s))",
                        self.mark_success(),
                        result.warning_count()
                    );
                } else {
                    let _ = writeln!(
                        output,
                        "{} Configuration has {} error(s)",
                        self.mark_error(),
                        result.error_count()
                    );
                }
                output
            }
        }
    }

    fn mark_success(&self) -> String {
        if self.styled {
            "✓".green().to_string()
        } else {
            String::from("✓")
        }
    }

    fn mark_warning(&self) -> String {
        if self.styled {
            "⚠".yellow().to_string()
        } else {
            String::from("⚠")
        }
    }

    fn mark_error(&self) -> String {
        if self.styled {
            "✗".red().to_string()
        } else {
            String::from("✗")
        }
    }
}

// JSON serialization helpers

#[derive(Serialize)]
struct DiffsJson<'a> {
    summary: DiffSummary,
    results: &'a [DiffResult],
}

#[derive(Serialize)]
struct CatalogJson<'a> {
    source: &'static str,
    kinds: &'a [ClusterScopedKind],
}

#[derive(Serialize)]
struct ValidationJson<'a> {
    valid: bool,
    errors: Vec<String>,
    warnings: &'a [String],
}
