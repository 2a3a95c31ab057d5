//! Displayers for drift and orphan review.

use std::io::Write;

use colored::Colorize;
use tabled::{Table, Tabled};

use super::paginator::Displayer;
use crate::diff::{DiffResult, DiffSummary};
use crate::orphan::OrphanReport;
use crate::resource::ResourceIdentity;

/// Orphan row for table display.
#[derive(Tabled)]
struct OrphanRow {
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Name")]
    name: String,
}

/// Renders `(owner, resource)` pairs as a table.
///
/// Cluster-scoped orphans are shown with a `<cluster>` owner.
pub fn orphan_table<'a>(entries: impl IntoIterator<Item = (&'a str, &'a ResourceIdentity)>) -> String {
    let rows: Vec<OrphanRow> = entries
        .into_iter()
        .map(|(owner, resource)| OrphanRow {
            owner: if owner.is_empty() {
                String::from("<cluster>")
            } else {
                owner.to_string()
            },
            group: resource.group.clone(),
            kind: resource.kind.clone(),
            namespace: resource.namespace.clone(),
            name: resource.name.clone(),
        })
        .collect();
    Table::new(rows).to_string()
}

/// Pages over out-of-sync resources, one unified diff per item.
#[derive(Debug)]
pub struct DiffDisplayer<'a> {
    reviewable: Vec<&'a DiffResult>,
    suppressed: Vec<&'a DiffResult>,
    summary: DiffSummary,
    styled: bool,
}

impl<'a> DiffDisplayer<'a> {
    /// Creates a displayer over diff results.
    ///
    /// In-sync and suppressed results are not paged; suppressed ones are
    /// listed in the summary.
    #[must_use]
    pub fn new(results: &'a [DiffResult], styled: bool) -> Self {
        Self {
            reviewable: results
                .iter()
                .filter(|r| r.out_of_sync && !r.suppressed)
                .collect(),
            suppressed: results.iter().filter(|r| r.suppressed).collect(),
            summary: DiffSummary::from_results(results),
            styled,
        }
    }
}

impl Displayer for DiffDisplayer<'_> {
    fn total(&self) -> usize {
        self.reviewable.len()
    }

    fn render(&self, start: usize, end: usize, out: &mut dyn Write) -> std::io::Result<()> {
        for result in &self.reviewable[start..end] {
            let diff = result.unified();
            let text = if self.styled { diff.colored() } else { diff.plain() };
            write!(out, "{text}")?;
        }
        Ok(())
    }

    fn summary(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for result in &self.suppressed {
            writeln!(
                out,
                "note: {} differs locally but upstream reports it synced",
                result.resource
            )?;
        }

        let line = self.summary.to_string();
        if !self.styled {
            writeln!(out, "{line}")
        } else if self.summary.is_converged() {
            writeln!(out, "{} {line}", "✓".green())
        } else {
            writeln!(out, "{} {line}", "✗".yellow())
        }
    }
}

/// Pages over orphaned resources as table slices.
#[derive(Debug)]
pub struct OrphanDisplayer<'a> {
    report: &'a OrphanReport,
    entries: Vec<(&'a str, &'a ResourceIdentity)>,
}

impl<'a> OrphanDisplayer<'a> {
    /// Creates a displayer over an orphan report.
    #[must_use]
    pub fn new(report: &'a OrphanReport) -> Self {
        Self {
            report,
            entries: report.entries().collect(),
        }
    }
}

impl Displayer for OrphanDisplayer<'_> {
    fn total(&self) -> usize {
        self.entries.len()
    }

    fn render(&self, start: usize, end: usize, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "{}", orphan_table(self.entries[start..end].iter().copied()))
    }

    fn summary(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for kind in &self.report.skipped_kinds {
            writeln!(out, "warning: skipped {kind}, lookup failed")?;
        }
        writeln!(
            out,
            "{} orphaned resource(s) in project {}",
            self.report.total_orphans(),
            self.report.project
        )
    }
}
