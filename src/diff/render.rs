//! Unified diff rendering.
//!
//! The comparison is positional: line `i` of the current state is compared
//! with line `i` of the desired state. There is no edit-distance alignment, so
//! a pure insertion shifts every following line of the hunk out of place.
//! Existing reports rely on this output, so it is kept as is.

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

use crate::resource::ResourceIdentity;

/// Default number of context lines around a change.
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Role of a line inside a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Unchanged line shown for context.
    Context,
    /// Line present only in the desired state.
    Added,
    /// Line present only in the current state.
    Removed,
}

/// A rendered line of a hunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    /// Line role.
    pub kind: LineKind,
    /// Line text without the diff marker.
    pub text: String,
}

/// A run of changed lines plus surrounding context.
///
/// Starts are 0-based line offsets. Each length is bounded by the line count
/// of the opposite side, which is how existing reports number their hunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hunk {
    /// First current-state line of the hunk.
    pub old_start: usize,
    /// Current-state length, bounded by the desired-state line count.
    pub old_len: usize,
    /// First desired-state line of the hunk.
    pub new_start: usize,
    /// Desired-state length, bounded by the current-state line count.
    pub new_len: usize,
    /// Lines of the hunk.
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// Returns the `@@ -a,b +c,d @@` header.
    #[must_use]
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_len, self.new_start, self.new_len
        )
    }
}

/// Renders a document as canonical, human-readable text.
///
/// Keys are emitted in sorted order so that equal documents render equally.
#[must_use]
pub fn canonical_text(doc: &Value) -> String {
    serde_yaml::to_string(doc)
        .or_else(|_| serde_json::to_string_pretty(doc))
        .unwrap_or_else(|_| doc.to_string())
}

/// Computes positional hunks between the current and desired lines.
///
/// A hunk opens at the first index `i` where the two sequences disagree. It
/// starts `context` lines earlier, clamped to zero and to the end of the
/// previous hunk, and covers the window up to `i + 2 * context + 1`.
/// Disagreements inside that window belong to the hunk. The old length is
/// `min(desired.len(), i + 2 * context + 1) - start` and the new length is
/// `min(current.len(), i + 2 * context + 1) - start`.
#[must_use]
pub fn positional_hunks(current: &[&str], desired: &[&str], context: usize) -> Vec<Hunk> {
    let max_len = current.len().max(desired.len());
    let differs = |i: usize| current.get(i) != desired.get(i);

    let mut hunks = Vec::new();
    let mut floor = 0;
    let mut index = 0;

    while index < max_len {
        if !differs(index) {
            index += 1;
            continue;
        }

        let start = index.saturating_sub(context).max(floor);
        let bound = index + 2 * context + 1;
        let end = bound.min(max_len);

        let mut hunk = build_hunk(current, desired, start, end);
        hunk.old_len = bound.min(desired.len()).saturating_sub(start);
        hunk.new_len = bound.min(current.len()).saturating_sub(start);
        hunks.push(hunk);

        floor = end;
        index = end;
    }

    hunks
}

fn build_hunk(current: &[&str], desired: &[&str], start: usize, end: usize) -> Hunk {
    let mut lines = Vec::new();
    let mut i = start;
    while i < end {
        if current.get(i) == desired.get(i) {
            lines.push(DiffLine {
                kind: LineKind::Context,
                text: current[i].to_string(),
            });
            i += 1;
            continue;
        }

        let run_end = (i..end)
            .find(|&k| current.get(k) == desired.get(k))
            .unwrap_or(end);

        let removed = current.get(i..run_end.min(current.len())).unwrap_or_default();
        let added = desired.get(i..run_end.min(desired.len())).unwrap_or_default();

        lines.extend(removed.iter().map(|text| DiffLine {
            kind: LineKind::Removed,
            text: (*text).to_string(),
        }));
        lines.extend(added.iter().map(|text| DiffLine {
            kind: LineKind::Added,
            text: (*text).to_string(),
        }));

        i = run_end;
    }

    Hunk {
        old_start: start,
        old_len: 0,
        new_start: start,
        new_len: 0,
        lines,
    }
}

/// A unified diff of one resource, ready for display.
#[derive(Debug, Clone, Copy)]
pub struct UnifiedDiff<'a> {
    resource: &'a ResourceIdentity,
    hunks: &'a [Hunk],
}

impl<'a> UnifiedDiff<'a> {
    /// Creates a unified diff view over computed hunks.
    #[must_use]
    pub const fn new(resource: &'a ResourceIdentity, hunks: &'a [Hunk]) -> Self {
        Self { resource, hunks }
    }

    /// Renders the diff without terminal styling.
    #[must_use]
    pub fn plain(&self) -> String {
        self.render(false)
    }

    /// Renders the diff with terminal styling.
    ///
    /// Headers are bold, hunk headers cyan, additions green and removals red.
    #[must_use]
    pub fn colored(&self) -> String {
        self.render(true)
    }

    fn render(&self, styled: bool) -> String {
        let mut output = String::new();
        let kind = &self.resource.kind;
        let name = &self.resource.name;

        let old_header = format!("--- a/{kind}/{name} (current state)");
        let new_header = format!("+++ b/{kind}/{name} (desired state)");
        if styled {
            let _ = writeln!(output, "{}", old_header.bold());
            let _ = writeln!(output, "{}", new_header.bold());
        } else {
            let _ = writeln!(output, "{old_header}");
            let _ = writeln!(output, "{new_header}");
        }

        for hunk in self.hunks {
            let header = hunk.header();
            if styled {
                let _ = writeln!(output, "{}", header.cyan());
            } else {
                let _ = writeln!(output, "{header}");
            }

            for line in &hunk.lines {
                let rendered = match line.kind {
                    LineKind::Context => format!(" {}", line.text),
                    LineKind::Added => format!("+{}", line.text),
                    LineKind::Removed => format!("-{}", line.text),
                };
                let rendered = match (styled, line.kind) {
                    (true, LineKind::Added) => rendered.green().to_string(),
                    (true, LineKind::Removed) => rendered.red().to_string(),
                    _ => rendered,
                };
                let _ = writeln!(output, "{rendered}");
            }
        }

        output
    }
}
