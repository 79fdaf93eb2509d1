//! CLI output formatting for `run` and `check`.
//!
//! # Stage-First Display
//!
//! The run summary follows the pipeline: one header line per stage, with the
//! stage's counts as indented context lines below it. The catalog block comes
//! last and carries the numbers a user usually wants: totals and what this
//! run added.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! Extract
//!     Archives: 2 found, 1 extracted, 1 skipped, 0 failed
//!     Images: 14 extracted
//! Normalize
//!     Albums: 2 found, 0 failed
//!     Images: 14 processed, 9 skipped, 0 failed
//!     Discovered: 2 albums, 23 paths
//! Catalog → index.json
//!     Total albums: 5
//!     Total paths: 61
//!     New albums added: 1
//!     New paths added: 14
//! ```
//!
//! ## Check
//!
//! ```text
//! Catalog → index.json
//!     Albums: 5
//!     Paths: 61
//! Missing on disk (1)
//!     Trip2021: timeliner_repo/processed/downloaded/Trip2021/c.avif
//! Duplicates (0)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::CatalogIssue;
use crate::pipeline::{CheckReport, Outcome, RunSummary};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Stage or section header with a target: `Catalog → index.json`.
fn target_header(title: &str, target: &Path) -> String {
    format!("{} \u{2192} {}", title, target.display())
}

fn issue_lines(title: &str, issues: &[CatalogIssue]) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", title, issues.len())];
    lines.extend(
        issues
            .iter()
            .map(|issue| format!("{}{}: {}", indent(1), issue.album, issue.path)),
    );
    lines
}

// ============================================================================
// run
// ============================================================================

/// Format the summary printed at the end of `run`.
pub fn format_run_summary(summary: &RunSummary, catalog: &Path) -> Vec<String> {
    let ex = &summary.extraction;
    let mut lines = vec![
        "Extract".to_string(),
        format!(
            "{}Archives: {} found, {} extracted, {} skipped, {} failed",
            indent(1),
            ex.archives_found,
            ex.archives_extracted,
            ex.archives_skipped,
            ex.archives_failed
        ),
        format!("{}Images: {} extracted", indent(1), ex.images_extracted),
    ];

    if summary.outcome == Outcome::NoAlbums {
        lines.push("No albums to process".to_string());
        return lines;
    }

    lines.push("Normalize".to_string());
    lines.push(format!(
        "{}Albums: {} found, {} failed",
        indent(1),
        summary.albums_found,
        summary.albums_failed
    ));
    lines.push(format!(
        "{}Images: {} processed, {} skipped, {} failed",
        indent(1),
        summary.images_processed,
        summary.images_skipped,
        summary.images_failed
    ));
    lines.push(format!(
        "{}Discovered: {} albums, {} paths",
        indent(1),
        summary.discovered_albums,
        summary.discovered_paths
    ));

    lines.push(target_header("Catalog", catalog));
    lines.push(format!("{}Total albums: {}", indent(1), summary.total_albums));
    lines.push(format!("{}Total paths: {}", indent(1), summary.total_paths));
    lines.push(format!(
        "{}New albums added: {}",
        indent(1),
        summary.merge.added_albums
    ));
    lines.push(format!(
        "{}New paths added: {}",
        indent(1),
        summary.merge.added_paths
    ));
    lines
}

pub fn print_run_summary(summary: &RunSummary, catalog: &Path) {
    for line in format_run_summary(summary, catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Format the result of `check`.
pub fn format_check_report(report: &CheckReport) -> Vec<String> {
    if !report.exists {
        return vec![format!(
            "No catalog at {} yet",
            report.catalog.display()
        )];
    }

    let mut lines = vec![
        target_header("Catalog", &report.catalog),
        format!("{}Albums: {}", indent(1), report.total_albums),
        format!("{}Paths: {}", indent(1), report.total_paths),
    ];
    if report.audit.is_clean() {
        lines.push("No issues found".to_string());
        return lines;
    }
    lines.extend(issue_lines("Missing on disk", &report.audit.missing));
    lines.extend(issue_lines("Duplicates", &report.audit.duplicates));
    lines
}

pub fn print_check_report(report: &CheckReport) {
    for line in format_check_report(report) {
        println!("{}", line);
    }
}
