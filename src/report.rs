//! Console summaries for the `apply` and `check` commands

use crate::check::CheckSummary;
use crate::files::RunSummary;

/// Print one line per changed or failed file followed by the totals.
pub fn print_apply_summary(summary: &RunSummary, dry_run: bool) {
    let verb = if dry_run { "would change" } else { "changed" };

    for outcome in summary.changed() {
        println!(
            "{} {}: {} table(s) in {} statement(s)",
            verb,
            outcome.path.display(),
            outcome.tables_changed,
            outcome.statements_changed
        );
    }

    let failed: Vec<_> = summary.failed().collect();
    if !failed.is_empty() {
        println!();
        println!("Failed ({}):", failed.len());
        for outcome in failed {
            println!(
                "  {}: {}",
                outcome.path.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    println!();
    println!(
        "Files: {} scanned, {} {}, {} failed | Statements: {} | Tables: {}{}",
        summary.files_scanned(),
        summary.files_changed(),
        verb,
        summary.files_failed(),
        summary.statements_changed(),
        summary.tables_changed(),
        if dry_run { " (dry run)" } else { "" }
    );
}

/// Print every spacing issue followed by the totals.
pub fn print_check_summary(summary: &CheckSummary) {
    for file in &summary.files {
        println!("--- {} ---", file.path.display());
        for issue in &file.issues {
            println!("  {}:{}  {}", issue.line, issue.column, issue.snippet);
        }
    }

    for (path, error) in &summary.failed {
        println!("  skipped {}: {}", path.display(), error);
    }

    if !summary.files.is_empty() || !summary.failed.is_empty() {
        println!();
    }
    if summary.has_issues() {
        println!(
            "{} spacing issue(s) in {} of {} file(s)",
            summary.issue_count(),
            summary.files.len(),
            summary.files_scanned
        );
    } else {
        println!("OK ({} file(s) checked)", summary.files_scanned);
    }
}
