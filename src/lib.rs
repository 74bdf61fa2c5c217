//! sql-nolock: adds `WITH (NOLOCK)` table hints to embedded SQL
//!
//! Scans host source files (VB.NET / ASP.NET by default) for string literals
//! containing `SELECT` statements and makes sure every table reference read
//! by those statements carries a `NOLOCK` hint. Other statements, comments
//! and string contents are never touched.

pub mod check;
pub mod engine;
pub mod error;
pub mod files;
pub mod host;
pub mod report;
pub mod util;

use std::path::PathBuf;

use anyhow::Result;

pub use check::{check_files, check_text, CheckSummary, SpacingIssue};
pub use engine::{rewrite_sql, SqlRewrite};
pub use error::NolockError;
pub use files::{FileOutcome, RunSummary};
pub use host::{rewrite_host_text, HostRewrite, HostSyntax};

/// File extensions processed when none are given
pub const DEFAULT_EXTENSIONS: &[&str] = &[".aspx", ".aspx.vb", ".vb"];

/// Which files to look at
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Base directory to search
    pub dir: PathBuf,
    /// Case-insensitive filename suffixes; the leading dot is optional
    pub extensions: Vec<String>,
    /// Glob patterns, relative to `dir`, of files to skip
    pub exclude: Vec<String>,
    /// Descend into subdirectories
    pub recursive: bool,
    /// `encoding_rs` label used to decode files
    pub encoding: String,
}

impl ScanOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude: Vec::new(),
            recursive: true,
            encoding: "utf-8".to_string(),
        }
    }
}

/// Options for a rewriting run
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    pub scan: ScanOptions,
    /// Report what would change without writing
    pub dry_run: bool,
    /// Copy each file to `<file>.bak` before overwriting it
    pub backup: bool,
    /// String-literal syntax of the host language
    pub syntax: HostSyntax,
}

/// Add NOLOCK hints to every matching file under the base directory
///
/// Invalid options (missing directory, unknown encoding, bad exclude
/// pattern) fail before any file is touched. Per-file failures are recorded
/// in the returned summary and do not stop the run.
pub fn apply_nolock(options: &ApplyOptions) -> Result<RunSummary> {
    let encoding = files::source::resolve_encoding(&options.scan.encoding)?;
    let paths = files::discover_files(&options.scan)?;

    tracing::info!(
        "Found {} file(s) in {}",
        paths.len(),
        options.scan.dir.display()
    );

    let process = files::ProcessOptions {
        encoding,
        syntax: options.syntax,
        dry_run: options.dry_run,
        backup: options.backup,
    };
    let summary = files::process_files(&paths, &process);

    tracing::info!(
        "{} file(s) {}, {} table reference(s) hinted, {} failed",
        summary.files_changed(),
        if options.dry_run { "would change" } else { "changed" },
        summary.tables_changed(),
        summary.files_failed()
    );

    Ok(summary)
}
