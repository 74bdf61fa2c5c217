//! File layer: discovery, decoding and per-file rewriting

pub mod discovery;
pub mod source;

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use rayon::prelude::*;

use crate::error::NolockError;
use crate::host::{rewrite_host_text, HostRewrite, HostSyntax};

pub use discovery::discover_files;
pub use source::{read_source, write_backup, write_source, SourceText};

/// Minimum number of files to benefit from parallel processing.
/// Below this threshold, sequential processing is faster due to rayon overhead.
pub const PARALLEL_THRESHOLD: usize = 8;

/// How each file is rewritten and persisted
#[derive(Debug, Clone, Copy)]
pub struct ProcessOptions {
    pub encoding: &'static Encoding,
    pub syntax: HostSyntax,
    pub dry_run: bool,
    pub backup: bool,
}

/// Result of processing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Whether the file content changed (or would change, in dry-run mode)
    pub changed: bool,
    pub statements_changed: usize,
    pub tables_changed: usize,
    /// Error chain when the file could not be processed
    pub error: Option<String>,
}

impl FileOutcome {
    fn failed(path: &Path, error: anyhow::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            changed: false,
            statements_changed: 0,
            tables_changed: 0,
            error: Some(format!("{:#}", error)),
        }
    }
}

/// Totals over every processed file
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl RunSummary {
    pub fn files_scanned(&self) -> usize {
        self.outcomes.len()
    }

    pub fn files_changed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.changed).count()
    }

    pub fn files_failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }

    pub fn statements_changed(&self) -> usize {
        self.outcomes.iter().map(|o| o.statements_changed).sum()
    }

    pub fn tables_changed(&self) -> usize {
        self.outcomes.iter().map(|o| o.tables_changed).sum()
    }

    pub fn changed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.changed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.error.is_some())
    }
}

/// Run the host rewriter, turning an unexpected panic into a file error.
fn rewrite_guarded(path: &Path, text: &str, syntax: &HostSyntax) -> Result<HostRewrite, NolockError> {
    panic::catch_unwind(AssertUnwindSafe(|| rewrite_host_text(text, syntax))).map_err(|_| {
        NolockError::EngineFault {
            path: path.to_path_buf(),
        }
    })
}

fn try_process_file(path: &Path, options: &ProcessOptions) -> Result<FileOutcome, NolockError> {
    let source = read_source(path, options.encoding)?;
    let rewrite = rewrite_guarded(path, &source.text, &options.syntax)?;
    let changed = rewrite.is_changed() && rewrite.text != source.text;

    if changed && !options.dry_run {
        if options.backup {
            let backup = write_backup(path, &source)?;
            tracing::debug!("Backup written: {}", backup.display());
        }
        write_source(path, &source, &rewrite.text)?;
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        changed,
        statements_changed: if changed { rewrite.statements_changed } else { 0 },
        tables_changed: if changed { rewrite.tables_changed } else { 0 },
        error: None,
    })
}

/// Rewrite one file. Failures are logged and recorded in the outcome.
pub fn process_file(path: &Path, options: &ProcessOptions) -> FileOutcome {
    match try_process_file(path, options) {
        Ok(outcome) => {
            if outcome.changed {
                tracing::debug!(
                    "{}: {} table reference(s) in {} statement(s)",
                    path.display(),
                    outcome.tables_changed,
                    outcome.statements_changed
                );
            }
            outcome
        }
        Err(err) => {
            let err = anyhow::Error::new(err);
            tracing::warn!("Skipping {}: {:#}", path.display(), err);
            FileOutcome::failed(path, err)
        }
    }
}

/// Rewrite many files, using parallel processing for larger file sets.
///
/// Outcomes keep the order of `files`.
pub fn process_files(files: &[PathBuf], options: &ProcessOptions) -> RunSummary {
    let outcomes = if files.len() >= PARALLEL_THRESHOLD {
        files
            .par_iter()
            .map(|file| process_file(file, options))
            .collect()
    } else {
        files
            .iter()
            .map(|file| process_file(file, options))
            .collect()
    };

    RunSummary { outcomes }
}
