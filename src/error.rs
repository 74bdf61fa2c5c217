//! Error types for sql-nolock

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning and rewriting source files
///
/// The SQL engine itself never fails; every variant here belongs to the
/// file layer or to option validation.
#[derive(Error, Debug)]
pub enum NolockError {
    #[error("Base directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Unknown text encoding: {label}")]
    UnknownEncoding { label: String },

    #[error("Text encoding {label} cannot be written back")]
    UnsupportedEncoding { label: String },

    #[error("Invalid exclude pattern: {pattern}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to read source file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write source file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write backup file: {path}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File {path} contains characters that are invalid in {encoding}")]
    Decode { path: PathBuf, encoding: String },

    #[error("Rewritten text for {path} cannot be represented in {encoding}")]
    Encode { path: PathBuf, encoding: String },

    #[error("Rewriting {path} aborted unexpectedly")]
    EngineFault { path: PathBuf },

    #[error("Unsupported byte-order mark ({encoding}) in {path}")]
    UnsupportedBom { path: PathBuf, encoding: String },
}
