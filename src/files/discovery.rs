//! Source file discovery

use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::{DirEntry, WalkDir};

use crate::error::NolockError;
use crate::ScanOptions;

/// Directories that never contain hand-written sources
const IGNORED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "dist",
    "build",
    "bin",
    "obj",
    ".vs",
    ".vscode",
    ".idea",
];

/// Normalize a user-supplied extension to lowercase with a leading dot.
///
/// Returns `None` for blank input.
pub fn normalize_extension(ext: &str) -> Option<String> {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!(".{}", trimmed.to_lowercase()))
    }
}

/// Case-insensitive suffix match, so multi-dot extensions such as `.aspx.vb` work.
pub fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    extensions
        .iter()
        .any(|ext| name.len() > ext.len() && name.ends_with(ext.as_str()))
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map_or(false, |name| IGNORED_DIRS.contains(&name))
}

/// Compile exclude globs, failing on the first invalid pattern.
pub fn compile_excludes(patterns: &[String]) -> Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            glob::Pattern::new(pattern).map_err(|source| {
                NolockError::InvalidExcludePattern {
                    pattern: pattern.clone(),
                    source,
                }
                .into()
            })
        })
        .collect()
}

/// Find every file under the base directory that should be processed.
///
/// Results are sorted so runs are deterministic. Unreadable directories are
/// logged and skipped.
pub fn discover_files(options: &ScanOptions) -> Result<Vec<PathBuf>> {
    if !options.dir.is_dir() {
        return Err(NolockError::DirectoryNotFound {
            path: options.dir.clone(),
        }
        .into());
    }

    let extensions: Vec<String> = options
        .extensions
        .iter()
        .filter_map(|ext| normalize_extension(ext))
        .collect();
    let excludes = compile_excludes(&options.exclude)?;

    let mut walker = WalkDir::new(&options.dir);
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker.into_iter().filter_entry(|e| !is_ignored_dir(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() || !matches_extension(entry.path(), &extensions) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(&options.dir)
            .unwrap_or(entry.path());
        if excludes.iter().any(|pattern| pattern.matches_path(relative)) {
            tracing::debug!("Excluded: {}", relative.display());
            continue;
        }

        files.push(entry.into_path());
    }

    files.sort();
    Ok(files)
}
