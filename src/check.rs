//! Hint-spacing lint
//!
//! Flags `WITH (NOLOCK)` hints that run straight into the next token, e.g.
//! `FROM t WITH (NOLOCK)WHERE x = 1`, which usually means a string literal
//! fragment was concatenated without a separating space.

use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::files::{discover_files, read_source, source::resolve_encoding};
use crate::ScanOptions;

static NOLOCK_HINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\sWITH \(NOLOCK\)").unwrap());

/// A hint immediately followed by something other than a separator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpacingIssue {
    /// 1-based line number
    pub line: usize,
    /// 1-based character column of `WITH`
    pub column: usize,
    /// The offending line, trimmed
    pub snippet: String,
}

/// Issues found in one file
#[derive(Debug, Clone)]
pub struct FileIssues {
    pub path: PathBuf,
    pub issues: Vec<SpacingIssue>,
}

#[derive(Debug, Clone, Default)]
pub struct CheckSummary {
    pub files_scanned: usize,
    pub files: Vec<FileIssues>,
    /// Files that could not be read, with the error chain
    pub failed: Vec<(PathBuf, String)>,
}

impl CheckSummary {
    pub fn issue_count(&self) -> usize {
        self.files.iter().map(|f| f.issues.len()).sum()
    }

    pub fn has_issues(&self) -> bool {
        self.issue_count() > 0
    }
}

fn is_allowed_follower(c: char) -> bool {
    c.is_whitespace() || matches!(c, '"' | '\'' | ',' | ')' | ';')
}

/// Find every badly spaced `WITH (NOLOCK)` in `text`.
pub fn check_text(text: &str) -> Vec<SpacingIssue> {
    NOLOCK_HINT_RE
        .find_iter(text)
        .filter(|m| {
            text[m.end()..]
                .chars()
                .next()
                .map_or(false, |c| !is_allowed_follower(c))
        })
        .map(|m| {
            // Skip the leading whitespace character matched by \s
            let with_start = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
            let line_start = text[..with_start].rfind('\n').map_or(0, |i| i + 1);
            let line_end = text[with_start..]
                .find('\n')
                .map_or(text.len(), |i| with_start + i);
            SpacingIssue {
                line: text[..with_start].matches('\n').count() + 1,
                column: text[line_start..with_start].chars().count() + 1,
                snippet: text[line_start..line_end].trim().to_string(),
            }
        })
        .collect()
}

/// Run the lint over every discovered file.
///
/// Unreadable files are logged and listed in the summary.
pub fn check_files(options: &ScanOptions) -> Result<CheckSummary> {
    let encoding = resolve_encoding(&options.encoding)?;
    let files = discover_files(options)?;
    tracing::info!("Checking {} file(s) in {}", files.len(), options.dir.display());

    let mut summary = CheckSummary {
        files_scanned: files.len(),
        ..Default::default()
    };

    for path in files {
        match read_source(&path, encoding) {
            Ok(source) => {
                let issues = check_text(&source.text);
                if !issues.is_empty() {
                    summary.files.push(FileIssues { path, issues });
                }
            }
            Err(err) => {
                let err = anyhow::Error::new(err);
                tracing::warn!("Skipping {}: {:#}", path.display(), err);
                summary.failed.push((path, format!("{:#}", err)));
            }
        }
    }

    Ok(summary)
}
