//! Embedded-SQL NOLOCK engine
//!
//! Pipeline for one SQL document:
//!
//! 1. [`mask::MaskedView`] blanks comments and quoted content, keeping offsets.
//! 2. [`segment::segment_statements`] finds top-level `SELECT` statements.
//! 3. [`hint::scan_table_source`] parses each `FROM`/`JOIN` source (object path,
//!    alias, hint clause) and [`hint::plan_reference`] turns it into edits.
//! 4. [`edit::apply_edits`] applies the collected edits to the original text.

pub mod alias;
pub mod edit;
pub mod hint;
pub mod mask;
pub mod object_path;
pub mod rewrite;
pub mod segment;

pub use edit::{apply_edits, Edit, EditSet};
pub use hint::{HintClause, TableRef, NOLOCK_CLAUSE};
pub use mask::MaskedView;
pub use rewrite::{rewrite_sql, SqlRewrite};
pub use segment::{segment_statements, StatementRange};
