//! Tests for the hint-spacing lint over a directory

use sql_nolock::{apply_nolock, check_files};

use crate::common::{relative, TestContext};

#[test]
fn test_check_reports_glued_hints() {
    let ctx = TestContext::new();
    ctx.write(
        "bad.vb",
        "sql = \"SELECT * FROM t WITH (NOLOCK)\" & _\r\n      \"SELECT * FROM u WITH (NOLOCK)WHERE 1=1\"\r\n",
    );
    ctx.write("good.vb", "sql = \"SELECT * FROM t WITH (NOLOCK) WHERE 1=1\"");

    let summary = check_files(&ctx.scan_options()).unwrap();

    assert_eq!(summary.files_scanned, 2);
    assert!(summary.has_issues());
    assert_eq!(summary.issue_count(), 1);
    assert_eq!(relative(&ctx.root, &summary.files[0].path), "bad.vb");

    let issue = &summary.files[0].issues[0];
    assert_eq!(issue.line, 2);
    assert_eq!(issue.column, 24);
}

#[test]
fn test_check_passes_after_apply() {
    let ctx = TestContext::new();
    ctx.write(
        "page.aspx",
        "q = \"SELECT * FROM a JOIN b ON a.id = b.id WHERE 1=1\"\nr = \"SELECT x FROM c;\"",
    );

    apply_nolock(&ctx.apply_options()).unwrap();
    let summary = check_files(&ctx.scan_options()).unwrap();

    assert!(!summary.has_issues());
    assert!(summary.failed.is_empty());
}

#[test]
fn test_check_records_unreadable_files() {
    let ctx = TestContext::new();
    ctx.write("utf16.vb", b"\xFE\xFF\x00q");

    let summary = check_files(&ctx.scan_options()).unwrap();

    assert!(!summary.has_issues());
    assert_eq!(summary.failed.len(), 1);
}
