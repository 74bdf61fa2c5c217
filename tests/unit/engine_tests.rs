//! SQL engine behaviour tests

use pretty_assertions::assert_eq;
use sql_nolock::rewrite_sql;

fn fix(sql: &str) -> String {
    rewrite_sql(sql).text
}

// ============================================================================
// Hint insertion
// ============================================================================

#[test]
fn test_insert_without_alias() {
    assert_eq!(
        fix("SELECT * FROM dbo.Table WHERE 1=1"),
        "SELECT * FROM dbo.Table WITH (NOLOCK) WHERE 1=1"
    );
}

#[test]
fn test_insert_after_alias() {
    assert_eq!(
        fix("SELECT * FROM dbo.Table t WHERE 1=1"),
        "SELECT * FROM dbo.Table t WITH (NOLOCK) WHERE 1=1"
    );
}

#[test]
fn test_bracketed_path_with_as_alias() {
    assert_eq!(
        fix("SELECT * FROM [dbo].[My Table] AS mt"),
        "SELECT * FROM [dbo].[My Table] AS mt WITH (NOLOCK)"
    );
}

#[test]
fn test_double_quoted_identifiers() {
    assert_eq!(
        fix(r#"SELECT * FROM "dbo"."Table-Name" t"#),
        r#"SELECT * FROM "dbo"."Table-Name" t WITH (NOLOCK)"#
    );
}

#[test]
fn test_quoted_alias() {
    assert_eq!(
        fix("SELECT * FROM Sales.Orders [o] JOIN Lines \"l\" ON 1=1"),
        "SELECT * FROM Sales.Orders [o] WITH (NOLOCK) JOIN Lines \"l\" WITH (NOLOCK) ON 1=1"
    );
}

#[test]
fn test_alias_variants_on_joins() {
    assert_eq!(
        fix("SELECT * FROM dbo.A a INNER JOIN dbo.B b1 ON a.id=b.id"),
        "SELECT * FROM dbo.A a WITH (NOLOCK) INNER JOIN dbo.B b1 WITH (NOLOCK) ON a.id=b.id"
    );
    assert_eq!(
        fix("SELECT * FROM dbo.A a INNER JOIN TABELA AS A ON a.id=b.id"),
        "SELECT * FROM dbo.A a WITH (NOLOCK) INNER JOIN TABELA AS A WITH (NOLOCK) ON a.id=b.id"
    );
    assert_eq!(
        fix("SELECT * FROM dbo.A a INNER JOIN TABELA A1 ON a.id=b.id"),
        "SELECT * FROM dbo.A a WITH (NOLOCK) INNER JOIN TABELA A1 WITH (NOLOCK) ON a.id=b.id"
    );
}

#[test]
fn test_cross_and_outer_joins() {
    assert_eq!(
        fix("SELECT * FROM dbo.A a CROSS JOIN dbo.B b"),
        "SELECT * FROM dbo.A a WITH (NOLOCK) CROSS JOIN dbo.B b WITH (NOLOCK)"
    );
    assert_eq!(
        fix("SELECT * FROM a LEFT OUTER JOIN b ON a.id = b.id"),
        "SELECT * FROM a WITH (NOLOCK) LEFT OUTER JOIN b WITH (NOLOCK) ON a.id = b.id"
    );
}

// ============================================================================
// Existing hint clauses
// ============================================================================

#[test]
fn test_merge_into_clause_before_alias() {
    let result = rewrite_sql("SELECT * FROM dbo.Table WITH (INDEX(1)) t");
    assert_eq!(result.text, "SELECT * FROM dbo.Table t WITH (INDEX(1), NOLOCK)");
    assert_eq!(result.tables_changed, 1);
}

#[test]
fn test_merge_into_clause_after_alias() {
    assert_eq!(
        fix("SELECT * FROM dbo.Table t WITH (HOLDLOCK)"),
        "SELECT * FROM dbo.Table t WITH (HOLDLOCK, NOLOCK)"
    );
}

#[test]
fn test_existing_nolock_is_noop() {
    for sql in [
        "SELECT * FROM dbo.Table WITH (NOLOCK) t",
        "SELECT * FROM dbo.Table t WITH (NOLOCK)",
        "SELECT * FROM dbo.Table t with (readpast, nolock)",
    ] {
        let result = rewrite_sql(sql);
        assert_eq!(result.text, sql);
        assert_eq!(result.tables_changed, 0);
        assert_eq!(result.statements_changed, 0);
    }
}

// ============================================================================
// Skipped sources and statements
// ============================================================================

#[test]
fn test_derived_table_and_function_untouched() {
    for sql in [
        "SELECT * FROM (SELECT 1 AS x) d",
        "SELECT * FROM dbo.Fn(1) f",
        "SELECT * FROM @rows r",
    ] {
        let result = rewrite_sql(sql);
        assert_eq!(result.text, sql);
        assert!(!result.is_changed());
    }
}

#[test]
fn test_dml_statements_untouched() {
    for sql in [
        "DELETE FROM dbo.Table WHERE id=1",
        "UPDATE t SET col=1 FROM dbo.Table t WHERE id=1",
        "INSERT INTO dbo.Archive SELECT * FROM dbo.Live",
        "Hello, this is not SQL at all",
        "",
    ] {
        assert_eq!(fix(sql), sql);
    }
}

#[test]
fn test_select_followed_by_delete_without_separator() {
    let input = "\
SELECT A.id_FI_ADESAO
FROM FI_ADESAO A
INNER JOIN OPERADORA_RECARGA R ON R.id_OPERADORA_RECARGA = A.id_OPERADORA_RECARGA
WHERE A.cancelada_FI_ADESAO = 0
  AND A.id_OPERADORA_CHIP IN (
      SELECT id_OPERADORA_CHIP
      FROM FI_ADESAO A1
      INNER JOIN OPERADORA_RECARGA R1 ON R1.id_OPERADORA_RECARGA = A1.id_OPERADORA_RECARGA
      WHERE A1.cancelada_FI_ADESAO = 0
)
DELETE FROM FI_ADESAO WHERE id_FI_ADESAO IN (
  SELECT A.id_FI_ADESAO
  FROM FI_ADESAO A
  INNER JOIN OPERADORA_RECARGA R ON R.id_OPERADORA_RECARGA = A.id_OPERADORA_RECARGA
)";
    let expected = "\
SELECT A.id_FI_ADESAO
FROM FI_ADESAO A WITH (NOLOCK)
INNER JOIN OPERADORA_RECARGA R WITH (NOLOCK) ON R.id_OPERADORA_RECARGA = A.id_OPERADORA_RECARGA
WHERE A.cancelada_FI_ADESAO = 0
  AND A.id_OPERADORA_CHIP IN (
      SELECT id_OPERADORA_CHIP
      FROM FI_ADESAO A1 WITH (NOLOCK)
      INNER JOIN OPERADORA_RECARGA R1 WITH (NOLOCK) ON R1.id_OPERADORA_RECARGA = A1.id_OPERADORA_RECARGA
      WHERE A1.cancelada_FI_ADESAO = 0
)
DELETE FROM FI_ADESAO WHERE id_FI_ADESAO IN (
  SELECT A.id_FI_ADESAO
  FROM FI_ADESAO A
  INNER JOIN OPERADORA_RECARGA R ON R.id_OPERADORA_RECARGA = A.id_OPERADORA_RECARGA
)";

    let result = rewrite_sql(input);
    assert_eq!(result.text, expected);
    assert_eq!(result.tables_changed, 4);
    assert_eq!(result.statements_changed, 1);
}

#[test]
fn test_comments_and_literals_are_opaque() {
    let sql = "SELECT '/* FROM x */' AS a /* FROM y */ FROM t -- JOIN z\nWHERE n = 'JOIN w'";
    assert_eq!(
        fix(sql),
        "SELECT '/* FROM x */' AS a /* FROM y */ FROM t WITH (NOLOCK) -- JOIN z\nWHERE n = 'JOIN w'"
    );
}

#[test]
fn test_line_endings_preserved() {
    assert_eq!(
        fix("SELECT *\r\nFROM t\r\nWHERE 1=1\r\n"),
        "SELECT *\r\nFROM t WITH (NOLOCK)\r\nWHERE 1=1\r\n"
    );
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_idempotence() {
    let inputs = [
        "SELECT * FROM dbo.Table WHERE 1=1",
        "SELECT * FROM dbo.Table WITH (INDEX(1)) t",
        "SELECT * FROM dbo.Table t WITH ()",
        "SELECT * FROM a, b x, (SELECT 1 AS n FROM c) d WHERE 1=1; DELETE FROM e",
        "SELECT * FROM a WHERE id IN (SELECT id FROM b WHERE x IN (SELECT y FROM c))",
        "SELECT * FROM [Order Details] od JOIN \"Products\" AS p ON p.Id = od.ProductId",
        "SELECT TRIM(' ' FROM name) FROM t",
    ];
    for input in inputs {
        let once = fix(input);
        assert_eq!(fix(&once), once, "not idempotent for: {}", input);
    }
}

#[test]
fn test_empty_hint_clause_gains_nolock_without_comma() {
    assert_eq!(
        fix("SELECT * FROM dbo.Table t WITH ()"),
        "SELECT * FROM dbo.Table t WITH (NOLOCK)"
    );
}

// ============================================================================
// Irregular table references
// ============================================================================

#[test]
fn test_relocated_hint_keeps_glued_alias_separate() {
    assert_eq!(
        fix("SELECT * FROM dbo.T WITH (INDEX(1))t WHERE 1=1"),
        "SELECT * FROM dbo.T t WITH (INDEX(1), NOLOCK) WHERE 1=1"
    );
}

#[test]
fn test_parenthesized_hint_after_alias() {
    let sql = "SELECT * FROM Orders o (NOLOCK) JOIN Lines l (NOLOCK) ON l.OrderId = o.Id";
    assert_eq!(fix(sql), sql);
    assert_eq!(rewrite_sql(sql).tables_changed, 0);

    assert_eq!(
        fix("SELECT * FROM Orders o (INDEX(IX_Date)) WHERE 1=1"),
        "SELECT * FROM Orders o (INDEX(IX_Date), NOLOCK) WHERE 1=1"
    );
}

#[test]
fn test_spaced_object_path() {
    assert_eq!(
        fix("SELECT * FROM [dbo] . [Orders] o WHERE 1=1"),
        "SELECT * FROM [dbo] . [Orders] o WITH (NOLOCK) WHERE 1=1"
    );
    assert_eq!(
        fix("SELECT * FROM dbo\n  .Orders"),
        "SELECT * FROM dbo\n  .Orders WITH (NOLOCK)"
    );
}

#[test]
fn test_parenthesized_join_tree() {
    let result = rewrite_sql("SELECT * FROM (Orders o JOIN Lines l ON l.OrderId = o.Id) LEFT JOIN Items i ON i.Id = l.ItemId");
    assert_eq!(
        result.text,
        "SELECT * FROM (Orders o WITH (NOLOCK) JOIN Lines l WITH (NOLOCK) ON l.OrderId = o.Id) LEFT JOIN Items i WITH (NOLOCK) ON i.Id = l.ItemId"
    );
    assert_eq!(result.tables_changed, 3);
    assert_eq!(result.statements_changed, 1);
}
