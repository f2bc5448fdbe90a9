// tests for the statement store facade
// each test gets its own throwaway sqlite file

use finql::{Error, Store};
use tempfile::TempDir;

async fn empty_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("statements.db").display());
    let store = Store::connect(&url).await.expect("connect");

    sqlx::query(
        "CREATE TABLE statements (
             id INTEGER PRIMARY KEY,
             date TEXT NOT NULL,
             description TEXT NOT NULL,
             amount REAL NOT NULL,
             entry_type TEXT NOT NULL
         )",
    )
    .execute(store.pool())
    .await
    .expect("create table");

    (dir, store)
}

async fn seeded_store() -> (TempDir, Store) {
    let (dir, store) = empty_store().await;

    sqlx::query(
        "INSERT INTO statements (date, description, amount, entry_type) VALUES
             ('2024-03-15', 'salary', 2500.0, 'credit'),
             ('2024-01-02', 'rent', 900.0, 'debit'),
             ('2024-02-20', 'refund', 40.0, 'credit')",
    )
    .execute(store.pool())
    .await
    .expect("seed rows");

    (dir, store)
}

#[tokio::test]
async fn test_schema_lists_statements_table() {
    let (_dir, store) = empty_store().await;
    let columns = store.schema().await.unwrap();

    let statement_cols: Vec<&str> = columns
        .iter()
        .filter(|c| c.table == "statements")
        .map(|c| c.column.as_str())
        .collect();

    assert_eq!(
        statement_cols,
        ["id", "date", "description", "amount", "entry_type"]
    );
}

#[tokio::test]
async fn test_execute_select() {
    let (_dir, store) = seeded_store().await;
    let result = store
        .execute("SELECT id, description FROM statements")
        .await
        .unwrap();

    assert_eq!(result.columns, ["id", "description"]);
    assert_eq!(result.row_count, 3);
}

#[tokio::test]
async fn test_execute_empty_result() {
    let (_dir, store) = seeded_store().await;
    let result = store
        .execute("SELECT * FROM statements WHERE id = -999")
        .await
        .unwrap();

    assert_eq!(result.row_count, 0);
    assert!(result.rows.is_empty());
    assert!(result.columns.is_empty());
}

#[tokio::test]
async fn test_execute_runs_verbatim() {
    // the facade does not gate anything; a string the validator would
    // reject still reaches the engine and fails there instead
    let (_dir, store) = seeded_store().await;
    let err = store
        .execute("SELECT * FROM no_such_table")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn test_statistics_totals() {
    let (_dir, store) = seeded_store().await;
    let stats = store.statistics().await.unwrap();

    assert_eq!(stats.statements_count, 3);
    assert_eq!(stats.total_credits, 2540.0);
    assert_eq!(stats.total_debits, 900.0);
}

#[tokio::test]
async fn test_statistics_on_empty_table() {
    let (_dir, store) = empty_store().await;
    let stats = store.statistics().await.unwrap();

    assert_eq!(stats.statements_count, 0);
    assert_eq!(stats.total_credits, 0.0);
    assert_eq!(stats.total_debits, 0.0);
}

#[tokio::test]
async fn test_statements_ordered_by_date() {
    let (_dir, store) = seeded_store().await;
    let statements = store.statements(2).await.unwrap();

    let dates: Vec<&str> = statements.iter().map(|s| s.date.as_str()).collect();
    assert_eq!(dates, ["2024-01-02", "2024-02-20"]);
}

#[tokio::test]
async fn test_statements_limit_one() {
    let (_dir, store) = seeded_store().await;
    let statements = store.statements(1).await.unwrap();

    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].description, "rent");
    assert_eq!(statements[0].amount, 900.0);
    assert_eq!(statements[0].entry_type, "debit");
}
