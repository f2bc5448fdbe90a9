// statement store facade - connection, introspection, and query execution
// deliberately a pass-through: nothing here validates or rewrites sql,
// callers go through the query gate first

use crate::Error;
use serde::Serialize;
use sqlx::{AnyPool, Column, Row, any::AnyPoolOptions};
use std::sync::Once;

static INSTALL_DRIVERS: Once = Once::new();

pub struct Store {
    pool: AnyPool,
    dialect: Dialect,
}

/// One financial record as the store keeps it.
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub id: i64,
    /// ISO-8601 date text, exactly as stored.
    pub date: String,
    pub description: String,
    pub amount: f64,
    /// `credit` or `debit`.
    pub entry_type: String,
}

/// Aggregate counters over the whole statements table.
#[derive(Debug, Clone, Serialize)]
pub struct StatementStatistics {
    pub statements_count: i64,
    pub total_credits: f64,
    pub total_debits: f64,
}

/// Result of an arbitrary read query.
#[derive(Debug, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub row_count: usize,
}

/// One row of schema introspection output.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub table: String,
    pub column: String,
    pub data_type: String,
}

enum Dialect {
    Postgres,
    Sqlite,
    Mysql,
}

impl Store {
    pub async fn connect(url: &str) -> Result<Self, Error> {
        // once per process, tests open many stores
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

        let dialect = detect_dialect(url);

        let pool = AnyPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;

        Ok(Self { pool, dialect })
    }

    /// Table and column listing for whatever database we are pointed at.
    pub async fn schema(&self) -> Result<Vec<ColumnInfo>, Error> {
        match self.dialect {
            Dialect::Postgres => self.postgres_schema().await,
            Dialect::Sqlite => self.sqlite_schema().await,
            Dialect::Mysql => self.mysql_schema().await,
        }
    }

    async fn postgres_schema(&self) -> Result<Vec<ColumnInfo>, Error> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            r#"SELECT table_name::text, column_name::text, data_type::text
               FROM information_schema.columns
               WHERE table_schema = 'public'
               ORDER BY table_name, ordinal_position"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(into_columns(rows))
    }

    async fn sqlite_schema(&self) -> Result<Vec<ColumnInfo>, Error> {
        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut rows = Vec::new();
        for (table,) in tables {
            let query = format!("PRAGMA table_info(\"{}\")", table);
            let cols: Vec<(i32, String, String, i32, Option<String>, i32)> =
                sqlx::query_as(&query).fetch_all(&self.pool).await?;

            for (_, name, dtype, _, _, _) in cols {
                rows.push((table.clone(), name, dtype));
            }
        }

        Ok(into_columns(rows))
    }

    async fn mysql_schema(&self) -> Result<Vec<ColumnInfo>, Error> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            r#"SELECT table_name, column_name, data_type
               FROM information_schema.columns
               WHERE table_schema = DATABASE()
               ORDER BY table_name, ordinal_position"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(into_columns(rows))
    }

    /// Run a query string verbatim and return the rows as json values.
    ///
    /// No gating happens here. Anything that reaches this method is executed
    /// as-is, so callers must have passed the string through
    /// [`Validation::check`](crate::Validation::check) first.
    pub async fn execute(&self, sql: &str) -> Result<QueryResult, Error> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;

        if rows.is_empty() {
            return Ok(QueryResult {
                columns: vec![],
                rows: vec![],
                row_count: 0,
            });
        }

        let columns: Vec<String> = rows[0]
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let json_rows: Vec<Vec<serde_json::Value>> = rows
            .iter()
            .map(|row| {
                (0..columns.len())
                    .map(|i| row_value_to_json(row, i))
                    .collect()
            })
            .collect();

        let row_count = json_rows.len();

        Ok(QueryResult {
            columns,
            rows: json_rows,
            row_count,
        })
    }

    /// Count and credit/debit totals across the statements table.
    pub async fn statistics(&self) -> Result<StatementStatistics, Error> {
        let (statements_count, total_credits, total_debits): (i64, f64, f64) = sqlx::query_as(
            r#"SELECT
                 COUNT(*),
                 COALESCE(SUM(CASE WHEN entry_type = 'credit' THEN amount ELSE 0.0 END), 0.0),
                 COALESCE(SUM(CASE WHEN entry_type = 'debit' THEN amount ELSE 0.0 END), 0.0)
               FROM statements"#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StatementStatistics {
            statements_count,
            total_credits,
            total_debits,
        })
    }

    /// Up to `limit` statements in the store's default order, oldest first.
    pub async fn statements(&self, limit: i64) -> Result<Vec<Statement>, Error> {
        // limit comes from our own code, never from user input, so it is
        // formatted in directly rather than bound (placeholder syntax
        // differs across the three dialects)
        let sql = format!(
            "SELECT id, date, description, amount, entry_type
             FROM statements ORDER BY date LIMIT {limit}"
        );

        let rows: Vec<(i64, String, String, f64, String)> =
            sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|(id, date, description, amount, entry_type)| Statement {
                id,
                date,
                description,
                amount,
                entry_type,
            })
            .collect())
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

// figure out dialect from connection string
fn detect_dialect(url: &str) -> Dialect {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Dialect::Postgres
    } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
        Dialect::Mysql
    } else {
        Dialect::Sqlite
    }
}

fn into_columns(rows: Vec<(String, String, String)>) -> Vec<ColumnInfo> {
    rows.into_iter()
        .map(|(table, column, data_type)| ColumnInfo {
            table,
            column,
            data_type,
        })
        .collect()
}

// convert database values to json, trying types in order of how common
// they are. some driver-specific types just don't decode through Any.
fn row_value_to_json(row: &sqlx::any::AnyRow, index: usize) -> serde_json::Value {
    use sqlx::ValueRef;

    if row.try_get_raw(index).map(|v| v.is_null()).unwrap_or(true) {
        return serde_json::Value::Null;
    }

    if let Ok(v) = row.try_get::<String, _>(index) {
        return serde_json::Value::String(v);
    }
    if let Ok(v) = row.try_get::<i64, _>(index) {
        return serde_json::Value::Number(v.into());
    }
    if let Ok(v) = row.try_get::<i32, _>(index) {
        return serde_json::Value::Number(v.into());
    }
    if let Ok(v) = row.try_get::<f64, _>(index) {
        return serde_json::Number::from_f64(v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null);
    }
    if let Ok(v) = row.try_get::<bool, _>(index) {
        return serde_json::Value::Bool(v);
    }

    serde_json::Value::String("<unsupported>".to_string())
}
