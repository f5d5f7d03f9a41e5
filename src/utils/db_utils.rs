use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlConnection;

use crate::error::{Error, Result};

/// Rows per INSERT statement; keeps bind counts far below MySQL's 65535 placeholder cap.
pub const INSERT_CHUNK_ROWS: usize = 1000;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    I32(i32),
    Decimal(Decimal),
    DateTime(DateTime<Utc>),
}

/// ===============================
/// SQL insert container
/// ===============================
#[derive(Debug)]
pub struct SqlInsert {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build multi-row INSERT SQL
/// ===============================
pub fn build_bulk_insert(
    table: &str,
    columns: &[&str],
    rows: Vec<Vec<SqlValue>>,
) -> Result<SqlInsert> {
    if columns.is_empty() || rows.is_empty() {
        return Err(Error::Validation("No rows provided for insert".into()));
    }

    let placeholders = format!("({})", vec!["?"; columns.len()].join(", "));
    let mut values = Vec::with_capacity(columns.len() * rows.len());

    for (i, row) in rows.into_iter().enumerate() {
        if row.len() != columns.len() {
            return Err(Error::Validation(format!(
                "row {} has {} values, expected {}",
                i,
                row.len(),
                columns.len()
            )));
        }
        values.extend(row);
    }

    let row_count = values.len() / columns.len();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES {}",
        table,
        columns.join(", "),
        vec![placeholders.as_str(); row_count].join(", ")
    );

    Ok(SqlInsert { sql, values })
}

/// ===============================
/// Execute the insert
/// ===============================
pub async fn execute_insert(
    conn: &mut MySqlConnection,
    insert: SqlInsert,
) -> std::result::Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&insert.sql);

    for value in insert.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I32(v) => query.bind(v),
            SqlValue::Decimal(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
        };
    }

    let result = query.execute(conn).await?;
    Ok(result.rows_affected())
}
