//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{ChangelogRow, DatabaseChangelog, DatabaseCore, DatabaseTransaction};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use sw_core::config::is_valid_table_name;
use sw_core::migration::TIMESTAMP_FORMAT;
use sw_core::MigrationId;

/// DuckDB database backend
///
/// Holds a single connection; every call runs to completion before the next
/// one starts.
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Run a transaction control statement
    fn transaction_sync(&self, statement: &str) -> DbResult<()> {
        let conn = self.lock()?;
        log::debug!("{statement}");
        conn.execute_batch(statement)
            .map_err(|e| DbError::TransactionError(format!("{statement} failed: {e}")))
    }
}

/// Reject changelog table names that would need quoting.
fn checked_table(table: &str) -> DbResult<&str> {
    if is_valid_table_name(table) {
        Ok(table)
    } else {
        Err(DbError::ChangelogError(format!(
            "invalid changelog table name '{table}'"
        )))
    }
}

/// Convert a raw `(id, filename, description, applied_at)` tuple into a row.
fn changelog_row(
    (id, filename, description, applied_at): (i64, String, String, String),
) -> DbResult<ChangelogRow> {
    let id = MigrationId::try_from(id)
        .map_err(|e| DbError::ChangelogError(e.to_string()))?;
    let applied_at = NaiveDateTime::parse_from_str(&applied_at, TIMESTAMP_FORMAT).map_err(|e| {
        DbError::ChangelogError(format!(
            "invalid applied_at '{applied_at}' for migration {id}: {e}"
        ))
    })?;
    Ok(ChangelogRow {
        id,
        filename,
        description,
        applied_at,
    })
}

#[async_trait]
impl DatabaseCore for DuckDbBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }
}

#[async_trait]
impl DatabaseTransaction for DuckDbBackend {
    async fn begin(&self) -> DbResult<()> {
        self.transaction_sync("BEGIN TRANSACTION")
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_sync("COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_sync("ROLLBACK")
    }
}

#[async_trait]
impl DatabaseChangelog for DuckDbBackend {
    async fn create_changelog(&self, table: &str) -> DbResult<()> {
        let table = checked_table(table)?;
        let mut sql = String::new();
        if let Some((schema, _)) = table.split_once('.') {
            sql.push_str(&format!("CREATE SCHEMA IF NOT EXISTS {schema};\n"));
        }
        sql.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                 id          BIGINT PRIMARY KEY,
                 filename    VARCHAR NOT NULL,
                 description VARCHAR NOT NULL,
                 applied_at  TIMESTAMP NOT NULL
             );"
        ));

        let conn = self.lock()?;
        conn.execute_batch(&sql).map_err(|e| {
            DbError::ChangelogError(format!("failed to create changelog table {table}: {e}"))
        })
    }

    async fn load_changelog(&self, table: &str) -> DbResult<Vec<ChangelogRow>> {
        let table = checked_table(table)?;
        let sql = format!(
            "SELECT id, filename, description, strftime(applied_at, '{TIMESTAMP_FORMAT}') \
             FROM {table} ORDER BY id ASC"
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let raw_rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw_rows.into_iter().map(changelog_row).collect()
    }

    async fn insert_changelog_row(&self, table: &str, row: &ChangelogRow) -> DbResult<()> {
        let table = checked_table(table)?;
        let sql = format!(
            "INSERT INTO {table} (id, filename, description, applied_at) \
             VALUES (?, ?, ?, CAST(? AS TIMESTAMP))"
        );
        let applied_at = row.applied_at.format(TIMESTAMP_FORMAT).to_string();

        let conn = self.lock()?;
        conn.execute(
            &sql,
            duckdb::params![
                i64::from(row.id),
                row.filename,
                row.description,
                applied_at
            ],
        )
        .map_err(|e| {
            DbError::ChangelogError(format!("failed to record migration {}: {e}", row.id))
        })?;
        Ok(())
    }

    async fn delete_changelog_row(&self, table: &str, id: MigrationId) -> DbResult<()> {
        let table = checked_table(table)?;
        let sql = format!("DELETE FROM {table} WHERE id = ?");

        let conn = self.lock()?;
        let deleted = conn
            .execute(&sql, duckdb::params![i64::from(id)])
            .map_err(|e| {
                DbError::ChangelogError(format!("failed to remove migration {id}: {e}"))
            })?;
        if deleted == 0 {
            log::warn!("No changelog row for migration {id} in {table}");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
