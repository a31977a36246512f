//! Shared fixtures for runner and executor tests

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use sw_core::MigrationId;
use sw_db::{
    ChangelogRow, DatabaseChangelog, DatabaseCore, DatabaseTransaction, DbResult, DuckDbBackend,
};
use tempfile::TempDir;

pub const TABLE: &str = "__db_changelog";

/// In-memory DuckDB that records every call made through the traits.
pub struct RecordingDb {
    inner: DuckDbBackend,
    calls: Mutex<Vec<String>>,
}

impl RecordingDb {
    pub fn new() -> Self {
        Self {
            inner: DuckDbBackend::in_memory().unwrap(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The wrapped backend, for setup and assertions that should not be recorded
    pub fn inner(&self) -> &DuckDbBackend {
        &self.inner
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Calls that could change database state
    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("load_changelog"))
            .collect()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl DatabaseCore for RecordingDb {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.record(format!("execute_batch {}", sql.trim()));
        self.inner.execute_batch(sql).await
    }
}

#[async_trait]
impl DatabaseTransaction for RecordingDb {
    async fn begin(&self) -> DbResult<()> {
        self.record("begin");
        self.inner.begin().await
    }

    async fn commit(&self) -> DbResult<()> {
        self.record("commit");
        self.inner.commit().await
    }

    async fn rollback(&self) -> DbResult<()> {
        self.record("rollback");
        self.inner.rollback().await
    }
}

#[async_trait]
impl DatabaseChangelog for RecordingDb {
    async fn create_changelog(&self, table: &str) -> DbResult<()> {
        self.record(format!("create_changelog {table}"));
        self.inner.create_changelog(table).await
    }

    async fn load_changelog(&self, table: &str) -> DbResult<Vec<ChangelogRow>> {
        self.record(format!("load_changelog {table}"));
        self.inner.load_changelog(table).await
    }

    async fn insert_changelog_row(&self, table: &str, row: &ChangelogRow) -> DbResult<()> {
        self.record(format!("insert_changelog_row {}", row.id));
        self.inner.insert_changelog_row(table, row).await
    }

    async fn delete_changelog_row(&self, table: &str, id: MigrationId) -> DbResult<()> {
        self.record(format!("delete_changelog_row {id}"));
        self.inner.delete_changelog_row(table, id).await
    }
}

/// Temporary project with an empty `migrations/` directory.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("migrations")).unwrap();
        Self { dir }
    }

    pub fn migrations_dir(&self) -> PathBuf {
        self.dir.path().join("migrations")
    }

    pub fn write(&self, filename: &str, contents: &str) -> PathBuf {
        let path = self.migrations_dir().join(filename);
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn remove(&self, filename: &str) {
        std::fs::remove_file(self.migrations_dir().join(filename)).unwrap();
    }
}

pub fn id(n: u64) -> MigrationId {
    MigrationId::new(n).unwrap()
}

/// Ids currently recorded in the changelog, ascending.
pub async fn changelog_ids(db: &DuckDbBackend) -> Vec<u64> {
    db.load_changelog(TABLE)
        .await
        .unwrap()
        .iter()
        .map(|row| row.id.get())
        .collect()
}

/// Whether `name` resolves to a table, checked with a zero-row select.
pub async fn table_exists(db: &DuckDbBackend, name: &str) -> bool {
    db.execute_batch(&format!("SELECT * FROM {name} LIMIT 0"))
        .await
        .is_ok()
}
