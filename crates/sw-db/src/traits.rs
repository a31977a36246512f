//! Database trait definitions
//!
//! The migration engine needs three capabilities from a connection: running
//! arbitrary SQL batches, explicit transaction boundaries, and reading and
//! writing changelog rows. Each lives in its own trait; [`Database`] bundles
//! them.

use crate::error::DbResult;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sw_core::MigrationId;

/// One row of the changelog table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogRow {
    /// Migration id (primary key)
    pub id: MigrationId,
    /// Bare filename of the migration source
    pub filename: String,
    /// Human-readable description
    pub description: String,
    /// When the migration was applied, second precision
    pub applied_at: NaiveDateTime,
}

/// SQL execution
#[async_trait]
pub trait DatabaseCore: Send + Sync {
    /// Execute multiple SQL statements, stopping at the first failure
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;
}

/// Explicit transaction boundaries
///
/// `begin` suspends auto-commit until the matching `commit` or `rollback`,
/// either of which restores it.
#[async_trait]
pub trait DatabaseTransaction: Send + Sync {
    /// Open a transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Discard the open transaction
    async fn rollback(&self) -> DbResult<()>;
}

/// Changelog persistence
#[async_trait]
pub trait DatabaseChangelog: Send + Sync {
    /// Create the changelog table if it does not exist
    async fn create_changelog(&self, table: &str) -> DbResult<()>;

    /// Read every changelog row, ascending by id
    async fn load_changelog(&self, table: &str) -> DbResult<Vec<ChangelogRow>>;

    /// Record a migration as applied
    async fn insert_changelog_row(&self, table: &str, row: &ChangelogRow) -> DbResult<()>;

    /// Remove the record of an applied migration
    async fn delete_changelog_row(&self, table: &str, id: MigrationId) -> DbResult<()>;
}

/// Full database abstraction used by the migration runner
pub trait Database: DatabaseCore + DatabaseTransaction + DatabaseChangelog {}

impl<T: DatabaseCore + DatabaseTransaction + DatabaseChangelog> Database for T {}
