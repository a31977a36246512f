//! Transactional execution of a single migration.
//!
//! Each step runs the migration body and the changelog write in one
//! transaction: either both land or neither does.

use crate::changelog::row_for_migration;
use std::time::Instant;
use sw_core::migration::has_statements;
use sw_core::{Direction, Migration, MigrationId};
use sw_db::{Database, DbResult};
use thiserror::Error;

/// Separator printed between a step message and its SQL in verbose mode.
const VERBOSE_RULE_WIDTH: usize = 20;

/// A migration that was applied or reverted and committed.
#[derive(Debug, Clone)]
pub struct StepSuccess {
    /// Migration id
    pub id: MigrationId,

    /// Bare filename of the migration source
    pub filename: String,

    /// Direction the migration ran in
    pub direction: Direction,

    /// SQL body that was executed (possibly empty)
    pub sql: String,
}

impl StepSuccess {
    /// Operator-facing message, with the executed SQL appended when `verbose`.
    pub fn message(&self, verbose: bool) -> String {
        let mut out = format!("{} success {}", self.direction, self.filename);
        if verbose {
            out.push('\n');
            out.push_str(&"=".repeat(VERBOSE_RULE_WIDTH));
            out.push('\n');
            out.push_str(&self.sql);
        }
        out
    }
}

/// A migration whose transaction was rolled back.
///
/// The display form is self-contained: direction, filename, SQL, and the
/// driver's error text.
#[derive(Error, Debug, Clone)]
#[error("{} Migration failure {filename}\n{sql}\n{error}", .direction.label())]
pub struct StepFailure {
    /// Migration id
    pub id: MigrationId,

    /// Bare filename of the migration source
    pub filename: String,

    /// Direction the migration was run in
    pub direction: Direction,

    /// SQL body that was attempted (empty if the file could not be read)
    pub sql: String,

    /// Underlying error text
    pub error: String,
}

/// Outcome of applying or reverting one migration.
pub type StepResult = Result<StepSuccess, StepFailure>;

/// Runs single migrations against a database.
pub struct Executor<'a> {
    db: &'a dyn Database,
    changelog_table: &'a str,
}

impl<'a> Executor<'a> {
    /// Create a new executor writing to `changelog_table`
    pub fn new(db: &'a dyn Database, changelog_table: &'a str) -> Self {
        Self {
            db,
            changelog_table,
        }
    }

    /// Run the forward body and insert the changelog row.
    pub async fn apply(&self, migration: &Migration) -> StepResult {
        self.run(migration, Direction::Up).await
    }

    /// Run the reverse body and delete the changelog row.
    pub async fn revert(&self, migration: &Migration) -> StepResult {
        self.run(migration, Direction::Down).await
    }

    async fn run(&self, migration: &Migration, direction: Direction) -> StepResult {
        let start = Instant::now();
        let filename = migration.filename();
        let failure = |sql: &str, error: String| StepFailure {
            id: migration.id,
            filename: filename.clone(),
            direction,
            sql: sql.to_string(),
            error,
        };

        let body = migration
            .read_body()
            .map_err(|e| failure("", e.to_string()))?;
        let sql = body.sql(direction);

        self.db
            .begin()
            .await
            .map_err(|e| failure(sql, e.to_string()))?;

        if let Err(e) = self.run_in_transaction(migration, direction, sql).await {
            if let Err(rollback_err) = self.db.rollback().await {
                log::warn!("Rollback of {filename} failed: {rollback_err}");
            }
            log::warn!("{} of {filename} rolled back: {e}", direction.label());
            return Err(failure(sql, e.to_string()));
        }

        log::debug!(
            "{} {filename} committed in {:?}",
            direction.label(),
            start.elapsed()
        );
        Ok(StepSuccess {
            id: migration.id,
            filename,
            direction,
            sql: sql.to_string(),
        })
    }

    async fn run_in_transaction(
        &self,
        migration: &Migration,
        direction: Direction,
        sql: &str,
    ) -> DbResult<()> {
        if has_statements(sql) {
            self.db.execute_batch(sql).await?;
        } else {
            log::debug!(
                "{} body of {} is empty, recording only",
                direction,
                migration.filename()
            );
        }

        match direction {
            Direction::Up => {
                self.db
                    .insert_changelog_row(self.changelog_table, &row_for_migration(migration))
                    .await?
            }
            Direction::Down => {
                self.db
                    .delete_changelog_row(self.changelog_table, migration.id)
                    .await?
            }
        }

        self.db.commit().await
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
