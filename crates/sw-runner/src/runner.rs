//! Batch orchestration over the reconciled migration sequence

use crate::changelog::read_applied;
use crate::error::{RunnerError, RunnerResult};
use crate::executor::{Executor, StepFailure, StepSuccess};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use sw_core::{discover_migrations, reconcile, Direction, Migration, MigrationId, SortOrder};
use sw_db::Database;

/// Immutable settings for one runner
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Directory holding the migration files
    pub migrations_dir: PathBuf,

    /// Changelog table name, optionally schema-qualified
    pub changelog_table: String,

    /// Include executed SQL in step messages
    pub verbose: bool,
}

/// How a batch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Every eligible migration ran
    Completed,
    /// A migration failed and the rest were left untouched
    StoppedOnError,
}

/// Whether the report came from a sequential walk or a forced single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Batch,
    Force,
}

/// Outcome of an up/down run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Direction of every step in the run
    pub direction: Direction,

    /// Sequential walk or single forced step
    pub mode: RunMode,

    /// Steps that committed, in execution order
    pub completed: Vec<StepSuccess>,

    /// The step that stopped the run, if any
    pub failure: Option<StepFailure>,

    /// Wall time of the whole run
    pub duration: Duration,

    /// Append executed SQL to each step message when rendering
    pub verbose: bool,
}

impl RunReport {
    fn new(direction: Direction, mode: RunMode, verbose: bool) -> Self {
        Self {
            direction,
            mode,
            completed: Vec::new(),
            failure: None,
            duration: Duration::ZERO,
            verbose,
        }
    }

    /// Final state of the batch
    pub fn state(&self) -> BatchState {
        if self.failure.is_some() {
            BatchState::StoppedOnError
        } else {
            BatchState::Completed
        }
    }

    /// Check if no step failed
    pub fn is_success(&self) -> bool {
        self.state() == BatchState::Completed
    }

    /// Number of steps that committed
    pub fn count(&self) -> usize {
        self.completed.len()
    }

    /// `Applied N migrations` or `Reverted N migrations`
    pub fn summary(&self) -> String {
        let verb = match self.direction {
            Direction::Up => "Applied",
            Direction::Down => "Reverted",
        };
        format!("{verb} {} migrations", self.count())
    }

    /// Full operator report: one message per step, the failure if any, and
    /// for batch runs the summary line.
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self
            .completed
            .iter()
            .map(|s| s.message(self.verbose))
            .collect();
        if let Some(failure) = &self.failure {
            lines.push(failure.to_string());
        }
        if self.mode == RunMode::Batch {
            lines.push(self.summary());
        }
        lines.join("\n")
    }
}

/// Drives migrations against one database connection
pub struct Runner<'a> {
    db: &'a dyn Database,
    options: RunnerOptions,
}

impl<'a> Runner<'a> {
    /// Create a new runner
    pub fn new(db: &'a dyn Database, options: RunnerOptions) -> Self {
        Self { db, options }
    }

    fn executor(&self) -> Executor<'_> {
        Executor::new(self.db, &self.options.changelog_table)
    }

    fn report(&self, direction: Direction, mode: RunMode) -> RunReport {
        RunReport::new(direction, mode, self.options.verbose)
    }

    /// Create the changelog table if it does not exist
    pub async fn init(&self) -> RunnerResult<()> {
        self.db
            .create_changelog(&self.options.changelog_table)
            .await?;
        log::info!("Changelog table {} ready", self.options.changelog_table);
        Ok(())
    }

    /// Scan the directory, read the changelog, and merge them in `order`.
    pub async fn migrations(&self, order: SortOrder) -> RunnerResult<Vec<Migration>> {
        let dir = &self.options.migrations_dir;
        let disk = discover_migrations(dir)?;
        let applied = read_applied(self.db, &self.options.changelog_table, dir).await?;
        log::debug!(
            "Reconciling {} files with {} changelog rows",
            disk.len(),
            applied.len()
        );
        Ok(reconcile(disk, applied, order))
    }

    /// Reconciled view in ascending id order. Read-only.
    pub async fn status(&self) -> RunnerResult<Vec<Migration>> {
        self.migrations(SortOrder::Ascending).await
    }

    /// Apply pending migrations in ascending order, stopping after `target`.
    pub async fn up(&self, target: Option<MigrationId>) -> RunnerResult<RunReport> {
        let start = Instant::now();
        let migrations = self.migrations(SortOrder::Ascending).await?;
        check_target(&migrations, target)?;

        let executor = self.executor();
        let mut report = self.report(Direction::Up, RunMode::Batch);
        for migration in &migrations {
            if !migration.applied {
                match executor.apply(migration).await {
                    Ok(step) => report.completed.push(step),
                    Err(failure) => {
                        report.failure = Some(failure);
                        break;
                    }
                }
            }
            if Some(migration.id) == target {
                break;
            }
        }

        report.duration = start.elapsed();
        log::info!("{} in {:?}", report.summary(), report.duration);
        Ok(report)
    }

    /// Revert applied migrations in descending order.
    ///
    /// Without a target exactly one migration, the highest applied id, is
    /// reverted. With a target, reverting continues until the target itself
    /// has been reverted.
    pub async fn down(&self, target: Option<MigrationId>) -> RunnerResult<RunReport> {
        let start = Instant::now();
        let migrations = self.migrations(SortOrder::Descending).await?;
        check_target(&migrations, target)?;

        let executor = self.executor();
        let mut report = self.report(Direction::Down, RunMode::Batch);
        for migration in &migrations {
            if migration.applied {
                match executor.revert(migration).await {
                    Ok(step) => report.completed.push(step),
                    Err(failure) => {
                        report.failure = Some(failure);
                        break;
                    }
                }
                if target.is_none() {
                    break;
                }
            }
            if Some(migration.id) == target {
                break;
            }
        }

        report.duration = start.elapsed();
        log::info!("{} in {:?}", report.summary(), report.duration);
        Ok(report)
    }

    /// Apply exactly one migration regardless of order.
    ///
    /// Fails without touching the database when `id` is unknown or already
    /// applied. Applying out of order breaks the linear history; use with care.
    pub async fn up_force(&self, id: MigrationId) -> RunnerResult<RunReport> {
        let migration = self.find(id).await?;
        if migration.applied {
            return Err(RunnerError::AlreadyApplied { id });
        }
        log::warn!("Force-applying {} out of sequence", migration.filename());
        Ok(self.forced(Direction::Up, &migration).await)
    }

    /// Revert exactly one migration regardless of order.
    ///
    /// Fails without touching the database when `id` is unknown or not
    /// applied.
    pub async fn down_force(&self, id: MigrationId) -> RunnerResult<RunReport> {
        let migration = self.find(id).await?;
        if !migration.applied {
            return Err(RunnerError::NotApplied { id });
        }
        log::warn!("Force-reverting {} out of sequence", migration.filename());
        Ok(self.forced(Direction::Down, &migration).await)
    }

    async fn find(&self, id: MigrationId) -> RunnerResult<Migration> {
        self.migrations(SortOrder::Ascending)
            .await?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or(RunnerError::NotFound { id })
    }

    async fn forced(&self, direction: Direction, migration: &Migration) -> RunReport {
        let start = Instant::now();
        let executor = self.executor();
        let result = match direction {
            Direction::Up => executor.apply(migration).await,
            Direction::Down => executor.revert(migration).await,
        };

        let mut report = self.report(direction, RunMode::Force);
        match result {
            Ok(step) => report.completed.push(step),
            Err(failure) => report.failure = Some(failure),
        }
        report.duration = start.elapsed();
        report
    }
}

fn check_target(migrations: &[Migration], target: Option<MigrationId>) -> RunnerResult<()> {
    match target {
        Some(id) if !migrations.iter().any(|m| m.id == id) => Err(RunnerError::NotFound { id }),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
