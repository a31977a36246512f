//! Error types for sw-runner

use sw_core::{CoreError, MigrationId};
use sw_db::DbError;
use thiserror::Error;

/// Errors that stop a runner operation before any migration executes.
///
/// A migration failing mid-batch is not one of these; it is reported through
/// [`RunReport`](crate::RunReport).
#[derive(Error, Debug)]
pub enum RunnerError {
    /// R001: Requested id is neither on disk nor in the changelog
    #[error("[R001] Migration {id} not found")]
    NotFound { id: MigrationId },

    /// R002: Force-apply of a migration that is already applied
    #[error("[R002] Migration {id} already applied")]
    AlreadyApplied { id: MigrationId },

    /// R003: Force-revert of a migration that is not applied
    #[error("[R003] Migration {id} is not applied")]
    NotApplied { id: MigrationId },

    /// Migration source could not be scanned
    #[error(transparent)]
    Source(#[from] CoreError),

    /// Changelog could not be read or created
    #[error(transparent)]
    Database(#[from] DbError),
}

impl RunnerError {
    /// Returns `true` for the not-found / wrong-state checks that run before
    /// the database is touched.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            RunnerError::NotFound { .. }
                | RunnerError::AlreadyApplied { .. }
                | RunnerError::NotApplied { .. }
        )
    }
}

/// Result type alias for RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;
