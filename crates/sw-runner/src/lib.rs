//! sw-runner - Migration engine for Stepwise
//!
//! Reads the changelog, runs single migrations transactionally, and walks
//! the reconciled sequence for `up` / `down` batches.

pub mod changelog;
pub mod error;
pub mod executor;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{RunnerError, RunnerResult};
pub use executor::{Executor, StepFailure, StepResult, StepSuccess};
pub use runner::{BatchState, RunMode, RunReport, Runner, RunnerOptions};
