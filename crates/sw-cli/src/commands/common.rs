//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use sw_runner::{RunReport, RunnerResult};

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally empty: ExitCode is a control-flow mechanism, not a
        // user-facing error. If anyhow's Display chain ever reaches this
        // (e.g. downcast_ref fails in main.rs), we don't want "exit code N"
        // leaking into stderr.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Print the outcome of an up/down run.
///
/// A failed step or an unmet force precondition is reported and turned into
/// exit code 1. Source and database errors propagate with context.
pub(crate) fn print_run(result: RunnerResult<RunReport>) -> Result<()> {
    match result {
        Ok(report) => {
            println!("{}", report.render());
            if report.is_success() {
                Ok(())
            } else {
                Err(ExitCode(1).into())
            }
        }
        Err(err) if err.is_precondition() => {
            eprintln!("{err}");
            Err(ExitCode(1).into())
        }
        Err(err) => Err(err).context("Migration run aborted"),
    }
}
