//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use sw_core::MigrationId;

/// Stepwise - numbered SQL migrations with a transactional changelog
#[derive(Parser, Debug)]
#[command(name = "stepwise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Print the executed SQL of every migration
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory (holds stepwise.yml)
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Named target from stepwise.yml
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Override the database path
    #[arg(short, long, global = true)]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every migration and whether it has been applied
    Status(StatusArgs),

    /// Create the changelog table
    Init,

    /// Create a new migration file with the next free id
    Generate(GenerateArgs),

    /// Apply pending migrations up to and including ID
    Up(StepArgs),

    /// Revert the latest migration, or every migration down to and including ID
    Down(StepArgs),
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Fixed-width table
    Table,
    /// JSON array
    Json,
}

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Migration name; multiple words are joined with underscores
    #[arg(required = true, num_args = 1..)]
    pub name: Vec<String>,
}

/// Arguments for the up and down commands
#[derive(Args, Debug)]
pub struct StepArgs {
    /// Run only the migration ID, ignoring order (not recommended)
    #[arg(short, long, requires = "id")]
    pub force: bool,

    /// Target migration id
    pub id: Option<MigrationId>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
