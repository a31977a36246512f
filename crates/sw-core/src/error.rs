//! Error types for sw-core

use thiserror::Error;

/// Core error type for Stepwise
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {0}")]
    ConfigParseError(#[from] serde_yaml::Error),

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Migrations directory not found
    #[error("[E004] Migrations directory not found: {path}. Run `stepwise generate <name>` to create it")]
    MigrationDirNotFound { path: String },

    /// E005: Two migration files share the same numeric id
    #[error("[E005] Duplicate migration id {id}: '{first}' and '{second}'")]
    DuplicateMigrationId {
        id: String,
        first: String,
        second: String,
    },

    /// E006: Invalid migration id
    #[error("[E006] Invalid migration id '{value}': expected a positive integer no larger than 9223372036854775807")]
    InvalidMigrationId { value: String },

    /// E007: Invalid migration name passed to `generate`
    #[error("[E007] Invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    /// E008: Generated migration file already exists
    #[error("[E008] Migration file already exists: {path}")]
    MigrationFileExists { path: String },

    /// E009: IO error with file path context
    #[error("[E009] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
