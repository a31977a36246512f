//! Scaffolding of new migration files.

use crate::error::{CoreError, CoreResult};
use crate::migration::UNDO_MARKER;
use crate::migration_id::{MigrationId, MAX_MIGRATION_ID};
use crate::source::discover_migrations;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A freshly written migration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMigration {
    /// Id assigned to the new migration
    pub id: MigrationId,
    /// Filename inside the migrations directory
    pub filename: String,
    /// Full path of the written file
    pub path: PathBuf,
}

/// Template body for a new migration.
///
/// The undo marker sits inside a SQL comment so the forward part is valid SQL
/// on its own, even before any reverse statements are written.
pub fn migration_template(id: MigrationId, name: &str) -> String {
    format!(
        "-- Migration {id}: {name}\n\
         -- Forward statements go above the undo marker.\n\
         \n\
         -- //{UNDO_MARKER}\n\
         -- Reverse statements go below the undo marker.\n"
    )
}

/// Build the filename for migration `id` named `name`.
pub fn migration_filename(id: MigrationId, name: &str) -> String {
    format!("{}_{}.sql", id, name.trim().replace(' ', "_"))
}

fn validate_name(name: &str) -> CoreResult<()> {
    let invalid = |reason: &str| CoreError::InvalidMigrationName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(invalid("name must not contain '/', '\\' or '..'"));
    }
    Ok(())
}

/// Id following the highest existing migration in `dir` (1 when there are none).
pub fn next_migration_id(dir: &Path) -> CoreResult<MigrationId> {
    let highest = if dir.is_dir() {
        discover_migrations(dir)?.into_keys().next_back()
    } else {
        None
    };

    let invalid = || CoreError::InvalidMigrationId {
        value: MAX_MIGRATION_ID.to_string(),
    };
    match highest {
        Some(id) => id.next().ok_or_else(invalid),
        None => MigrationId::new(1).ok_or_else(invalid),
    }
}

/// Write a new migration file for `name` into `dir`, creating `dir` if needed.
///
/// Never overwrites an existing file.
pub fn generate_migration(dir: &Path, name: &str) -> CoreResult<GeneratedMigration> {
    validate_name(name)?;

    std::fs::create_dir_all(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let id = next_migration_id(dir)?;
    let filename = migration_filename(id, name);
    let path = dir.join(&filename);

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => CoreError::MigrationFileExists {
                path: path.display().to_string(),
            },
            _ => CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            },
        })?;
    file.write_all(migration_template(id, name.trim()).as_bytes())
        .map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

    log::debug!("Generated migration {id} at {}", path.display());

    Ok(GeneratedMigration { id, filename, path })
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
