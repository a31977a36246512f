//! Migration source: scans the on-disk migrations directory.
//!
//! The directory is rescanned on every invocation; nothing is cached.

use crate::error::{CoreError, CoreResult};
use crate::migration::Migration;
use crate::migration_id::MigrationId;
use std::collections::BTreeMap;
use std::path::Path;

fn io_error(dir: &Path, source: std::io::Error) -> CoreError {
    CoreError::IoWithPath {
        path: dir.display().to_string(),
        source,
    }
}

/// List regular, non-hidden file names in `dir` in ascending lexical order.
pub fn list_migration_files(dir: &Path) -> CoreResult<Vec<String>> {
    if !dir.is_dir() {
        return Err(CoreError::MigrationDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_error(dir, e))? {
        let entry = entry.map_err(|e| io_error(dir, e))?;
        if entry.path().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(String::from) else {
            log::warn!(
                "Skipping migration file with non UTF-8 name: {}",
                entry.path().display()
            );
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Discover every migration in `dir`, keyed by id.
///
/// Files that do not follow the `<id>_<description>.sql` grammar are skipped.
/// A numeric prefix that is not a usable id, or two files resolving to the
/// same id, is an error.
pub fn discover_migrations(dir: &Path) -> CoreResult<BTreeMap<MigrationId, Migration>> {
    let mut migrations: BTreeMap<MigrationId, Migration> = BTreeMap::new();

    for filename in list_migration_files(dir)? {
        let Some(migration) = Migration::from_filename(dir, &filename)? else {
            log::debug!("Skipping non-migration file: {filename}");
            continue;
        };

        if let Some(existing) = migrations.get(&migration.id) {
            return Err(CoreError::DuplicateMigrationId {
                id: migration.id.to_string(),
                first: existing.filename(),
                second: filename,
            });
        }
        log::debug!("Found migration {}: {}", migration.id, migration.description);
        migrations.insert(migration.id, migration);
    }

    Ok(migrations)
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
