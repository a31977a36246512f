//! Changelog reader: materialises applied migrations from the changelog table.

use std::collections::BTreeMap;
use std::path::Path;
use sw_core::{Migration, MigrationId};
use sw_db::{ChangelogRow, Database, DbResult};

/// Build the applied record for a changelog row.
pub fn migration_from_row(row: ChangelogRow, migrations_dir: &Path) -> Migration {
    Migration::applied(
        row.id,
        migrations_dir.join(&row.filename),
        row.description,
        row.applied_at,
    )
}

/// Build the changelog row recorded when `migration` is applied.
pub fn row_for_migration(migration: &Migration) -> ChangelogRow {
    ChangelogRow {
        id: migration.id,
        filename: migration.filename(),
        description: migration.description.clone(),
        applied_at: migration.applied_at,
    }
}

/// Load every applied migration, keyed by id.
///
/// A missing changelog table surfaces as a database error; callers are
/// expected to have run `init` first.
pub async fn read_applied(
    db: &dyn Database,
    table: &str,
    migrations_dir: &Path,
) -> DbResult<BTreeMap<MigrationId, Migration>> {
    let rows = db.load_changelog(table).await?;
    log::debug!("Loaded {} changelog rows from {table}", rows.len());

    Ok(rows
        .into_iter()
        .map(|row| (row.id, migration_from_row(row, migrations_dir)))
        .collect())
}
