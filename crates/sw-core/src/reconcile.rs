//! Reconciliation of on-disk migrations with the changelog.
//!
//! Produces the single ordered view every runner operation walks. Ordering is
//! always by numeric id, never by scan order or applied time.

use crate::migration::Migration;
use crate::migration_id::MigrationId;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Sort order of the reconciled sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Lowest id first
    #[default]
    Ascending,
    /// Highest id first
    Descending,
}

impl SortOrder {
    fn compare(self, a: MigrationId, b: MigrationId) -> Ordering {
        match self {
            SortOrder::Ascending => a.cmp(&b),
            SortOrder::Descending => b.cmp(&a),
        }
    }
}

/// Merge disk and changelog records into one sequence sorted by id.
///
/// When both sides hold the same id the changelog record wins: it carries the
/// real applied timestamp and `applied = true`.
pub fn reconcile(
    disk: BTreeMap<MigrationId, Migration>,
    applied: BTreeMap<MigrationId, Migration>,
    order: SortOrder,
) -> Vec<Migration> {
    let mut merged = disk;
    for (id, migration) in applied {
        merged.insert(id, migration);
    }

    let mut migrations: Vec<Migration> = merged.into_values().collect();
    migrations.sort_by(|a, b| order.compare(a.id, b.id));
    migrations
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
