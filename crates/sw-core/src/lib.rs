//! sw-core - Core library for Stepwise
//!
//! This crate provides the migration record model, the filename grammar,
//! on-disk migration discovery, reconciliation against the changelog, new
//! migration scaffolding, and `stepwise.yml` configuration parsing. It has no
//! database access of its own.

pub mod config;
pub mod error;
pub mod generate;
pub mod migration;
pub mod migration_id;
pub mod reconcile;
pub mod source;

pub use config::{Config, DatabaseConfig, DbType};
pub use error::{CoreError, CoreResult};
pub use generate::{generate_migration, GeneratedMigration};
pub use migration::{split_body, Direction, Migration, MigrationBody, UNDO_MARKER};
pub use migration_id::MigrationId;
pub use reconcile::{reconcile, SortOrder};
pub use source::discover_migrations;
