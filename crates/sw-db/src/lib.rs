//! sw-db - Database abstraction layer for Stepwise
//!
//! This crate provides the `Database` traits the migration runner drives
//! (SQL execution, transactions, changelog persistence) and their DuckDB
//! implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{ChangelogRow, Database, DatabaseChangelog, DatabaseCore, DatabaseTransaction};
