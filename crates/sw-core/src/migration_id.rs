//! Strongly-typed migration id wrapper.

use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Width of the zero-padded display form (`7` renders as `007`).
pub const ID_DISPLAY_WIDTH: usize = 3;

/// Largest id that fits the changelog's `BIGINT` column.
pub const MAX_MIGRATION_ID: u64 = i64::MAX as u64;

/// Numeric identity of a migration.
///
/// Parsed from the zero-padded prefix of a migration filename. Leading zeros
/// are insignificant for comparison (`007` and `7` are the same id) but the
/// display form is always padded to [`ID_DISPLAY_WIDTH`] digits.
///
/// Always in `1..=MAX_MIGRATION_ID`, so timestamp-style prefixes such as
/// `20240101120000` are valid ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MigrationId(u64);

impl MigrationId {
    /// Create a new id, returning `None` for zero or values above
    /// [`MAX_MIGRATION_ID`].
    pub fn new(id: u64) -> Option<Self> {
        (1..=MAX_MIGRATION_ID).contains(&id).then_some(Self(id))
    }

    /// Parse an id from a string of ASCII digits, ignoring leading zeros.
    pub fn parse(value: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidMigrationId {
            value: value.to_string(),
        };

        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let trimmed = value.trim_start_matches('0');
        if trimmed.is_empty() {
            return Err(invalid());
        }

        trimmed
            .parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(invalid)
    }

    /// Return the raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// The id immediately after this one.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).and_then(Self::new)
    }
}

impl fmt::Display for MigrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = ID_DISPLAY_WIDTH)
    }
}

impl FromStr for MigrationId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<i64> for MigrationId {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| CoreError::InvalidMigrationId {
                value: value.to_string(),
            })
    }
}

impl From<MigrationId> for i64 {
    fn from(id: MigrationId) -> Self {
        // Ids never exceed MAX_MIGRATION_ID, which is i64::MAX.
        id.0 as i64
    }
}

#[cfg(test)]
#[path = "migration_id_test.rs"]
mod tests;
