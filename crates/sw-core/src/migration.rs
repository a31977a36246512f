//! Migration records, filename grammar, and SQL body splitting.
//!
//! A migration file is named `<zero-padded id>_<description>.sql` and holds a
//! single SQL text split by [`UNDO_MARKER`] into a forward (up) body and an
//! optional reverse (down) body.

use crate::error::{CoreError, CoreResult};
use crate::migration_id::MigrationId;
use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Literal token separating the forward body from the reverse body.
pub const UNDO_MARKER: &str = "@UNDO";

/// Format used when rendering and persisting applied timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Direction a migration is run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply the forward body and record the changelog row
    Up,
    /// Apply the reverse body and remove the changelog row
    Down,
}

impl Direction {
    /// Lowercase name (`up` / `down`)
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Uppercase label used in failure reports (`UP` / `DOWN`)
    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of parsing a migration filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    /// Numeric id from the prefix
    pub id: MigrationId,
    /// Remainder of the name with underscores turned into spaces
    pub description: String,
}

/// Parse a migration filename.
///
/// Grammar: `<digits> "_" <rest> ".sql"` where `<digits>` is a zero-padded
/// positive integer and `<rest>` is non-empty. The `.sql` suffix is matched
/// case-insensitively. Dotfiles and anything else return `Ok(None)`.
///
/// A name that follows the grammar but whose digits are not a usable id
/// (zero, or larger than [`MAX_MIGRATION_ID`](crate::migration_id::MAX_MIGRATION_ID))
/// is an error rather than a skip.
pub fn parse_filename(filename: &str) -> CoreResult<Option<ParsedFilename>> {
    if filename.starts_with('.') {
        return Ok(None);
    }
    let Some((prefix, rest)) = strip_sql_suffix(filename).and_then(|stem| stem.split_once('_'))
    else {
        return Ok(None);
    };
    if rest.is_empty() || prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    let id = MigrationId::parse(prefix).map_err(|_| CoreError::InvalidMigrationId {
        value: filename.to_string(),
    })?;

    Ok(Some(ParsedFilename {
        id,
        description: rest.replace('_', " ").trim().to_string(),
    }))
}

fn strip_sql_suffix(filename: &str) -> Option<&str> {
    let split = filename.len().checked_sub(".sql".len())?;
    let (stem, ext) = (filename.get(..split)?, filename.get(split..)?);
    ext.eq_ignore_ascii_case(".sql").then_some(stem)
}

/// Forward and reverse SQL of one migration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationBody {
    /// Text before the undo marker
    pub up: String,
    /// Text after the undo marker, empty when the marker is absent
    pub down: String,
}

impl MigrationBody {
    /// SQL to execute for the given direction.
    pub fn sql(&self, direction: Direction) -> &str {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }
}

/// Split file contents on the first [`UNDO_MARKER`].
pub fn split_body(contents: &str) -> MigrationBody {
    match contents.split_once(UNDO_MARKER) {
        Some((up, down)) => MigrationBody {
            up: up.to_string(),
            down: down.to_string(),
        },
        None => MigrationBody {
            up: contents.to_string(),
            down: String::new(),
        },
    }
}

/// Returns `true` if `sql` contains anything besides whitespace and `--` line comments.
pub fn has_statements(sql: &str) -> bool {
    sql.lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with("--"))
}

/// Current local time truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// One migration in either its on-disk or its changelog form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Migration {
    /// Numeric identity
    pub id: MigrationId,

    /// Path of the SQL source file
    pub sql_file: PathBuf,

    /// Human-readable label
    pub description: String,

    /// When the migration was applied. Only meaningful when `applied` is set;
    /// pending records carry their construction time, which becomes the
    /// recorded timestamp if they are applied.
    pub applied_at: NaiveDateTime,

    /// `true` only for records loaded from the changelog
    pub applied: bool,
}

impl Migration {
    /// Create a not-yet-applied record stamped with the current time.
    pub fn pending(id: MigrationId, sql_file: PathBuf, description: impl Into<String>) -> Self {
        Self {
            id,
            sql_file,
            description: description.into(),
            applied_at: now(),
            applied: false,
        }
    }

    /// Create a record for a row read from the changelog.
    pub fn applied(
        id: MigrationId,
        sql_file: PathBuf,
        description: impl Into<String>,
        applied_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            sql_file,
            description: description.into(),
            applied_at,
            applied: true,
        }
    }

    /// Build a pending record from a filename inside `dir`.
    ///
    /// Returns `Ok(None)` when the filename does not follow the migration
    /// grammar.
    pub fn from_filename(dir: &Path, filename: &str) -> CoreResult<Option<Self>> {
        Ok(parse_filename(filename)?.map(|parsed| {
            Self::pending(parsed.id, dir.join(filename), parsed.description)
        }))
    }

    /// Bare filename of the SQL source.
    pub fn filename(&self) -> String {
        self.sql_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.sql_file.display().to_string())
    }

    /// Read and split the SQL source.
    pub fn read_body(&self) -> CoreResult<MigrationBody> {
        let contents =
            std::fs::read_to_string(&self.sql_file).map_err(|e| CoreError::IoWithPath {
                path: self.sql_file.display().to_string(),
                source: e,
            })?;
        Ok(split_body(&contents))
    }

    /// Applied timestamp rendered with [`TIMESTAMP_FORMAT`].
    pub fn applied_at_display(&self) -> String {
        self.applied_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
