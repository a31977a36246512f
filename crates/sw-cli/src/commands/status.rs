//! Status command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use sw_core::Migration;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::context::RuntimeContext;

/// Shortest description column the rule is sized for
const MIN_DESCRIPTION_WIDTH: usize = 11;

/// Width of the id and applied-at columns together
const FIXED_COLUMNS_WIDTH: usize = 27;

/// Width of the applied-at column including its trailing padding
const APPLIED_AT_WIDTH: usize = 21;

const PENDING: &str = "pending...";

/// One migration in JSON output
#[derive(Debug, Serialize)]
struct StatusRow<'a> {
    id: u64,
    filename: String,
    description: &'a str,
    applied: bool,
    applied_at: Option<String>,
}

impl<'a> From<&'a Migration> for StatusRow<'a> {
    fn from(m: &'a Migration) -> Self {
        Self {
            id: m.id.get(),
            filename: m.filename(),
            description: &m.description,
            applied: m.applied,
            applied_at: m.applied.then(|| m.applied_at_display()),
        }
    }
}

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let migrations = ctx
        .runner()
        .status()
        .await
        .context("Failed to read migration status")?;

    match args.output {
        StatusOutput::Table => print!("{}", render_table(&migrations)),
        StatusOutput::Json => {
            let rows: Vec<StatusRow> = migrations.iter().map(StatusRow::from).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

/// Fixed-width status table, one line per migration.
pub(crate) fn render_table(migrations: &[Migration]) -> String {
    let width = migrations
        .iter()
        .map(|m| m.description.len())
        .fold(MIN_DESCRIPTION_WIDTH, usize::max);

    let mut out = String::from("ID   Applied At           Description\n");
    out.push_str(&"=".repeat(FIXED_COLUMNS_WIDTH + width));
    out.push('\n');

    for m in migrations {
        let applied_at = if m.applied {
            m.applied_at_display()
        } else {
            PENDING.to_string()
        };
        out.push_str(&format!(
            "{}  {:<w$}{}\n",
            m.id,
            applied_at,
            m.description,
            w = APPLIED_AT_WIDTH
        ));
    }
    out
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
