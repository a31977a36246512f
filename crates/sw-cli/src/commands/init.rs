//! Init command implementation - creates the changelog table

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the init command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    ctx.runner().init().await.with_context(|| {
        format!(
            "Failed to create changelog table {}",
            ctx.options.changelog_table
        )
    })?;

    log::info!("Initialised project {}", ctx.config.name);
    println!("Initial structure created");
    Ok(())
}
