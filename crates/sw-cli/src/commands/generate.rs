//! Generate command implementation - scaffolds the next migration file

use anyhow::{Context, Result};
use sw_core::generate_migration;

use crate::cli::{GenerateArgs, GlobalArgs};
use crate::context::load_config;

/// Execute the generate command
///
/// Needs only the configuration, never a database connection.
pub(crate) async fn execute(args: &GenerateArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(&global.project_dir)?;
    let dir = config.migrations_path_absolute(&global.project_dir);
    let name = args.name.join(" ");

    let generated = generate_migration(&dir, &name)
        .with_context(|| format!("Failed to generate migration '{name}'"))?;

    println!(
        "Generated migration {} to file {}",
        generated.id, generated.filename
    );
    Ok(())
}
