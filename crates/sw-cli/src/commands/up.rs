//! Up command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, StepArgs};
use crate::commands::common::print_run;
use crate::context::RuntimeContext;

/// Execute the up command
pub(crate) async fn execute(args: &StepArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let runner = ctx.runner();

    let result = match (args.force, args.id) {
        (true, Some(id)) => runner.up_force(id).await,
        (true, None) => anyhow::bail!("--force requires a migration id"),
        (false, target) => runner.up(target).await,
    };

    print_run(result)
}
