//! Down command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, StepArgs};
use crate::commands::common::print_run;
use crate::context::RuntimeContext;

/// Execute the down command
///
/// Without an id only the highest applied migration is reverted.
pub(crate) async fn execute(args: &StepArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let runner = ctx.runner();

    let result = match (args.force, args.id) {
        (true, Some(id)) => runner.down_force(id).await,
        (true, None) => anyhow::bail!("--force requires a migration id"),
        (false, target) => runner.down(target).await,
    };

    print_run(result)
}
