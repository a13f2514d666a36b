//! Legacy migration command.

use anyhow::Result;
use edge_advisor::MigrationOutcome;

use super::MigrateArgs;
use crate::context::Context;

/// Run the migrate command.
pub fn run(_args: MigrateArgs, ctx: &Context) -> Result<()> {
    let advisor = ctx.advisor()?;
    let outcome = advisor.migrate_if_needed()?;

    if ctx.output.is_json() {
        ctx.output.json(&outcome);
        return Ok(());
    }

    report_outcome(ctx, &advisor, outcome);
    Ok(())
}

/// Describe a migration outcome to the operator.
pub fn report_outcome(ctx: &Context, advisor: &edge_advisor::MaxAgeAdvisor, outcome: MigrationOutcome) {
    match outcome {
        MigrationOutcome::AlreadyMigrated => ctx.output.info("Migration already ran"),
        MigrationOutcome::NothingSaved => {
            ctx.output.info("No max-age saved yet; migration will run after the first save")
        }
        MigrationOutcome::Kept { max_age } => ctx.output.info(&format!(
            "Saved max-age of {} kept",
            advisor.humanized(max_age)
        )),
        MigrationOutcome::Upgraded { from, to } => ctx.output.success(&format!(
            "Max-age upgraded from {} to {}",
            advisor.humanized(from),
            advisor.humanized(to)
        )),
    }
}
