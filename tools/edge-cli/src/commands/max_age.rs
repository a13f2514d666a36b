//! Set-max-age command.

use anyhow::Result;
use serde_json::json;

use super::migrate::report_outcome;
use super::SetMaxAgeArgs;
use crate::context::Context;

/// Run the set-max-age command.
pub fn run(args: SetMaxAgeArgs, ctx: &Context) -> Result<()> {
    let advisor = ctx.advisor()?;
    let outcome = advisor.update_max_age(args.seconds)?;
    let rank = advisor.current_rank();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "max_age": advisor.current_max_age()?,
            "rank": rank,
            "migration": outcome,
        }));
        return Ok(());
    }

    ctx.output.success(&format!(
        "Max-age set to {} ({} seconds)",
        advisor.humanized(args.seconds),
        args.seconds
    ));
    if let Some(outcome) = outcome {
        report_outcome(ctx, &advisor, outcome);
    }
    ctx.output.kv("rank", &rank.to_string());

    Ok(())
}
