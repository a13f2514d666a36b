//! Health report command.

use anyhow::Result;
use edge_advisor::HealthStatus;

use super::ReportArgs;
use crate::context::Context;
use crate::output::badge;

/// Run the report command.
pub fn run(_args: ReportArgs, ctx: &Context) -> Result<()> {
    let advisor = ctx.advisor()?;
    let report = advisor.health_report()?;

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    ctx.output.header(&report.label);
    ctx.output.kv("test", &report.test);
    ctx.output.kv(
        "status",
        match report.status {
            HealthStatus::Good => "good",
            HealthStatus::Recommended => "recommended",
        },
    );
    ctx.output
        .kv("badge", &badge(&report.badge.label, report.badge.color));
    for line in report.description.lines() {
        ctx.output.info(line);
    }

    Ok(())
}
