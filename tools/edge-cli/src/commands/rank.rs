//! Rank command.

use anyhow::Result;
use edge_cache::MaxAgePolicy;
use serde::Serialize;

use super::RankArgs;
use crate::context::Context;
use crate::output::{cache_badge, rank_gauge};

#[derive(Serialize)]
struct RankView {
    rank: u8,
    cache: edge_cache::CacheStatus,
    current: u64,
    recommended: u64,
    cache_control: String,
}

/// Run the rank command.
pub fn run(args: RankArgs, ctx: &Context) -> Result<()> {
    let advisor = ctx.advisor()?;

    if args.fresh {
        advisor.invalidate_rank()?;
        ctx.output.debug("Dropped memoized rank");
    }

    let lookup = advisor.rank_lookup();
    let current = advisor.current_max_age()?;
    let recommended = advisor.recommended_max_age();

    let view = RankView {
        rank: lookup.rank.value(),
        cache: lookup.status,
        current,
        recommended,
        cache_control: MaxAgePolicy::cache_control_header(current),
    };

    if ctx.output.is_json() {
        ctx.output.json(&view);
        return Ok(());
    }

    ctx.output.header("Max-age rank");
    ctx.output.kv(
        "rank",
        &format!("{} {}", view.rank, rank_gauge(view.rank)),
    );
    ctx.output.kv("cache", &cache_badge(view.cache));
    ctx.output.kv(
        "current",
        &format!("{} ({} seconds)", advisor.humanized(current), current),
    );
    ctx.output.kv(
        "recommended",
        &format!("{} ({} seconds)", advisor.humanized(recommended), recommended),
    );
    ctx.output.kv("cache-control", &view.cache_control);

    if lookup.rank.is_optimal() {
        ctx.output.success("Max-age meets the recommendation");
    } else if lookup.rank.is_very_low() {
        ctx.output.warn("Max-age is very low");
    }

    Ok(())
}
