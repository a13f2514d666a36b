//! Reset-flag command.
//!
//! The advisor only ever sets once-only notice flags; clearing one starts a
//! new notice episode for that user.

use anyhow::Result;
use edge_core::{SettingsStore, UserId};

use super::ResetFlagArgs;
use crate::context::Context;

/// Run the reset-flag command.
pub fn run(args: ResetFlagArgs, ctx: &Context) -> Result<()> {
    let store = ctx.state();
    let user = UserId(args.user);

    let mut cleared = Vec::new();
    for notice in args.flag.notices() {
        store.set_user_flag(user, notice.flag_key(), false)?;
        cleared.push(notice.flag_key());
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "user": user, "cleared": cleared }));
        return Ok(());
    }

    for key in cleared {
        ctx.output.success(&format!("Cleared {} for user {}", key, user));
    }

    Ok(())
}
