use tracing::warn;

use crate::action::{ActionContext, ActionError, Change};
use crate::env::{BattleEnv, LogMessage, msg};
use crate::ids::StatusId;

fn status_name(env: &BattleEnv<'_>, status: &StatusId) -> Result<String, ActionError> {
    let name = env.content()?.status(status).map(|s| s.name.clone());
    Ok(name.unwrap_or_else(|| {
        warn!(%status, "status missing from content");
        status.to_string()
    }))
}

pub(super) async fn apply(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    status: &StatusId,
    chance: Option<u32>,
) -> Result<(), ActionError> {
    let target = ctx.target;
    let roster = env.roster()?;
    if roster.character(target).is_none_or(|c| c.is_knocked_out()) {
        return Ok(());
    }
    if let Some(chance) = chance {
        if !ctx.chance(env, chance)? {
            return Ok(());
        }
    }
    if !roster.add_status(target, status.clone()).await {
        return Ok(());
    }

    ctx.record(Change::StatusAdded {
        target,
        status: status.clone(),
    });
    let message = LogMessage::new(msg::STATUS_ADDED)
        .arg(env.name_of(target))
        .arg(status_name(env, status)?);
    ctx.log(env, message);
    Ok(())
}

pub(super) async fn remove(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    status: &StatusId,
) -> Result<(), ActionError> {
    let target = ctx.target;
    if !env.roster()?.remove_status(target, status).await {
        return Ok(());
    }

    ctx.record(Change::StatusRemoved {
        target,
        status: status.clone(),
    });
    let message = LogMessage::new(msg::STATUS_REMOVED)
        .arg(env.name_of(target))
        .arg(status_name(env, status)?);
    ctx.log(env, message);
    Ok(())
}
