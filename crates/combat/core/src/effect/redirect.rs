//! Redirection: snatch, draw, cover and pass.
//!
//! At most one redirection fires per action. The claim is a flag in the
//! action-wide store so it survives the per-strike and per-target resets.
use tracing::debug;

use crate::action::{ActionContext, ActionError, Change, DataFlags};
use crate::env::{BattleEnv, LogMessage, msg};
use crate::ids::{ElementId, EntityId};
use crate::state::Redirected;
use crate::stats::{Category, Ratio};

fn claimable(ctx: &ActionContext) -> bool {
    !ctx.data.flags.contains(DataFlags::NO_REDIRECT)
        && ctx.explosion.radius == 0
        && !ctx.global.contains::<Redirected>()
}

fn claim(ctx: &mut ActionContext, env: &BattleEnv<'_>, to: EntityId, key: &str) {
    let from = ctx.target;
    ctx.global.set(Redirected);
    // Redirection only fires on single-target actions, so the new target
    // becomes the aim for every remaining strike.
    ctx.target = to;
    ctx.aim = to;
    ctx.record(Change::Redirected { from, to });
    debug!(%from, %to, key, "action redirected");
    ctx.log(
        env,
        LogMessage::new(key)
            .arg(env.name_of(to))
            .arg(env.name_of(from)),
    );
}

/// The carrier, a foe standing near the user, takes a status action the user
/// aimed at itself.
pub(super) fn snatch(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    carrier: EntityId,
) -> Result<(), ActionError> {
    if !claimable(ctx)
        || ctx.data.category != Category::Status
        || ctx.aim != ctx.user
        || carrier == ctx.user
    {
        return Ok(());
    }
    let roster = env.roster()?;
    let user = roster
        .character(ctx.user)
        .ok_or(ActionError::UserNotFound(ctx.user))?;
    let Some(thief) = roster.character(carrier) else {
        return Ok(());
    };
    if thief.is_ally(&user) || thief.is_knocked_out() {
        return Ok(());
    }

    claim(ctx, env, carrier, msg::SNATCH);
    Ok(())
}

/// The carrier pulls a single-target action of `element` aimed at someone
/// near it.
pub(super) fn draw(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    carrier: EntityId,
    element: &ElementId,
) -> Result<(), ActionError> {
    if !claimable(ctx)
        || ctx.data.category == Category::Status
        || ctx.data.element != *element
        || carrier == ctx.user
        || carrier == ctx.target
    {
        return Ok(());
    }
    let alive = env
        .roster()?
        .character(carrier)
        .is_some_and(|c| !c.is_knocked_out());
    if alive {
        claim(ctx, env, carrier, msg::DRAW);
    }
    Ok(())
}

/// The carrier takes the hit for an ally whose HP fraction is below
/// `threshold`.
pub(super) fn cover(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    carrier: EntityId,
    threshold: Ratio,
) -> Result<(), ActionError> {
    if !claimable(ctx) || carrier == ctx.user || carrier == ctx.target {
        return Ok(());
    }
    let roster = env.roster()?;
    let Some(protector) = roster.character(carrier) else {
        return Ok(());
    };
    let Some(ward) = roster.character(ctx.target) else {
        return Ok(());
    };
    if !protector.is_ally(&ward) || protector.is_knocked_out() {
        return Ok(());
    }

    // hp / max_hp < num / den
    let weak = i64::from(ward.hp) * i64::from(threshold.den)
        < i64::from(ward.max_hp) * i64::from(threshold.num);
    if weak {
        claim(ctx, env, carrier, msg::COVER);
    }
    Ok(())
}

/// The carrier, about to be hit, passes the hit to the lowest-id character
/// within `radius` other than itself and the user.
pub(super) fn pass(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    carrier: EntityId,
    radius: u32,
) -> Result<(), ActionError> {
    if !claimable(ctx) || carrier != ctx.target || carrier == ctx.user {
        return Ok(());
    }
    let map = env.map()?;
    let roster = env.roster()?;
    let Some(center) = map.position(carrier) else {
        return Ok(());
    };

    let receiver = map
        .characters_within(center, radius)
        .into_iter()
        .filter(|id| *id != carrier && *id != ctx.user)
        .find(|id| roster.character(*id).is_some_and(|c| !c.is_knocked_out()));

    if let Some(receiver) = receiver {
        claim(ctx, env, receiver, msg::PASS);
    }
    Ok(())
}
