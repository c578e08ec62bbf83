use crate::action::{ActionContext, ActionError};
use crate::damage::{self, DamageSource};
use crate::env::BattleEnv;
use crate::state::{DamageHealedTarget, DamageMult};
use crate::stats::Ratio;

pub(super) async fn formula(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
) -> Result<(), ActionError> {
    let report = damage::calculate(ctx, env)?;
    damage::deliver(ctx, env, &report).await?;
    Ok(())
}

/// Applies a formula-free amount as the action's hit, honouring immunity.
async fn hit_for(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    amount: u32,
) -> Result<(), ActionError> {
    if ctx.state.is_neutralized::<DamageMult>() {
        return Ok(());
    }
    let target = ctx.target;
    damage::inflict(ctx, env, target, amount, DamageSource::Hit).await?;
    Ok(())
}

pub(super) async fn fixed(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    amount: u32,
) -> Result<(), ActionError> {
    hit_for(ctx, env, amount).await
}

pub(super) async fn level(ctx: &mut ActionContext, env: &BattleEnv<'_>) -> Result<(), ActionError> {
    let user = env
        .roster()?
        .character(ctx.user)
        .ok_or(ActionError::UserNotFound(ctx.user))?;
    hit_for(ctx, env, user.level).await
}

pub(super) async fn hp_fraction(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    fraction: Ratio,
) -> Result<(), ActionError> {
    let target = env
        .roster()?
        .character(ctx.target)
        .ok_or(ActionError::TargetNotFound(ctx.target))?;
    if target.is_knocked_out() {
        return Ok(());
    }
    hit_for(ctx, env, scaled_at_least_one(target.hp, fraction)).await
}

pub(super) async fn heal(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    fraction: Ratio,
) -> Result<(), ActionError> {
    let target = env
        .roster()?
        .character(ctx.target)
        .ok_or(ActionError::TargetNotFound(ctx.target))?;
    if target.is_knocked_out() {
        return Ok(());
    }
    let amount = scaled_at_least_one(target.max_hp, fraction);
    let healed = damage::restore(ctx, env, target.id, amount).await?;
    ctx.state
        .add::<DamageHealedTarget>(i32::try_from(healed).unwrap_or(i32::MAX));
    Ok(())
}

/// `fraction` of `value`, floored at 1.
pub(super) fn scaled_at_least_one(value: u32, fraction: Ratio) -> u32 {
    let scaled = fraction.apply(i64::from(value)).max(1);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}
