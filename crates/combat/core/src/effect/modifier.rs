use crate::action::{ActionContext, ActionError};
use crate::damage;
use crate::env::{BattleEnv, LogMessage, msg};
use crate::ids::{ElementId, EntityId, MapStatusId};
use crate::state::{
    AbsorbedElement, CritBoost, CrossCategory, DamageHealedTarget, DamageMult, HitAndRun,
    PreciseCrit, add_stage_boost,
};
use crate::stats::{Category, Ratio, Stat};

use super::damage::scaled_at_least_one;

pub(super) fn multiply(ctx: &mut ActionContext, factor: Ratio) {
    ctx.state.multiply::<DamageMult>(factor.num, factor.den);
}

pub(super) fn element(ctx: &mut ActionContext, element: &ElementId, factor: Ratio) {
    if ctx.data.element == *element {
        multiply(ctx, factor);
    }
}

pub(super) fn weather(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    weather: &MapStatusId,
    element: &ElementId,
    factor: Ratio,
) -> Result<(), ActionError> {
    if ctx.data.element == *element && env.map()?.has_map_status(weather) {
        multiply(ctx, factor);
    }
    Ok(())
}

pub(super) fn boost_stage(ctx: &mut ActionContext, env: &BattleEnv<'_>, stat: Stat, stages: i32) {
    if stages == 0 {
        return;
    }
    add_stage_boost(&mut ctx.state, stat, stages);

    let holder = match stat {
        Stat::Attack | Stat::MagicAttack | Stat::Accuracy | Stat::Speed => ctx.user,
        Stat::Defense | Stat::MagicDefense | Stat::Evasion => ctx.target,
    };
    let message = LogMessage::new(msg::STAT_BOOST)
        .arg(env.name_of(holder))
        .arg(stat)
        .arg(stages);
    ctx.log(env, message);
}

pub(super) fn boost_crit(ctx: &mut ActionContext, stages: i32) {
    ctx.state.add::<CritBoost>(stages);
}

pub(super) fn cross_category(ctx: &mut ActionContext) {
    ctx.state.set(CrossCategory);
}

pub(super) fn precise_crit(ctx: &mut ActionContext) {
    ctx.state.set(PreciseCrit);
}

pub(super) fn hit_and_run(ctx: &mut ActionContext) {
    ctx.state.set(HitAndRun);
}

/// Neutralizes damage of `element` aimed at the carrier.
///
/// The formula then short-circuits without rolling, so the feedback message
/// is printed here.
pub(super) async fn immune_to_element(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    carrier: EntityId,
    element: &ElementId,
    absorb: Option<Ratio>,
) -> Result<(), ActionError> {
    if carrier != ctx.target
        || ctx.data.category == Category::Status
        || ctx.data.element != *element
        || ctx.state.is_neutralized::<DamageMult>()
    {
        return Ok(());
    }

    ctx.state.multiply::<DamageMult>(0, 1);
    ctx.state.set(AbsorbedElement(element.clone()));
    let name = env.name_of(carrier);

    let Some(fraction) = absorb else {
        ctx.log(env, LogMessage::new(msg::NO_EFFECT).arg(name));
        return Ok(());
    };

    let max_hp = env
        .roster()?
        .character(carrier)
        .ok_or(ActionError::TargetNotFound(carrier))?
        .max_hp;
    ctx.log(env, LogMessage::new(msg::ABSORB).arg(&name).arg(element));
    let healed = damage::restore(ctx, env, carrier, scaled_at_least_one(max_hp, fraction)).await?;
    ctx.state
        .add::<DamageHealedTarget>(i32::try_from(healed).unwrap_or(i32::MAX));
    Ok(())
}
