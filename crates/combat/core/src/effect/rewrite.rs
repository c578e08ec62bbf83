//! Effects that rewrite the action's own data mid-resolution.
use tracing::{debug, warn};

use crate::action::{ActionContext, Explosion, PriorityList, Stage};
use crate::env::BattleEnv;
use crate::ids::{ElementId, SkillId};
use crate::stats::Ratio;

use super::BattleEffect;

pub(super) fn replace_stage(
    ctx: &mut ActionContext,
    stage: Stage,
    effects: &PriorityList<BattleEffect>,
) {
    debug!(%stage, count = effects.len(), "stage list replaced");
    ctx.data.stages.replace(stage, effects.clone());
}

pub(super) fn change_element(ctx: &mut ActionContext, element: &ElementId) {
    ctx.data.element = element.clone();
}

pub(super) fn set_power(ctx: &mut ActionContext, power: u32) {
    ctx.data.power = power;
}

pub(super) fn scale_power(ctx: &mut ActionContext, factor: Ratio) {
    let scaled = factor.apply(i64::from(ctx.data.power)).max(0);
    ctx.data.power = u32::try_from(scaled).unwrap_or(u32::MAX);
}

/// Swaps in another skill's data. Geometry and strike count follow the new
/// data; the origin tag does not.
pub(super) fn replace_data(ctx: &mut ActionContext, env: &BattleEnv<'_>, skill: &SkillId) {
    let Some(replacement) = env.content().ok().and_then(|content| content.skill(skill)) else {
        debug_assert!(false, "replacement skill {skill} missing from content");
        warn!(%skill, "replacement skill missing from content");
        return;
    };
    debug!(%skill, "data replaced");
    ctx.data.replace_keeping_origin(replacement.data.clone());
    ctx.explosion = ctx.data.explosion;
    ctx.strikes = ctx.data.strikes;
}

pub(super) fn set_explosion(ctx: &mut ActionContext, explosion: Explosion) {
    ctx.explosion = explosion;
}
