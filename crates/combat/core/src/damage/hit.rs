//! Accuracy checks.

use crate::action::{ActionContext, ActionError};
use crate::env::BattleEnv;
use crate::state::stage_boost;
use crate::stats::{Stat, StageTable};

/// Hit chance in percent after stage scaling.
///
/// ```text
/// stage  = user accuracy stage - target evasion stage
/// chance = hit_rate scaled by the accuracy ladder at `stage`
/// ```
pub fn hit_chance(hit_rate: u32, stage: i32, table: &StageTable) -> u32 {
    table.apply(hit_rate, stage)
}

/// Rolls the accuracy check for the current target.
///
/// Data without a hit rate, and actions aimed at the user itself, always hit.
pub fn check_hit(ctx: &mut ActionContext, env: &BattleEnv<'_>) -> Result<bool, ActionError> {
    let Some(hit_rate) = ctx.data.hit_rate else {
        return Ok(true);
    };
    if ctx.target == ctx.user {
        return Ok(true);
    }

    let roster = env.roster()?;
    let user = roster
        .character(ctx.user)
        .ok_or(ActionError::UserNotFound(ctx.user))?;
    let target = roster
        .character(ctx.target)
        .ok_or(ActionError::TargetNotFound(ctx.target))?;

    let accuracy = user.stages.get(Stat::Accuracy) + stage_boost(&ctx.state, Stat::Accuracy);
    let evasion = target.stages.get(Stat::Evasion) + stage_boost(&ctx.state, Stat::Evasion);
    let table = env.content()?.config().accuracy_stages;

    let chance = hit_chance(hit_rate, accuracy - evasion, &table);
    ctx.chance(env, chance)
}
