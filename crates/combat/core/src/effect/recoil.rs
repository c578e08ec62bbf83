//! Damage and healing derived from what the action already did.
//!
//! Derived amounts go through the same HP primitives as a hit, so knockouts
//! are booked, but they are never fed back into the accumulators they are
//! read from.
use tracing::trace;

use crate::action::{ActionContext, ActionError};
use crate::damage::{self, DamageSource};
use crate::env::{BattleEnv, LogMessage, msg};
use crate::ids::EntityId;
use crate::state::{DamageDealt, DamageHealedTarget, HitAndRun, TotalDamageDealt};
use crate::stats::Ratio;

/// `fraction` of a positive source amount, floored at 1. `None` when the
/// source is not positive.
pub(super) fn derived_amount(source: i32, fraction: Ratio) -> Option<u32> {
    if source <= 0 {
        return None;
    }
    let amount = fraction.apply(i64::from(source)).max(1);
    Some(u32::try_from(amount).unwrap_or(u32::MAX))
}

fn is_standing(env: &BattleEnv<'_>, id: EntityId) -> Result<bool, ActionError> {
    Ok(env
        .roster()?
        .character(id)
        .is_some_and(|c| !c.is_knocked_out()))
}

pub(super) async fn recoil(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    fraction: Ratio,
) -> Result<(), ActionError> {
    let source = ctx.global.count::<TotalDamageDealt>();
    let Some(amount) = derived_amount(source, fraction) else {
        return Ok(());
    };
    let user = ctx.user;
    if !is_standing(env, user)? {
        return Ok(());
    }
    trace!(source, amount, "recoil");
    ctx.log(env, LogMessage::new(msg::RECOIL).arg(env.name_of(user)));
    damage::inflict(ctx, env, user, amount, DamageSource::Derived).await?;
    Ok(())
}

pub(super) async fn counter(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    carrier: EntityId,
    fraction: Ratio,
) -> Result<(), ActionError> {
    if carrier != ctx.target || carrier == ctx.user || ctx.state.contains::<HitAndRun>() {
        return Ok(());
    }
    let source = ctx.state.count::<DamageDealt>();
    let Some(amount) = derived_amount(source, fraction) else {
        return Ok(());
    };
    let user = ctx.user;
    if !is_standing(env, user)? {
        return Ok(());
    }
    trace!(source, amount, %carrier, "counter");
    ctx.log(env, LogMessage::new(msg::COUNTER).arg(env.name_of(carrier)));
    damage::inflict(ctx, env, user, amount, DamageSource::Derived).await?;
    Ok(())
}

pub(super) async fn drain(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    fraction: Ratio,
) -> Result<(), ActionError> {
    let source = ctx.state.count::<DamageDealt>();
    let Some(amount) = derived_amount(source, fraction) else {
        return Ok(());
    };
    let user = ctx.user;
    if !is_standing(env, user)? {
        return Ok(());
    }
    ctx.log(env, LogMessage::new(msg::DRAIN).arg(env.name_of(ctx.target)));
    damage::restore(ctx, env, user, amount).await?;
    Ok(())
}

pub(super) async fn share_heal(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    carrier: EntityId,
    fraction: Ratio,
    radius: u32,
) -> Result<(), ActionError> {
    let source = ctx.state.count::<DamageHealedTarget>();
    let Some(amount) = derived_amount(source, fraction) else {
        return Ok(());
    };
    let map = env.map()?;
    let roster = env.roster()?;
    let Some(origin) = roster.character(carrier) else {
        return Ok(());
    };
    let Some(center) = map.position(carrier) else {
        return Ok(());
    };

    let allies: Vec<EntityId> = map
        .characters_within(center, radius)
        .into_iter()
        .filter(|id| *id != carrier && *id != ctx.target)
        .filter(|id| {
            roster
                .character(*id)
                .is_some_and(|c| c.is_ally(&origin) && !c.is_knocked_out())
        })
        .collect();

    for ally in allies {
        damage::restore(ctx, env, ally, amount).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_sources_derive_nothing() {
        assert_eq!(derived_amount(0, Ratio::new(1, 2)), None);
        assert_eq!(derived_amount(-5, Ratio::new(1, 2)), None);
    }

    #[test]
    fn positive_sources_floor_at_one() {
        assert_eq!(derived_amount(1, Ratio::new(1, 4)), Some(1));
        assert_eq!(derived_amount(3, Ratio::new(1, 4)), Some(1));
        assert_eq!(derived_amount(44, Ratio::new(1, 4)), Some(11));
    }
}
