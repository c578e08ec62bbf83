//! Damage and healing application with bookkeeping.
//!
//! Every HP change in the engine goes through [`inflict`] or [`restore`], so
//! knockouts are counted and reported the same way whether the HP came off
//! a direct hit, recoil or a counter.

use tracing::debug;

use crate::action::{ActionContext, ActionError, Change};
use crate::element::Effectiveness;
use crate::env::{BattleEnv, LogMessage, msg};
use crate::ids::EntityId;
use crate::state::{DamageDealt, HitCharacters, Knockouts, TotalDamageDealt};

use super::formula::{DamageOutcome, DamageReport};

/// How inflicted damage is booked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageSource {
    /// The action's hit on the current target. Feeds `DamageDealt`,
    /// `TotalDamageDealt` and `HitCharacters`.
    Hit,
    /// Recoil, counters and other derived damage. Feeds nothing, so derived
    /// damage can never be derived from again.
    Derived,
}

/// Removes HP from `target` and reports it.
///
/// Returns the HP actually removed.
pub async fn inflict(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    target: EntityId,
    amount: u32,
    source: DamageSource,
) -> Result<u32, ActionError> {
    let change = env
        .roster()?
        .inflict_damage(target, amount)
        .await
        .ok_or(ActionError::TargetNotFound(target))?;
    let dealt = change.amount();
    debug!(%target, amount, dealt, remaining = change.after, ?source, "damage applied");

    if source == DamageSource::Hit {
        let booked = i32::try_from(dealt).unwrap_or(i32::MAX);
        ctx.state.add::<DamageDealt>(booked);
        ctx.global.add::<TotalDamageDealt>(booked);
        let hit = ctx.global.entry::<HitCharacters>();
        if !hit.0.contains(&target) {
            hit.0.push(target);
        }
    }

    ctx.record(Change::Damage {
        target,
        amount: dealt,
        remaining: change.after,
    });
    let name = env.name_of(target);
    ctx.log(env, LogMessage::new(msg::DAMAGE).arg(&name).arg(dealt));

    if change.knocked_out() {
        ctx.global.add::<Knockouts>(1);
        ctx.record(Change::Knockout { target });
        ctx.log(env, LogMessage::new(msg::KNOCKOUT).arg(&name));
    }
    Ok(dealt)
}

/// Restores HP to `target` and reports it.
///
/// Returns the HP actually restored.
pub async fn restore(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    target: EntityId,
    amount: u32,
) -> Result<u32, ActionError> {
    let change = env
        .roster()?
        .restore_hp(target, amount)
        .await
        .ok_or(ActionError::TargetNotFound(target))?;
    let healed = change.amount();
    debug!(%target, amount, healed, "hp restored");

    if healed > 0 {
        ctx.record(Change::Heal {
            target,
            amount: healed,
        });
        ctx.log(
            env,
            LogMessage::new(msg::HEAL).arg(env.name_of(target)).arg(healed),
        );
    }
    Ok(healed)
}

/// Prints hit feedback and applies a formula result to the current target.
///
/// Returns the HP removed, or `None` when the hit was immune.
pub async fn deliver(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    report: &DamageReport,
) -> Result<Option<u32>, ActionError> {
    let target = ctx.target;
    let amount = match report.outcome {
        DamageOutcome::Immune => {
            if report.effectiveness == Some(Effectiveness::NoEffect) {
                let name = env.name_of(target);
                ctx.log(env, LogMessage::new(msg::NO_EFFECT).arg(name));
            }
            return Ok(None);
        }
        DamageOutcome::Dealt(0) => return Ok(Some(0)),
        DamageOutcome::Dealt(amount) => amount,
    };

    if report.critical {
        ctx.log(env, LogMessage::new(msg::CRITICAL));
    }
    match report.effectiveness {
        Some(Effectiveness::SuperEffective) => ctx.log(env, LogMessage::new(msg::SUPER_EFFECTIVE)),
        Some(Effectiveness::NotVeryEffective) => {
            ctx.log(env, LogMessage::new(msg::NOT_VERY_EFFECTIVE))
        }
        _ => {}
    }

    inflict(ctx, env, target, amount, DamageSource::Hit)
        .await
        .map(Some)
}
