//! The action state machine.
//!
//! ```text
//! Prepare   BeforeTry, then pay costs
//! PreHit    BeforeAction, OnAction
//! Strike    repeat while strike < strikes:
//!             BeforeExplosion, gather targets
//!             per target: BeforeHit, accuracy, OnHit, AfterHit
//!             OnHitTile
//! Cleanup   thrown item lands, AfterAction
//! ```
//!
//! Every strike starts from the data and per-target state left by PreHit,
//! and every target from the state left by `BeforeExplosion`. The global
//! store, the strike count and the aim carry over. Once cancelled, no
//! further effect runs; a thrown item that was already let go still lands.
mod dispatch;
mod prepare;
mod targets;

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, info};

use crate::action::{
    ActionContext, ActionError, ActionKind, ActionOutcome, BattleData, Change, DataOrigin,
    Explosion, ItemLocation, Stage,
};
use crate::damage::check_hit;
use crate::env::{BattleEnv, LogMessage, msg};
use crate::state::{AttackHit, ItemCaught, StateStore};

pub use prepare::{prepare_item, prepare_skill, prepare_throw, prepare_trap};

use dispatch::run_stage;

/// Data, per-target state and geometry at a checkpoint.
struct Checkpoint {
    data: BattleData,
    state: StateStore,
    explosion: Explosion,
}

impl Checkpoint {
    fn take(ctx: &ActionContext) -> Self {
        Self {
            data: ctx.data.clone(),
            state: ctx.state.clone(),
            explosion: ctx.explosion,
        }
    }

    fn restore(&self, ctx: &mut ActionContext) {
        ctx.data = self.data.clone();
        ctx.state = self.state.clone();
        ctx.explosion = self.explosion;
        ctx.target = ctx.aim;
    }
}

/// Resolves an action to completion.
///
/// # Errors
///
/// Only infrastructure failures: a missing service, a participant unknown to
/// the roster, or nested invocations past the configured depth.
pub async fn resolve(
    mut ctx: ActionContext,
    env: &BattleEnv<'_>,
) -> Result<ActionOutcome, ActionError> {
    let max_strikes = env.content()?.config().max_strikes;
    info!(
        user = %ctx.user,
        target = %ctx.aim,
        kind = ?ctx.kind,
        origin = ?ctx.data.origin,
        depth = ctx.depth(),
        "resolving action"
    );
    announce(&mut ctx, env);

    // Prepare
    run_stage(&mut ctx, env, Stage::BeforeTry).await?;
    if ctx.is_cancelled() {
        debug!("action cancelled before commit");
        return Ok(ctx.into_outcome());
    }
    pay_costs(&mut ctx, env).await?;

    // PreHit
    run_stage(&mut ctx, env, Stage::BeforeAction).await?;
    run_stage(&mut ctx, env, Stage::OnAction).await?;
    let prepared = Checkpoint::take(&ctx);

    // Strikes
    while !ctx.is_cancelled() && ctx.strike < ctx.strikes.min(max_strikes) {
        prepared.restore(&mut ctx);
        ctx.begin_strike();
        debug!(strike = ctx.strike, strikes = ctx.strikes, "strike");

        run_stage(&mut ctx, env, Stage::BeforeExplosion).await?;
        if ctx.is_cancelled() {
            break;
        }
        let struck = Checkpoint::take(&ctx);

        let targets = targets::strike_targets(&ctx, env)?;
        if targets.is_empty() {
            debug!(strike = ctx.strike, "nobody left to hit");
            break;
        }
        for target in targets {
            struck.restore(&mut ctx);
            let standing = env
                .roster()?
                .character(target)
                .is_some_and(|c| !c.is_knocked_out());
            if !standing {
                continue;
            }
            ctx.target = target;
            hit_target(&mut ctx, env).await?;
            if ctx.is_cancelled() {
                break;
            }
        }
        if ctx.is_cancelled() {
            break;
        }

        struck.restore(&mut ctx);
        if !ctx.global.contains::<ItemCaught>() {
            run_stage(&mut ctx, env, Stage::OnHitTile).await?;
        }
        ctx.strike += 1;
    }

    // Cleanup
    land_thrown_item(&mut ctx, env).await?;
    prepared.restore(&mut ctx);
    run_stage(&mut ctx, env, Stage::AfterAction).await?;

    let outcome = ctx.into_outcome();
    debug!(
        strikes = outcome.strikes,
        cancelled = outcome.cancelled,
        total_damage = outcome.total_damage,
        knockouts = outcome.knockouts,
        "action resolved"
    );
    Ok(outcome)
}

/// Boxed [`resolve`] for actions started from inside an effect.
pub(crate) fn resolve_nested<'a>(
    ctx: ActionContext,
    env: &'a BattleEnv<'a>,
) -> Pin<Box<dyn Future<Output = Result<ActionOutcome, ActionError>> + 'a>> {
    Box::pin(resolve(ctx, env))
}

async fn hit_target(ctx: &mut ActionContext, env: &BattleEnv<'_>) -> Result<(), ActionError> {
    run_stage(ctx, env, Stage::BeforeHit).await?;
    if ctx.is_cancelled() {
        return Ok(());
    }

    if !check_hit(ctx, env)? {
        debug!(target = %ctx.target, "missed");
        let message = LogMessage::new(msg::MISS).arg(env.name_of(ctx.target));
        ctx.log(env, message);
        return Ok(());
    }
    ctx.state.set(AttackHit);

    run_stage(ctx, env, Stage::OnHit).await?;
    run_stage(ctx, env, Stage::AfterHit).await
}

fn announce(ctx: &mut ActionContext, env: &BattleEnv<'_>) {
    let user = env.name_of(ctx.user);
    let message = match (ctx.kind, &ctx.data.origin) {
        (ActionKind::Item, _) => ctx
            .item
            .as_ref()
            .map(|item| LogMessage::new(msg::USE_ITEM).arg(&user).arg(env.item_name(item))),
        (ActionKind::Throw, _) => ctx
            .item
            .as_ref()
            .map(|item| LogMessage::new(msg::THROW_ITEM).arg(&user).arg(env.item_name(item))),
        (_, DataOrigin::Trap(trap)) => {
            Some(LogMessage::new(msg::TRAP).arg(&user).arg(env.skill_name(trap)))
        }
        (_, DataOrigin::Skill(skill)) => {
            Some(LogMessage::new(msg::USE_SKILL).arg(&user).arg(env.skill_name(skill)))
        }
        _ => None,
    };
    if let Some(message) = message {
        ctx.log(env, message);
    }
}

/// Spends what the action costs once it is committed.
async fn pay_costs(ctx: &mut ActionContext, env: &BattleEnv<'_>) -> Result<(), ActionError> {
    let roster = env.roster()?;
    let user = ctx.user;
    match ctx.kind {
        ActionKind::Skill { slot } => {
            let spent = roster.deduct_charges(user, slot, 1).await;
            if spent > 0 {
                ctx.record(Change::Charges {
                    target: user,
                    slot,
                    delta: -i32::try_from(spent).unwrap_or(i32::MAX),
                });
            }
        }
        ActionKind::Item => {
            if let Some(item) = ctx.item.clone() {
                if roster.take_item(user, &item).await {
                    ctx.record(Change::ItemMoved {
                        item,
                        from: ItemLocation::Inventory(user),
                        to: ItemLocation::Consumed,
                    });
                }
            }
        }
        // Where a thrown item ends up is recorded when it lands or is caught.
        ActionKind::Throw => {
            if let Some(item) = &ctx.item {
                roster.take_item(user, item).await;
            }
        }
        ActionKind::Trap | ActionKind::Invoked => {}
    }
    Ok(())
}

/// Drops an uncaught thrown item at the aimed character's feet.
async fn land_thrown_item(ctx: &mut ActionContext, env: &BattleEnv<'_>) -> Result<(), ActionError> {
    if ctx.kind != ActionKind::Throw || ctx.global.contains::<ItemCaught>() {
        return Ok(());
    }
    let Some(item) = ctx.item.clone() else {
        return Ok(());
    };
    let map = env.map()?;
    let position = map
        .position(ctx.aim)
        .or_else(|| map.position(ctx.user))
        .unwrap_or_default();

    map.drop_item(position, item.clone()).await;
    let message = LogMessage::new(msg::ITEM_LANDED)
        .arg(env.item_name(&item))
        .arg(position);
    ctx.log(env, message);
    ctx.record(Change::ItemMoved {
        item,
        from: ItemLocation::Inventory(ctx.user),
        to: ItemLocation::Floor(position),
    });
    Ok(())
}
