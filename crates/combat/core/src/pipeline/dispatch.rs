//! Priority dispatch of one stage.
//!
//! A stage merges the action's own list with the passive lists of the
//! characters involved. Each step re-reads every list and picks the smallest
//! [`DispatchKey`] after the last one run, so effects that edit the lists,
//! redirect the action or change the participants are seen by the very next
//! step.
use tracing::{debug, trace, warn};

use crate::action::{ActionContext, ActionError, PriorityList, Stage};
use crate::effect::{BattleEffect, EffectOwner};
use crate::env::{BattleEnv, PassiveHook};
use crate::ids::EntityId;

const RANK_DATA: u8 = 0;
const RANK_USER: u8 = 1;
const RANK_TARGET: u8 = 2;
const RANK_BYSTANDER: u8 = 3;

/// Total order over every effect a stage can run.
///
/// Priority first; ties by source (data, user, target, bystanders), then
/// carrier id, then owner (held item before statuses, statuses in attach
/// order), then declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct DispatchKey {
    priority: i32,
    rank: u8,
    carrier: u32,
    slot: u32,
    index: usize,
}

impl DispatchKey {
    /// Sorts after every key sharing this priority.
    fn end_of_bucket(self) -> Self {
        Self {
            priority: self.priority,
            rank: u8::MAX,
            carrier: u32::MAX,
            slot: u32::MAX,
            index: usize::MAX,
        }
    }
}

/// The next effect to run, cloned out of its list.
struct Step {
    key: DispatchKey,
    effect: BattleEffect,
    owner: EffectOwner,
    carrier: EntityId,
}

/// A character whose passives join the stage.
#[derive(Clone, Copy, Debug)]
struct Carrier {
    rank: u8,
    id: EntityId,
    hook: PassiveHook,
}

/// Runs every effect of `stage` in dispatch order. Checks the cancel flag
/// before each effect.
///
/// An effect that changes the target ends its priority bucket: the rest of
/// that bucket was gathered around the old target, and the new target's
/// passives join from the next priority on, whatever the carrier ids.
pub(crate) async fn run_stage(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    stage: Stage,
) -> Result<(), ActionError> {
    if ctx.is_cancelled() {
        return Ok(());
    }
    debug!(%stage, strike = ctx.strike, target = %ctx.target, "stage");

    let mut cursor = None;
    while !ctx.is_cancelled() {
        let Some(step) = next_step(ctx, env, stage, cursor)? else {
            break;
        };
        let target = ctx.target;
        step.effect.apply(&step.owner, step.carrier, ctx, env).await?;
        cursor = Some(if ctx.target == target {
            step.key
        } else {
            step.key.end_of_bucket()
        });
    }
    Ok(())
}

fn next_step(
    ctx: &ActionContext,
    env: &BattleEnv<'_>,
    stage: Stage,
    after: Option<DispatchKey>,
) -> Result<Option<Step>, ActionError> {
    let mut best: Option<(DispatchKey, &BattleEffect, EffectOwner, EntityId)> = None;
    let mut consider = |key: DispatchKey, effect, owner: &EffectOwner, carrier: EntityId| {
        if best.as_ref().is_none_or(|(current, ..)| key < *current) {
            best = Some((key, effect, owner.clone(), carrier));
        }
    };

    if let Some(list) = ctx.data.stages.get(stage) {
        if let Some((key, effect)) = first_after(list, RANK_DATA, 0, 0, after) {
            consider(key, effect, &EffectOwner::Data, ctx.user);
        }
    }

    let carriers = carriers(ctx, env, stage)?;
    if !carriers.is_empty() {
        let content = env.content()?;
        let roster = env.roster()?;
        for carrier in carriers {
            let Some(snapshot) = roster.character(carrier.id) else {
                continue;
            };

            if let Some(item) = &snapshot.held_item {
                match content.item(item) {
                    Some(data) => {
                        if let Some(list) = data.passive.get(carrier.hook) {
                            if let Some((key, effect)) =
                                first_after(list, carrier.rank, carrier.id.0, 0, after)
                            {
                                consider(key, effect, &EffectOwner::Item(item.clone()), carrier.id);
                            }
                        }
                    }
                    None => warn!(%item, carrier = %carrier.id, "held item missing from content"),
                }
            }

            for (slot, status) in (1u32..).zip(&snapshot.statuses) {
                match content.status(status) {
                    Some(data) => {
                        if let Some(list) = data.passive.get(carrier.hook) {
                            if let Some((key, effect)) =
                                first_after(list, carrier.rank, carrier.id.0, slot, after)
                            {
                                consider(
                                    key,
                                    effect,
                                    &EffectOwner::Status(status.clone()),
                                    carrier.id,
                                );
                            }
                        }
                    }
                    None => warn!(%status, carrier = %carrier.id, "status missing from content"),
                }
            }
        }
    }

    Ok(best.map(|(key, effect, owner, carrier)| {
        trace!(?key, ?owner, %carrier, "dispatch");
        Step {
            key,
            effect: effect.clone(),
            owner,
            carrier,
        }
    }))
}

/// First entry of `list` whose key sorts after `after`.
fn first_after(
    list: &PriorityList<BattleEffect>,
    rank: u8,
    carrier: u32,
    slot: u32,
    after: Option<DispatchKey>,
) -> Option<(DispatchKey, &BattleEffect)> {
    list.positions()
        .map(|(priority, index, effect)| {
            let key = DispatchKey {
                priority,
                rank,
                carrier,
                slot,
                index,
            };
            (key, effect)
        })
        .find(|(key, _)| after.is_none_or(|after| *key > after))
}

/// Characters whose passives join `stage`, with the hook they run.
fn carriers(
    ctx: &ActionContext,
    env: &BattleEnv<'_>,
    stage: Stage,
) -> Result<Vec<Carrier>, ActionError> {
    let user = |hook| Carrier {
        rank: RANK_USER,
        id: ctx.user,
        hook,
    };
    let target = |hook| Carrier {
        rank: RANK_TARGET,
        id: ctx.target,
        hook,
    };

    let mut carriers = match stage {
        Stage::BeforeTry => vec![user(PassiveHook::BeforeTry)],
        Stage::BeforeAction => vec![user(PassiveHook::BeforeAction)],
        Stage::OnAction => vec![user(PassiveHook::OnAction)],
        Stage::BeforeHit => vec![
            user(PassiveHook::BeforeHitting),
            target(PassiveHook::BeforeBeingHit),
        ],
        Stage::AfterHit => vec![
            user(PassiveHook::AfterHitting),
            target(PassiveHook::AfterBeingHit),
        ],
        Stage::AfterAction => vec![user(PassiveHook::AfterAction)],
        Stage::BeforeExplosion | Stage::OnHit | Stage::OnHitTile => Vec::new(),
    };

    let nearby = match stage {
        Stage::BeforeAction => Some((ctx.user, PassiveHook::NearbyAction)),
        Stage::BeforeHit => Some((ctx.target, PassiveHook::NearbyHit)),
        _ => None,
    };
    if let Some((center, hook)) = nearby {
        carriers.extend(bystanders(ctx, env, center)?.into_iter().map(|id| Carrier {
            rank: RANK_BYSTANDER,
            id,
            hook,
        }));
    }
    Ok(carriers)
}

/// Standing characters within the proximity radius of `center`, other than
/// the user and the target, sorted by id. Empty without a map.
fn bystanders(
    ctx: &ActionContext,
    env: &BattleEnv<'_>,
    center: EntityId,
) -> Result<Vec<EntityId>, ActionError> {
    let Ok(map) = env.map() else {
        return Ok(Vec::new());
    };
    let Some(position) = map.position(center) else {
        return Ok(Vec::new());
    };
    let radius = env.content()?.config().proximity_radius;
    let roster = env.roster()?;

    Ok(map
        .characters_within(position, radius)
        .into_iter()
        .filter(|id| *id != ctx.user && *id != ctx.target)
        .filter(|id| roster.character(*id).is_some_and(|c| !c.is_knocked_out()))
        .collect())
}
