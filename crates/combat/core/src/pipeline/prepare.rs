//! Building an action context from a player or trap choice.
//!
//! These only validate and look things up; nothing is spent until the action
//! passes its `BeforeTry` stage.
use crate::action::{ActionContext, ActionError, ActionKind, BattleData, DataOrigin};
use crate::env::{BattleEnv, CharacterSnapshot};
use crate::ids::{ElementId, EntityId, ItemId, SkillId};
use crate::stats::Category;

fn character(env: &BattleEnv<'_>, id: EntityId) -> Result<CharacterSnapshot, ActionError> {
    env.roster()?
        .character(id)
        .ok_or(ActionError::UserNotFound(id))
}

fn ensure_target(env: &BattleEnv<'_>, id: EntityId) -> Result<(), ActionError> {
    env.roster()?
        .character(id)
        .map(|_| ())
        .ok_or(ActionError::TargetNotFound(id))
}

fn ensure_carried(user: &CharacterSnapshot, item: &ItemId) -> Result<(), ActionError> {
    if user.inventory.contains(item) {
        Ok(())
    } else {
        Err(ActionError::ItemNotCarried {
            user: user.id,
            item: item.clone(),
        })
    }
}

/// `user` uses the skill in `slot` on `target`.
///
/// # Errors
///
/// `EmptySlot` or `NoCharges` when the slot cannot be used, `SkillNotFound`
/// when content does not know the learned skill.
pub fn prepare_skill(
    env: &BattleEnv<'_>,
    user: EntityId,
    slot: usize,
    target: EntityId,
) -> Result<ActionContext, ActionError> {
    let snapshot = character(env, user)?;
    ensure_target(env, target)?;
    let learned = snapshot
        .skill(slot)
        .ok_or(ActionError::EmptySlot { user, slot })?;
    if learned.charges == 0 {
        return Err(ActionError::NoCharges { user, slot });
    }
    let skill = env
        .content()?
        .skill(&learned.skill)
        .ok_or_else(|| ActionError::SkillNotFound(learned.skill.clone()))?;

    let data = skill
        .data
        .clone()
        .with_origin(DataOrigin::Skill(skill.id.clone()));
    Ok(ActionContext::new(ActionKind::Skill { slot }, user, target, data))
}

/// `user` consumes `item` from its inventory.
pub fn prepare_item(
    env: &BattleEnv<'_>,
    user: EntityId,
    item: &ItemId,
) -> Result<ActionContext, ActionError> {
    let snapshot = character(env, user)?;
    ensure_carried(&snapshot, item)?;
    let definition = env
        .content()?
        .item(item)
        .ok_or_else(|| ActionError::ItemNotFound(item.clone()))?;
    let data = definition
        .use_data
        .clone()
        .ok_or_else(|| ActionError::ItemNotUsable(item.clone()))?
        .with_origin(DataOrigin::Item(item.clone()));

    Ok(ActionContext::new(ActionKind::Item, user, user, data).with_item(item.clone()))
}

/// `user` throws `item` at `target`. Items without throw data fly as inert
/// objects that only land or get caught.
pub fn prepare_throw(
    env: &BattleEnv<'_>,
    user: EntityId,
    item: &ItemId,
    target: EntityId,
) -> Result<ActionContext, ActionError> {
    let snapshot = character(env, user)?;
    ensure_target(env, target)?;
    ensure_carried(&snapshot, item)?;
    let definition = env
        .content()?
        .item(item)
        .ok_or_else(|| ActionError::ItemNotFound(item.clone()))?;
    let data = definition
        .throw_data
        .clone()
        .unwrap_or_else(|| BattleData::new(ElementId::NONE, Category::Physical, 0))
        .with_origin(DataOrigin::Item(item.clone()));

    Ok(ActionContext::new(ActionKind::Throw, user, target, data).with_item(item.clone()))
}

/// The trap `trap` springs on `victim`, who acts as both user and target.
pub fn prepare_trap(
    env: &BattleEnv<'_>,
    trap: &SkillId,
    victim: EntityId,
) -> Result<ActionContext, ActionError> {
    ensure_target(env, victim)?;
    let skill = env
        .content()?
        .skill(trap)
        .ok_or_else(|| ActionError::SkillNotFound(trap.clone()))?;
    let data = skill
        .data
        .clone()
        .with_origin(DataOrigin::Trap(trap.clone()));

    Ok(ActionContext::new(ActionKind::Trap, victim, victim, data))
}
