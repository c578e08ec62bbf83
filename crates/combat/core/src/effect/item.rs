//! Items, money, charges and learned skills.
use tracing::{debug, warn};

use crate::action::{
    ActionContext, ActionError, ActionKind, Change, ItemLocation, PriorityList, Stage,
};
use crate::env::{BattleEnv, LogMessage, msg};
use crate::ids::{EntityId, ItemId, SkillId};
use crate::state::ItemCaught;

use super::BattleEffect;

/// Gives `item` to `recipient`: held slot first, then inventory, then the
/// floor at the recipient's feet.
pub(super) async fn hand_over(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    recipient: EntityId,
    item: ItemId,
    from: ItemLocation,
) -> Result<ItemLocation, ActionError> {
    let roster = env.roster()?;
    let snapshot = roster
        .character(recipient)
        .ok_or(ActionError::TargetNotFound(recipient))?;

    let to = if snapshot.held_item.is_none() && roster.equip_item(recipient, item.clone()).await {
        ItemLocation::Held(recipient)
    } else if roster.give_item(recipient, item.clone()).await {
        ItemLocation::Inventory(recipient)
    } else {
        let map = env.map()?;
        let position = map.position(recipient).unwrap_or_default();
        let message = LogMessage::new(msg::ITEM_SLID)
            .arg(env.item_name(&item))
            .arg(env.name_of(recipient));
        ctx.log(env, message);
        map.drop_item(position, item.clone()).await;
        ItemLocation::Floor(position)
    };

    debug!(%item, ?from, ?to, "item moved");
    ctx.record(Change::ItemMoved {
        item,
        from,
        to: to.clone(),
    });
    Ok(to)
}

pub(super) async fn steal(ctx: &mut ActionContext, env: &BattleEnv<'_>) -> Result<(), ActionError> {
    let (user, target) = (ctx.user, ctx.target);
    if user == target {
        return Ok(());
    }
    let Some(item) = env.roster()?.dequip_item(target).await else {
        return Ok(());
    };

    let message = LogMessage::new(msg::STEAL)
        .arg(env.name_of(user))
        .arg(env.item_name(&item))
        .arg(env.name_of(target));
    ctx.log(env, message);
    hand_over(ctx, env, user, item, ItemLocation::Held(target)).await?;
    Ok(())
}

/// Turns the incoming throw into a hand-off for the current target only.
pub(super) fn catch(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    carrier: EntityId,
) -> Result<(), ActionError> {
    if ctx.kind != ActionKind::Throw
        || carrier != ctx.target
        || ctx.global.contains::<ItemCaught>()
    {
        return Ok(());
    }
    let Some(item) = ctx.item.clone() else {
        return Ok(());
    };
    let standing = env
        .roster()?
        .character(carrier)
        .is_some_and(|c| !c.is_knocked_out());
    if !standing {
        return Ok(());
    }

    ctx.data
        .stages
        .replace(Stage::OnHit, PriorityList::single(0, BattleEffect::ReceiveItem));
    ctx.data.hit_rate = None;
    ctx.global.set(ItemCaught);

    let message = LogMessage::new(msg::CATCH)
        .arg(env.name_of(carrier))
        .arg(env.item_name(&item));
    ctx.log(env, message);
    Ok(())
}

pub(super) async fn receive(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
) -> Result<(), ActionError> {
    if ctx.kind != ActionKind::Throw {
        return Ok(());
    }
    let Some(item) = ctx.item.clone() else {
        return Ok(());
    };
    let (user, target) = (ctx.user, ctx.target);
    hand_over(ctx, env, target, item, ItemLocation::Inventory(user)).await?;
    Ok(())
}

pub(super) async fn drop_money(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    amount: u32,
) -> Result<(), ActionError> {
    let (user, target) = (ctx.user, ctx.target);
    if user == target || amount == 0 {
        return Ok(());
    }
    let roster = env.roster()?;
    let lost = roster.change_money(target, -i64::from(amount)).await;
    if lost == 0 {
        return Ok(());
    }
    let gained = roster.change_money(user, -lost).await;

    ctx.record(Change::Money {
        target,
        delta: lost,
    });
    ctx.record(Change::Money {
        target: user,
        delta: gained,
    });
    let message = LogMessage::new(msg::MONEY_DROPPED)
        .arg(env.name_of(target))
        .arg(-lost);
    ctx.log(env, message);
    Ok(())
}

pub(super) async fn restore_charges(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    amount: u32,
) -> Result<(), ActionError> {
    let target = ctx.target;
    let roster = env.roster()?;
    let Some(snapshot) = roster.character(target) else {
        return Ok(());
    };

    let mut total = 0u32;
    for slot in 0..snapshot.skills.len() {
        let restored = roster.restore_charges(target, slot, amount).await;
        if restored > 0 {
            total += restored;
            ctx.record(Change::Charges {
                target,
                slot,
                delta: i32::try_from(restored).unwrap_or(i32::MAX),
            });
        }
    }

    if total > 0 {
        let message = LogMessage::new(msg::CHARGES_RESTORED)
            .arg(env.name_of(target))
            .arg(total);
        ctx.log(env, message);
    }
    Ok(())
}

pub(super) async fn learn_skill(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    skill: &SkillId,
    slot: usize,
) -> Result<(), ActionError> {
    let Some(data) = env.content()?.skill(skill) else {
        debug_assert!(false, "learnable skill {skill} missing from content");
        warn!(%skill, "learnable skill missing from content");
        return Ok(());
    };
    let target = ctx.target;
    if !env
        .roster()?
        .learn_skill(target, slot, skill.clone(), data.charges)
        .await
    {
        return Ok(());
    }

    ctx.record(Change::SkillLearned {
        target,
        skill: skill.clone(),
        slot,
    });
    let message = LogMessage::new(msg::SKILL_LEARNED)
        .arg(env.name_of(target))
        .arg(&data.name);
    ctx.log(env, message);
    Ok(())
}
