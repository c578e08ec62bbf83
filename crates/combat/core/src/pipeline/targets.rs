//! Hitbox resolution for one strike.
use crate::action::{ActionContext, ActionError, Alignment};
use crate::env::{BattleEnv, CharacterSnapshot};
use crate::ids::EntityId;

fn matches(alignment: Alignment, user: &CharacterSnapshot, other: &CharacterSnapshot) -> bool {
    match alignment {
        Alignment::Foe => !other.is_ally(user),
        Alignment::Friend => other.is_ally(user),
        Alignment::Any => other.id != user.id,
        Alignment::SelfOnly => other.id == user.id,
    }
}

/// Standing characters the current strike reaches, in hit order.
///
/// A zero radius hits the aimed character regardless of alignment; a
/// positive radius hits every matching character around it, sorted by id.
pub(crate) fn strike_targets(
    ctx: &ActionContext,
    env: &BattleEnv<'_>,
) -> Result<Vec<EntityId>, ActionError> {
    let roster = env.roster()?;
    let user = roster
        .character(ctx.user)
        .ok_or(ActionError::UserNotFound(ctx.user))?;
    let explosion = ctx.explosion;

    let candidates = if explosion.alignment == Alignment::SelfOnly {
        vec![ctx.user]
    } else if explosion.radius == 0 {
        vec![ctx.aim]
    } else {
        let map = env.map()?;
        match map.position(ctx.aim) {
            Some(center) => map
                .characters_within(center, explosion.radius)
                .into_iter()
                .filter(|id| {
                    roster
                        .character(*id)
                        .is_some_and(|c| matches(explosion.alignment, &user, &c))
                })
                .collect(),
            None => vec![ctx.aim],
        }
    };

    Ok(candidates
        .into_iter()
        .filter(|id| roster.character(*id).is_some_and(|c| !c.is_knocked_out()))
        .collect())
}
