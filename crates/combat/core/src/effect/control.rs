//! Flow control: cancellation, branching, strike count, nested actions.
use tracing::{debug, warn};

use crate::action::{ActionContext, ActionError, ActionKind, DataOrigin};
use crate::env::{BattleEnv, LogMessage};
use crate::error::ErrorContext;
use crate::ids::{ElementId, EntityId, MapStatusId, SkillId, StatusId};
use crate::pipeline;
use crate::state::AttackHit;
use crate::stats::{Category, Ratio};

/// Predicate over the in-flight action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// Zero-based strike index is at least this.
    StrikeAtLeast(u32),
    /// Percentage roll.
    Chance(u32),
    /// User HP fraction is strictly below this.
    UserHpBelow(Ratio),
    TargetHasStatus(StatusId),
    WeatherActive(MapStatusId),
    CategoryIs(Category),
    ElementIs(ElementId),
    /// The accuracy check passed for the current target.
    AttackHit,
    Not(Box<Condition>),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    /// Evaluates left to right, short-circuiting. `Chance` draws only when
    /// reached.
    pub fn holds(&self, ctx: &mut ActionContext, env: &BattleEnv<'_>) -> Result<bool, ActionError> {
        Ok(match self {
            Condition::StrikeAtLeast(strike) => ctx.strike >= *strike,
            Condition::Chance(chance) => ctx.chance(env, *chance)?,
            Condition::UserHpBelow(threshold) => {
                let user = env
                    .roster()?
                    .character(ctx.user)
                    .ok_or(ActionError::UserNotFound(ctx.user))?;
                i64::from(user.hp) * i64::from(threshold.den)
                    < i64::from(user.max_hp) * i64::from(threshold.num)
            }
            Condition::TargetHasStatus(status) => env
                .roster()?
                .character(ctx.target)
                .is_some_and(|c| c.has_status(status)),
            Condition::WeatherActive(weather) => env.map()?.has_map_status(weather),
            Condition::CategoryIs(category) => ctx.data.category == *category,
            Condition::ElementIs(element) => ctx.data.element == *element,
            Condition::AttackHit => ctx.state.contains::<AttackHit>(),
            Condition::Not(inner) => !inner.holds(ctx, env)?,
            Condition::All(all) => {
                for condition in all {
                    if !condition.holds(ctx, env)? {
                        return Ok(false);
                    }
                }
                true
            }
            Condition::Any(any) => {
                for condition in any {
                    if condition.holds(ctx, env)? {
                        return Ok(true);
                    }
                }
                false
            }
        })
    }
}

pub(super) fn cancel(ctx: &mut ActionContext, env: &BattleEnv<'_>, message: Option<&str>) {
    if let Some(key) = message {
        let message = LogMessage::new(key).arg(env.name_of(ctx.user));
        ctx.log(env, message);
    }
    ctx.cancel();
}

pub(super) fn add_strikes(ctx: &mut ActionContext, count: u32) {
    ctx.strikes = ctx.strikes.saturating_add(count);
}

/// Resolves `skill` as a full sub-action of `carrier` and folds its report
/// into the parent.
///
/// The carrier aims at the current target when it is the user, and at the
/// user otherwise. A skill missing from content invokes nothing.
pub(super) async fn invoke(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
    carrier: EntityId,
    skill: &SkillId,
) -> Result<(), ActionError> {
    let content = env.content()?;
    let depth = ctx.depth() + 1;
    if depth > content.config().max_invoke_depth {
        let context = ErrorContext::new(ctx.nonce())
            .with_user(carrier)
            .with_target(ctx.target)
            .with_skill(skill.clone())
            .with_message("nested invocation limit reached");
        return Err(ActionError::InvokeDepthExceeded { depth, context });
    }
    let Some(invoked) = content.skill(skill) else {
        debug_assert!(false, "invoked skill {skill} missing from content");
        warn!(%skill, %carrier, "invoked skill missing from content");
        return Ok(());
    };
    let data = invoked
        .data
        .clone()
        .with_origin(DataOrigin::Skill(skill.clone()));

    let target = if carrier == ctx.user { ctx.target } else { ctx.user };
    let nonce = ctx.child_nonce();
    let nested = ActionContext::new(ActionKind::Invoked, carrier, target, data)
        .with_seed(ctx.session_seed(), nonce)
        .with_depth(depth);

    debug!(%skill, %carrier, %target, depth, "invoking nested action");
    let outcome = pipeline::resolve_nested(nested, env).await?;
    ctx.absorb(outcome);
    Ok(())
}
