//! Effect units: the data-driven leaves the pipeline dispatches.
//!
//! Every behaviour a skill, item or status can contribute is one variant of
//! [`BattleEffect`]. Variants hold only their own parameters; the work lives in
//! the role modules below and is reached through a single [`BattleEffect::apply`].
//!
//! `apply` returns a boxed future so that effects which run other effects
//! (conditionals, nested invocations) can recurse without an infinitely sized
//! future type.
mod control;
mod damage;
mod item;
mod modifier;
mod presentation;
mod recoil;
mod redirect;
mod rewrite;
mod status;
mod weather;

use std::future::Future;
use std::pin::Pin;

use tracing::trace;

use crate::action::{ActionContext, ActionError, Explosion, PriorityList, Stage};
use crate::env::BattleEnv;
use crate::ids::{ElementId, EntityId, ItemId, MapStatusId, SkillId, StatusId};
use crate::stats::{Ratio, Stat};

pub use control::Condition;

/// Future returned by [`BattleEffect::apply`].
pub type EffectFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ActionError>> + 'a>>;

/// What carries an effect into the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectOwner {
    /// The action's own data.
    Data,
    /// A status attached to the carrier.
    Status(StatusId),
    /// The carrier's held item.
    Item(ItemId),
}

/// One composable effect unit.
///
/// Unless stated otherwise, "target" means `ctx.target` and "carrier" means
/// the character the effect came with (the user for data effects).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEffect {
    // ===== damage =====
    /// Runs the damage formula against the target and applies the result.
    DamageFormula,
    /// Fixed damage, skipped when the damage multiplier is neutralized.
    FixedDamage { amount: u32 },
    /// Damage equal to the user's level.
    LevelDamage,
    /// A fraction of the target's current HP, at least 1.
    HpFractionDamage { fraction: Ratio },
    /// Restores a fraction of the target's max HP, at least 1.
    Heal { fraction: Ratio },

    // ===== modifiers =====
    MultiplyDamage { factor: Ratio },
    /// Scales damage when the action's element is `element`.
    ElementMultiplier { element: ElementId, factor: Ratio },
    /// Scales damage of `element` while `weather` is active on the map.
    WeatherMultiplier {
        weather: MapStatusId,
        element: ElementId,
        factor: Ratio,
    },
    BoostStage { stat: Stat, stages: i32 },
    BoostCrit { stages: i32 },
    CrossCategory,
    PreciseCrit,
    /// Exempts the hit from counters.
    HitAndRun,
    /// Carrier takes no damage from `element`; with `absorb`, heals that
    /// fraction of its max HP instead.
    ImmuneToElement {
        element: ElementId,
        absorb: Option<Ratio>,
    },

    // ===== redirection (one per action) =====
    /// A foe standing near the user takes a self-targeted status action.
    Snatch,
    /// Pulls single-target actions of `element` aimed near the carrier.
    Draw { element: ElementId },
    /// Takes the hit for a nearby ally whose HP is below `threshold`.
    Cover { threshold: Ratio },
    /// Passes an incoming hit to the first other character within `radius`.
    Pass { radius: u32 },

    // ===== derived damage =====
    /// User takes a fraction of the action's total damage.
    Recoil { fraction: Ratio },
    /// Carrier, when hit, returns a fraction of the damage to the user.
    Counter { fraction: Ratio },
    /// User heals a fraction of the damage dealt to the target.
    Drain { fraction: Ratio },
    /// Allies within `radius` of the carrier share a fraction of the target's
    /// healing.
    ShareHeal { fraction: Ratio, radius: u32 },

    // ===== statuses =====
    /// `chance` is a percentage; `None` always applies.
    ApplyStatus {
        status: StatusId,
        chance: Option<u32>,
    },
    RemoveStatus { status: StatusId },

    // ===== items, money, charges =====
    /// User takes the target's held item.
    StealItem,
    /// Carrier catches a thrown item instead of being hit by it.
    CatchItem,
    /// Target receives the thrown item.
    ReceiveItem,
    /// Target drops up to `amount` money, which the user pockets.
    DropMoney { amount: u32 },
    /// Restores charges to every skill slot of the target.
    RestoreCharges { amount: u32 },
    LearnSkill { skill: SkillId, slot: usize },

    // ===== map =====
    SetWeather { weather: MapStatusId },
    ClearWeather { weather: MapStatusId },

    // ===== presentation =====
    /// Logs `key` with the user and target names as arguments.
    Message { key: String },
    /// Plays an animation from the user to the target; `wait` suspends until
    /// it has finished.
    Animation { animation: String, wait: bool },
    Sound { sound: String },
    Wait { frames: u32 },

    // ===== data rewriting =====
    /// Swaps the whole effect list of `stage`.
    ReplaceStage {
        stage: Stage,
        effects: PriorityList<BattleEffect>,
    },
    ChangeElement { element: ElementId },
    SetPower { power: u32 },
    ScalePower { factor: Ratio },
    /// Replaces the effective data with another skill's, keeping the origin.
    ReplaceData { skill: SkillId },
    SetExplosion { explosion: Explosion },

    // ===== control =====
    /// Stops the action at the next checkpoint, optionally logging `message`.
    Cancel { message: Option<String> },
    Conditional {
        condition: Condition,
        then: Vec<BattleEffect>,
        #[cfg_attr(feature = "serde", serde(default))]
        otherwise: Vec<BattleEffect>,
    },
    AddStrikes { count: u32 },
    /// Runs `skill` as a complete sub-action of the carrier and waits for it.
    Invoke { skill: SkillId },
}

impl BattleEffect {
    /// Runs the effect against the in-flight action.
    ///
    /// A precondition that does not hold (wrong category, redirection already
    /// claimed, nobody in range) returns `Ok(())` without touching anything.
    pub fn apply<'a>(
        &'a self,
        owner: &'a EffectOwner,
        carrier: EntityId,
        ctx: &'a mut ActionContext,
        env: &'a BattleEnv<'a>,
    ) -> EffectFuture<'a> {
        Box::pin(async move {
            trace!(effect = ?self, ?owner, %carrier, "apply");
            match self {
                BattleEffect::DamageFormula => damage::formula(ctx, env).await,
                BattleEffect::FixedDamage { amount } => damage::fixed(ctx, env, *amount).await,
                BattleEffect::LevelDamage => damage::level(ctx, env).await,
                BattleEffect::HpFractionDamage { fraction } => {
                    damage::hp_fraction(ctx, env, *fraction).await
                }
                BattleEffect::Heal { fraction } => damage::heal(ctx, env, *fraction).await,

                BattleEffect::MultiplyDamage { factor } => {
                    modifier::multiply(ctx, *factor);
                    Ok(())
                }
                BattleEffect::ElementMultiplier { element, factor } => {
                    modifier::element(ctx, element, *factor);
                    Ok(())
                }
                BattleEffect::WeatherMultiplier {
                    weather,
                    element,
                    factor,
                } => modifier::weather(ctx, env, weather, element, *factor),
                BattleEffect::BoostStage { stat, stages } => {
                    modifier::boost_stage(ctx, env, *stat, *stages);
                    Ok(())
                }
                BattleEffect::BoostCrit { stages } => {
                    modifier::boost_crit(ctx, *stages);
                    Ok(())
                }
                BattleEffect::CrossCategory => {
                    modifier::cross_category(ctx);
                    Ok(())
                }
                BattleEffect::PreciseCrit => {
                    modifier::precise_crit(ctx);
                    Ok(())
                }
                BattleEffect::HitAndRun => {
                    modifier::hit_and_run(ctx);
                    Ok(())
                }
                BattleEffect::ImmuneToElement { element, absorb } => {
                    modifier::immune_to_element(ctx, env, carrier, element, *absorb).await
                }

                BattleEffect::Snatch => redirect::snatch(ctx, env, carrier),
                BattleEffect::Draw { element } => redirect::draw(ctx, env, carrier, element),
                BattleEffect::Cover { threshold } => {
                    redirect::cover(ctx, env, carrier, *threshold)
                }
                BattleEffect::Pass { radius } => redirect::pass(ctx, env, carrier, *radius),

                BattleEffect::Recoil { fraction } => recoil::recoil(ctx, env, *fraction).await,
                BattleEffect::Counter { fraction } => {
                    recoil::counter(ctx, env, carrier, *fraction).await
                }
                BattleEffect::Drain { fraction } => recoil::drain(ctx, env, *fraction).await,
                BattleEffect::ShareHeal { fraction, radius } => {
                    recoil::share_heal(ctx, env, carrier, *fraction, *radius).await
                }

                BattleEffect::ApplyStatus { status, chance } => {
                    status::apply(ctx, env, status, *chance).await
                }
                BattleEffect::RemoveStatus { status } => status::remove(ctx, env, status).await,

                BattleEffect::StealItem => item::steal(ctx, env).await,
                BattleEffect::CatchItem => item::catch(ctx, env, carrier),
                BattleEffect::ReceiveItem => item::receive(ctx, env).await,
                BattleEffect::DropMoney { amount } => item::drop_money(ctx, env, *amount).await,
                BattleEffect::RestoreCharges { amount } => {
                    item::restore_charges(ctx, env, *amount).await
                }
                BattleEffect::LearnSkill { skill, slot } => {
                    item::learn_skill(ctx, env, skill, *slot).await
                }

                BattleEffect::SetWeather { weather } => weather::set(ctx, env, weather).await,
                BattleEffect::ClearWeather { weather } => weather::clear(ctx, env, weather).await,

                BattleEffect::Message { key } => {
                    presentation::message(ctx, env, key);
                    Ok(())
                }
                BattleEffect::Animation { animation, wait } => {
                    presentation::animation(ctx, env, animation, *wait).await;
                    Ok(())
                }
                BattleEffect::Sound { sound } => {
                    presentation::sound(env, sound);
                    Ok(())
                }
                BattleEffect::Wait { frames } => {
                    presentation::wait(env, *frames).await;
                    Ok(())
                }

                BattleEffect::ReplaceStage { stage, effects } => {
                    rewrite::replace_stage(ctx, *stage, effects);
                    Ok(())
                }
                BattleEffect::ChangeElement { element } => {
                    rewrite::change_element(ctx, element);
                    Ok(())
                }
                BattleEffect::SetPower { power } => {
                    rewrite::set_power(ctx, *power);
                    Ok(())
                }
                BattleEffect::ScalePower { factor } => {
                    rewrite::scale_power(ctx, *factor);
                    Ok(())
                }
                BattleEffect::ReplaceData { skill } => {
                    rewrite::replace_data(ctx, env, skill);
                    Ok(())
                }
                BattleEffect::SetExplosion { explosion } => {
                    rewrite::set_explosion(ctx, *explosion);
                    Ok(())
                }

                BattleEffect::Cancel { message } => {
                    control::cancel(ctx, env, message.as_deref());
                    Ok(())
                }
                BattleEffect::Conditional {
                    condition,
                    then,
                    otherwise,
                } => {
                    let branch = if condition.holds(ctx, env)? { then } else { otherwise };
                    for effect in branch {
                        effect.apply(owner, carrier, ctx, env).await?;
                    }
                    Ok(())
                }
                BattleEffect::AddStrikes { count } => {
                    control::add_strikes(ctx, *count);
                    Ok(())
                }
                BattleEffect::Invoke { skill } => control::invoke(ctx, env, carrier, skill).await,
            }
        })
    }
}
