//! Damage formula.
//!
//! Every division truncates and happens in the order written below. The
//! order is load-bearing for balance parity; do not fold the steps into one
//! fraction.

use tracing::trace;

use crate::action::{ActionContext, ActionError, DataFlags};
use crate::element::Effectiveness;
use crate::env::BattleEnv;
use crate::state::{CritBoost, CriticalHit, CrossCategory, DamageMult, PreciseCrit, stage_boost};
use crate::stats::Category;

/// Result of the formula for one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    Dealt(u32),
    /// Do not apply damage at all. Distinct from dealing zero.
    Immune,
}

/// Formula result plus the feedback the hit should print.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageReport {
    pub outcome: DamageOutcome,
    pub critical: bool,
    /// `None` when the type chart was never consulted.
    pub effectiveness: Option<Effectiveness>,
}

impl DamageReport {
    const fn silent_immunity() -> Self {
        Self {
            outcome: DamageOutcome::Immune,
            critical: false,
            effectiveness: None,
        }
    }
}

/// ```text
/// base = ((level / 3 + 6) * attack * power) / defense / 50
/// ```
///
/// A zero defense is treated as 1.
pub fn base_damage(level: u32, attack: u32, power: u32, defense: u32) -> i64 {
    let level_factor = i64::from(level / 3 + 6);
    let numerator = level_factor * i64::from(attack) * i64::from(power);
    numerator / i64::from(defense.max(1)) / 50
}

/// Scales by a percentage roll, truncating.
pub fn apply_variance(damage: i64, roll: u32) -> i64 {
    damage * i64::from(roll) / 100
}

/// Computes the damage the current hit deals to `ctx.target`.
///
/// Steps:
/// 1. If `DamageMult` is already neutralized, stop (no rolls, no messages).
/// 2. Pick the stat pair for the category (swapped by `CrossCategory`).
/// 3. Roll the critical hit; on success widen `DamageMult` and ignore
///    stages that favour the defender.
/// 4. Same-element bonus, once.
/// 5. Type effectiveness; immunity neutralizes `DamageMult`.
/// 6. Base damage, variance roll, `DamageMult`, floor.
pub fn calculate(
    ctx: &mut ActionContext,
    env: &BattleEnv<'_>,
) -> Result<DamageReport, ActionError> {
    if ctx.state.is_neutralized::<DamageMult>() {
        trace!(target = %ctx.target, "damage multiplier neutralized before formula");
        return Ok(DamageReport::silent_immunity());
    }
    if ctx.data.category == Category::Status {
        return Ok(DamageReport::silent_immunity());
    }

    let content = env.content()?;
    let config = content.config();
    let roster = env.roster()?;
    let user = roster
        .character(ctx.user)
        .ok_or(ActionError::UserNotFound(ctx.user))?;
    let target = roster
        .character(ctx.target)
        .ok_or(ActionError::TargetNotFound(ctx.target))?;

    let cross = ctx.state.contains::<CrossCategory>();
    let (attack_stat, defense_stat) = ctx.data.category.stat_pair(cross);
    let mut attack_stage = user.stages.get(attack_stat) + stage_boost(&ctx.state, attack_stat);
    let mut defense_stage =
        target.stages.get(defense_stat) + stage_boost(&ctx.state, defense_stat);

    // Critical hit
    let crit_stage = ctx.state.count::<CritBoost>();
    let draw = ctx.roll(env, 0, 99)?;
    let critical = config.crit_chances.is_critical(draw, crit_stage);
    if critical {
        let widen = if ctx.state.contains::<PreciseCrit>() {
            config.precise_crit_multiplier
        } else {
            config.crit_multiplier
        };
        ctx.state.multiply::<DamageMult>(widen.num, widen.den);
        attack_stage = attack_stage.max(0);
        defense_stage = defense_stage.min(0);
        ctx.state.set(CriticalHit);
    }

    // Same-element bonus
    if user.has_element(&ctx.data.element) {
        let stab = config.stab_multiplier;
        ctx.state.multiply::<DamageMult>(stab.num, stab.den);
    }

    // Type effectiveness
    let chart = content.type_chart();
    let tier = chart.combined(&ctx.data.element, &target.elements);
    let band = chart.band(tier);
    ctx.state.multiply::<DamageMult>(band.num, band.den);
    let effectiveness = Effectiveness::classify(tier);
    if ctx.state.is_neutralized::<DamageMult>() {
        trace!(target = %ctx.target, tier, "target immune");
        return Ok(DamageReport {
            outcome: DamageOutcome::Immune,
            critical,
            effectiveness: Some(effectiveness),
        });
    }

    let attack = config
        .attack_stages
        .apply(user.stats.get(attack_stat), attack_stage);
    let defense = config
        .attack_stages
        .apply(target.stats.get(defense_stat), defense_stage);
    let base = base_damage(user.level, attack, ctx.data.power, defense);
    let roll = ctx.roll(env, config.variance_min, config.variance_max)?;
    let varied = apply_variance(base, roll);
    let scaled = ctx.state.apply::<DamageMult>(varied);

    let floor = if ctx.data.flags.contains(DataFlags::ZERO_DAMAGE_PLACEHOLDER) {
        0
    } else {
        config.min_damage
    };
    let damage = u32::try_from(scaled.max(0)).unwrap_or(u32::MAX).max(floor);

    trace!(
        attack,
        defense,
        base,
        roll,
        scaled,
        damage,
        critical,
        tier,
        "damage formula"
    );

    Ok(DamageReport {
        outcome: DamageOutcome::Dealt(damage),
        critical,
        effectiveness: Some(effectiveness),
    })
}
