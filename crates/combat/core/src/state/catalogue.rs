//! Named state entries shared between effect units.
//!
//! Per-hit entries live in the per-target store and are reset for every
//! target; action-wide entries live in the global store.
use crate::ids::{ElementId, EntityId};
use crate::stats::Stat;

use super::StateStore;
use super::accumulator::{counter, flag, multiplier};

// ============================================================================
// Damage bookkeeping
// ============================================================================

counter!(
    /// HP removed from the current target by this hit (per-target).
    DamageDealt
);
counter!(
    /// HP removed from all targets over the whole action (global).
    TotalDamageDealt
);
counter!(
    /// HP restored to the current target by this hit (per-target).
    DamageHealedTarget
);
counter!(
    /// Characters knocked out by this action (global).
    Knockouts
);

// ============================================================================
// Stage boosts contributed during resolution
// ============================================================================

counter!(UserAttackBoost);
counter!(UserMagicAttackBoost);
counter!(UserAccuracyBoost);
counter!(TargetDefenseBoost);
counter!(TargetMagicDefenseBoost);
counter!(TargetEvasionBoost);
counter!(
    /// Added to the critical-hit stage.
    CritBoost
);

multiplier!(
    /// Final damage scaling. A zero factor means "deal no damage".
    DamageMult
);

// ============================================================================
// Markers
// ============================================================================

flag!(
    /// Set once a redirection effect retargets the action (global, one-shot).
    Redirected
);
flag!(
    /// Use the other damaging category's stat pair.
    CrossCategory
);
flag!(
    /// Critical hits use the precision multiplier.
    PreciseCrit
);
flag!(
    /// Hit exempt from recoil and counter damage.
    HitAndRun
);
flag!(
    /// The accuracy check passed for the current target.
    AttackHit
);
flag!(CriticalHit);
flag!(
    /// A thrown item was caught and must not land on the floor (global).
    ItemCaught
);

// ============================================================================
// Records
// ============================================================================

/// Element that was absorbed instead of dealing damage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbsorbedElement(pub ElementId);

/// Every character that took damage from the action, in hit order (global).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HitCharacters(pub Vec<EntityId>);

/// Stage boost accumulated for `stat` during this action.
///
/// Offensive stats read the user's boosts, defensive stats the target's.
pub fn stage_boost(store: &StateStore, stat: Stat) -> i32 {
    match stat {
        Stat::Attack => store.count::<UserAttackBoost>(),
        Stat::MagicAttack => store.count::<UserMagicAttackBoost>(),
        Stat::Accuracy => store.count::<UserAccuracyBoost>(),
        Stat::Defense => store.count::<TargetDefenseBoost>(),
        Stat::MagicDefense => store.count::<TargetMagicDefenseBoost>(),
        Stat::Evasion => store.count::<TargetEvasionBoost>(),
        Stat::Speed => 0,
    }
}

/// Adds to the boost counter for `stat`. Speed has no in-action boost.
pub fn add_stage_boost(store: &mut StateStore, stat: Stat, delta: i32) {
    match stat {
        Stat::Attack => store.add::<UserAttackBoost>(delta),
        Stat::MagicAttack => store.add::<UserMagicAttackBoost>(delta),
        Stat::Accuracy => store.add::<UserAccuracyBoost>(delta),
        Stat::Defense => store.add::<TargetDefenseBoost>(delta),
        Stat::MagicDefense => store.add::<TargetMagicDefenseBoost>(delta),
        Stat::Evasion => store.add::<TargetEvasionBoost>(delta),
        Stat::Speed => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boosts_route_to_side_specific_counters() {
        let mut store = StateStore::new();
        add_stage_boost(&mut store, Stat::Attack, 2);
        add_stage_boost(&mut store, Stat::Defense, -1);
        add_stage_boost(&mut store, Stat::Speed, 3);

        assert_eq!(stage_boost(&store, Stat::Attack), 2);
        assert_eq!(stage_boost(&store, Stat::Defense), -1);
        assert_eq!(stage_boost(&store, Stat::MagicAttack), 0);
        assert_eq!(stage_boost(&store, Stat::Speed), 0);
        assert_eq!(store.count::<TargetDefenseBoost>(), -1);
    }
}
