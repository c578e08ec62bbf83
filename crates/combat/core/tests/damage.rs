//! End-to-end damage resolution through the action pipeline.
//!
//! Reference numbers: a level-50 attacker with attack 100 using a power-80
//! physical skill on a defender with defense 80 deals 44 at a 100% roll.

mod common;

use combat_core::env::memory::SequenceRng;
use combat_core::env::msg;
use combat_core::{
    BattleData, BattleEffect, BattleEnv, Category, Change, DataFlags, PassiveHook, Ratio, Stage,
    StatBlock, StatStages, prepare_skill, resolve,
};
use common::*;

fn tackle_arena(data: BattleData) -> Arena {
    Arena::new(content().with_skill(skill("tackle", data)))
        .with_character(hero().with_skill("tackle", 10), 0, 0)
        .with_character(foe(FOE), 1, 0)
}

// ============================================================================
// Formula
// ============================================================================

/// Neutral matchup, no same-element bonus, no crit, maximum roll.
#[tokio::test]
async fn neutral_hit_deals_reference_damage() {
    let arena = tackle_arena(strike("normal"));
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("tackle should be usable");
    let outcome = resolve(ctx, &env).await.expect("tackle should resolve");

    assert_eq!(outcome.damage_to(FOE), 44);
    assert_eq!(outcome.total_damage, 44);
    assert_eq!(arena.hp(FOE), MAX_HP - 44);
    assert!(outcome.logged(msg::USE_SKILL));
    assert!(outcome.logged(msg::DAMAGE));
    assert!(!outcome.logged(msg::CRITICAL));
    assert!(!outcome.logged(msg::SUPER_EFFECTIVE));
}

/// The same-element bonus applies once even when both of the user's
/// elements match.
#[tokio::test]
async fn same_element_bonus_applies_once() {
    let arena = Arena::new(content().with_skill(skill("ember", strike("fire"))))
        .with_character(
            hero().with_elements(&["fire", "fire"]).with_skill("ember", 10),
            0,
            0,
        )
        .with_character(foe(FOE), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("ember should be usable");
    let outcome = resolve(ctx, &env).await.expect("ember should resolve");

    // 44 * 4/3, truncated
    assert_eq!(outcome.damage_to(FOE), 58);
}

#[tokio::test]
async fn super_effective_hit_doubles_and_reports() {
    let arena = Arena::new(content().with_skill(skill("ember", strike("fire"))))
        .with_character(hero().with_skill("ember", 10), 0, 0)
        .with_character(foe(FOE).with_elements(&["grass"]), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("ember should be usable");
    let outcome = resolve(ctx, &env).await.expect("ember should resolve");

    assert_eq!(outcome.damage_to(FOE), 88);
    assert!(outcome.logged(msg::SUPER_EFFECTIVE));
}

/// One strong and one weak defending element cancel out.
#[tokio::test]
async fn dual_element_defender_combines_tiers() {
    let arena = Arena::new(content().with_skill(skill("ember", strike("fire"))))
        .with_character(hero().with_skill("ember", 10), 0, 0)
        .with_character(foe(FOE).with_elements(&["grass", "water"]), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("ember should be usable");
    let outcome = resolve(ctx, &env).await.expect("ember should resolve");

    assert_eq!(outcome.damage_to(FOE), 44);
    assert!(!outcome.logged(msg::SUPER_EFFECTIVE));
    assert!(!outcome.logged(msg::NOT_VERY_EFFECTIVE));
}

/// An immune defender takes nothing and no accumulator moves.
#[tokio::test]
async fn immune_defender_takes_no_damage() {
    let data = strike("normal").with_effect(Stage::AfterAction, 0, BattleEffect::Recoil {
        fraction: Ratio::new(1, 2),
    });
    let arena = Arena::new(content().with_skill(skill("tackle", data)))
        .with_character(hero().with_skill("tackle", 10), 0, 0)
        .with_character(foe(FOE).with_elements(&["ghost"]), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("tackle should be usable");
    let outcome = resolve(ctx, &env).await.expect("tackle should resolve");

    assert_eq!(outcome.damage_to(FOE), 0);
    assert_eq!(outcome.total_damage, 0);
    assert_eq!(arena.hp(FOE), MAX_HP);
    assert_eq!(arena.hp(HERO), MAX_HP, "nothing to recoil from");
    assert!(outcome.logged(msg::NO_EFFECT));
    assert!(!outcome.logged(msg::DAMAGE));
}

/// A critical hit multiplies by 3/2 and ignores the defender's raised
/// defense stage.
#[tokio::test]
async fn critical_hit_ignores_defense_boosts() {
    let guarded = foe(FOE).with_stages(StatStages {
        defense: 2,
        ..StatStages::default()
    });
    let arena = Arena::new(content().with_skill(skill("tackle", strike("normal"))))
        // crit draw 0, variance draw 10 -> 100%
        .with_rng(SequenceRng::new(vec![0, 10]))
        .with_character(hero().with_skill("tackle", 10), 0, 0)
        .with_character(guarded, 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("tackle should be usable");
    let outcome = resolve(ctx, &env).await.expect("tackle should resolve");

    assert!(outcome.logged(msg::CRITICAL));
    assert_eq!(outcome.damage_to(FOE), 66);
}

/// A precise critical hit multiplies by 9/4, and the user's lowered attack
/// stage counts as 0.
#[tokio::test]
async fn precise_critical_hit_ignores_lowered_attack() {
    let data = strike("normal").with_effect(Stage::OnHit, -1, BattleEffect::PreciseCrit);
    let weakened = hero().with_skill("tackle", 10).with_stages(StatStages {
        attack: -2,
        ..StatStages::default()
    });
    let arena = Arena::new(content().with_skill(skill("tackle", data)))
        // crit draw 0, variance draw 10 -> 100%
        .with_rng(SequenceRng::new(vec![0, 10]))
        .with_character(weakened, 0, 0)
        .with_character(foe(FOE), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("tackle should be usable");
    let outcome = resolve(ctx, &env).await.expect("tackle should resolve");

    assert!(outcome.logged(msg::CRITICAL));
    // 44 * 9 / 4
    assert_eq!(outcome.damage_to(FOE), 99);
}

/// A physical skill marked cross-category reads magic attack against magic
/// defense.
#[tokio::test]
async fn cross_category_uses_the_other_stat_pair() {
    let data = strike("normal").with_effect(Stage::OnHit, -1, BattleEffect::CrossCategory);
    let mystic = hero()
        .with_stats(StatBlock::new(100, 50, 200, 50, 10))
        .with_skill("psyblade", 10);
    let arena = Arena::new(content().with_skill(skill("psyblade", data)))
        .with_character(mystic, 0, 0)
        .with_character(foe(FOE), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("psyblade should be usable");
    let outcome = resolve(ctx, &env).await.expect("psyblade should resolve");

    // (22 * 200 * 80) / 80 / 50
    assert_eq!(outcome.damage_to(FOE), 88);
}

/// Once the damage multiplier collapses to zero the formula stops before
/// the crit and variance rolls.
#[tokio::test]
async fn neutralized_multiplier_draws_no_randomness() {
    let data = strike("normal").with_effect(
        Stage::OnHit,
        -1,
        BattleEffect::MultiplyDamage {
            factor: Ratio::ZERO,
        },
    );
    let arena = tackle_arena(data);
    let rng = SequenceRng::new(vec![0, 10]);
    let env = BattleEnv::with_all(
        &arena.roster,
        &arena.map,
        &arena.presenter,
        &rng,
        &arena.content,
    );

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("tackle should be usable");
    let outcome = resolve(ctx, &env).await.expect("tackle should resolve");

    assert_eq!(rng.draws(), 0);
    assert_eq!(outcome.damage_to(FOE), 0);
    assert_eq!(arena.hp(FOE), MAX_HP);
    assert!(!outcome.logged(msg::CRITICAL));
    assert!(!outcome.logged(msg::DAMAGE));
}

#[tokio::test]
async fn weak_hits_floor_at_one() {
    let arena = Arena::new(content().with_skill(skill("poke", strike("normal"))))
        .with_character(fighter(HERO, 0, 1, 10).with_skill("poke", 10), 0, 0)
        .with_character(fighter(FOE, 1, 10, 250), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("poke should be usable");
    let outcome = resolve(ctx, &env).await.expect("poke should resolve");

    assert_eq!(outcome.damage_to(FOE), 1);
}

#[tokio::test]
async fn zero_damage_placeholder_deals_nothing() {
    let data = BattleData::new("normal", Category::Physical, 0)
        .with_flags(DataFlags::ZERO_DAMAGE_PLACEHOLDER)
        .with_effect(Stage::OnHit, 0, BattleEffect::DamageFormula);
    let arena = tackle_arena(data);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("tackle should be usable");
    let outcome = resolve(ctx, &env).await.expect("tackle should resolve");

    assert_eq!(outcome.damage_to(FOE), 0);
    assert!(!outcome.logged(msg::DAMAGE));
    assert_eq!(arena.hp(FOE), MAX_HP);
}

#[tokio::test]
async fn status_category_never_deals_formula_damage() {
    let data = BattleData::new("normal", Category::Status, 80).with_effect(
        Stage::OnHit,
        0,
        BattleEffect::DamageFormula,
    );
    let arena = tackle_arena(data);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("tackle should be usable");
    let outcome = resolve(ctx, &env).await.expect("tackle should resolve");

    assert_eq!(outcome.damage_to(FOE), 0);
}

// ============================================================================
// Accuracy
// ============================================================================

/// A miss skips the hit stages but the action itself completes.
#[tokio::test]
async fn missed_hit_skips_on_hit_and_after_hit() {
    let data = strike("normal")
        .with_hit_rate(50)
        .with_effect(Stage::AfterHit, 0, message("test.after_hit"))
        .with_effect(Stage::AfterAction, 0, message("test.after_action"));
    let arena = tackle_arena(data).with_rng(SequenceRng::new(vec![60]));
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("tackle should be usable");
    let outcome = resolve(ctx, &env).await.expect("tackle should resolve");

    assert!(outcome.logged(msg::MISS));
    assert_eq!(outcome.damage_to(FOE), 0);
    assert_eq!(arena.test_keys(), vec!["test.after_action"]);
}

// ============================================================================
// Immunity passives
// ============================================================================

/// An absorbing defender neutralizes the hit before the formula runs and
/// heals instead.
#[tokio::test]
async fn absorbing_passive_heals_instead_of_hurting() {
    let sponge = passive(
        "sponge",
        PassiveHook::BeforeBeingHit,
        BattleEffect::ImmuneToElement {
            element: "water".into(),
            absorb: Some(Ratio::new(1, 4)),
        },
    );
    let arena = Arena::new(
        content()
            .with_skill(skill("splash", strike("water")))
            .with_status(sponge),
    )
    .with_character(hero().with_skill("splash", 10), 0, 0)
    .with_character(foe(FOE).with_hp(100).with_status("sponge"), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("splash should be usable");
    let outcome = resolve(ctx, &env).await.expect("splash should resolve");

    assert_eq!(outcome.damage_to(FOE), 0);
    assert_eq!(arena.hp(FOE), 150);
    assert!(outcome.logged(msg::ABSORB));
    assert!(!outcome.logged(msg::CRITICAL));
    assert!(
        outcome
            .changes
            .contains(&Change::Heal { target: FOE, amount: 50 })
    );
}

/// Immunity only protects its carrier; a bystander carrying it changes
/// nothing.
#[tokio::test]
async fn immunity_ignores_hits_on_others() {
    let sponge = passive(
        "sponge",
        PassiveHook::NearbyHit,
        BattleEffect::ImmuneToElement {
            element: "water".into(),
            absorb: None,
        },
    );
    let arena = Arena::new(
        content()
            .with_skill(skill("splash", strike("water")))
            .with_status(sponge),
    )
    .with_character(hero().with_skill("splash", 10), 0, 0)
    .with_character(foe(FOE), 1, 0)
    .with_character(foe(FOE_2).with_status("sponge"), 2, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("splash should be usable");
    let outcome = resolve(ctx, &env).await.expect("splash should resolve");

    assert_eq!(outcome.damage_to(FOE), 44);
}
