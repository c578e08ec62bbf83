//! Stage ordering, live effect lists, multi-strike cancellation, catching
//! and presentation suspension.

mod common;

use combat_core::env::memory::PresentationEvent;
use combat_core::env::msg;
use combat_core::{
    BattleEffect, Category, Change, Condition, ItemData, ItemId, ItemLocation, MapOracle, PassiveHook,
    PassiveLists, Position, PriorityList, Stage, prepare_skill, prepare_throw, resolve,
};
use common::*;

// ============================================================================
// Dispatch order
// ============================================================================

/// Data, user, target and bystander lists merge by priority first and by
/// source second.
#[tokio::test]
async fn sources_interleave_by_priority_then_rank() {
    let data = strike("normal").with_effect(Stage::BeforeHit, 0, message("test.data"));
    let eager = status(
        "eager",
        PassiveLists::new()
            .with(PassiveHook::BeforeHitting, 0, message("test.user"))
            .with(PassiveHook::BeforeHitting, -1, message("test.user_early")),
    );
    let wary = passive("wary", PassiveHook::BeforeBeingHit, message("test.target"));
    let nosy = passive("nosy", PassiveHook::NearbyHit, message("test.bystander"));

    let arena = Arena::new(
        content()
            .with_skill(skill("tackle", data))
            .with_status(eager)
            .with_status(wary)
            .with_status(nosy),
    )
    .with_character(hero().with_skill("tackle", 10).with_status("eager"), 0, 0)
    .with_character(foe(FOE).with_status("wary"), 1, 0)
    .with_character(foe(FOE_2).with_status("nosy"), 2, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("tackle should be usable");
    resolve(ctx, &env).await.expect("tackle should resolve");

    assert_eq!(
        arena.test_keys(),
        vec![
            "test.user_early",
            "test.data",
            "test.user",
            "test.target",
            "test.bystander",
        ]
    );
}

/// Bystanders only react when they stand close to the hit.
#[tokio::test]
async fn distant_bystanders_stay_silent() {
    let nosy = passive("nosy", PassiveHook::NearbyHit, message("test.bystander"));
    let arena = Arena::new(
        content()
            .with_skill(skill("tackle", strike("normal")))
            .with_status(nosy),
    )
    .with_character(hero().with_skill("tackle", 10), 0, 0)
    .with_character(foe(FOE), 1, 0)
    .with_character(foe(FOE_2).with_status("nosy"), 5, 5);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("tackle should be usable");
    resolve(ctx, &env).await.expect("tackle should resolve");

    assert!(arena.test_keys().is_empty());
}

/// Replacing the running stage takes effect immediately: the old remainder
/// is gone and the new list continues after the current position.
#[tokio::test]
async fn replaced_stage_continues_from_current_position() {
    let replacement = PriorityList::new()
        .with(0, message("test.skipped"))
        .with(5, message("test.replaced"));
    let data = combat_core::BattleData::new("normal", Category::Physical, 80)
        .with_effect(
            Stage::OnHit,
            0,
            BattleEffect::ReplaceStage {
                stage: Stage::OnHit,
                effects: replacement,
            },
        )
        .with_effect(Stage::OnHit, 5, BattleEffect::DamageFormula);
    let arena = Arena::new(content().with_skill(skill("fizzle", data)))
        .with_character(hero().with_skill("fizzle", 10), 0, 0)
        .with_character(foe(FOE), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("fizzle should be usable");
    let outcome = resolve(ctx, &env).await.expect("fizzle should resolve");

    assert_eq!(arena.test_keys(), vec!["test.replaced"]);
    assert_eq!(outcome.damage_to(FOE), 0);
}

// ============================================================================
// Strikes
// ============================================================================

/// Cancelling during the second strike keeps the first strike's damage and
/// skips everything after the cancel.
#[tokio::test]
async fn cancel_mid_strike_keeps_earlier_damage() {
    let data = strike("normal")
        .with_strikes(3)
        .with_effect(
            Stage::BeforeHit,
            0,
            BattleEffect::Conditional {
                condition: Condition::StrikeAtLeast(1),
                then: vec![BattleEffect::Cancel { message: None }],
                otherwise: Vec::new(),
            },
        )
        .with_effect(Stage::AfterHit, 0, message("test.after_hit"))
        .with_effect(Stage::AfterAction, 0, message("test.after_action"));
    let arena = Arena::new(content().with_skill(skill("triple_kick", data)))
        .with_character(hero().with_skill("triple_kick", 10), 0, 0)
        .with_character(foe(FOE), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("triple kick should be usable");
    let outcome = resolve(ctx, &env).await.expect("triple kick should resolve");

    assert!(outcome.cancelled);
    assert_eq!(outcome.strikes, 2);
    assert_eq!(outcome.damage_to(FOE), 44);
    assert_eq!(arena.hp(FOE), MAX_HP - 44);
    assert_eq!(arena.test_keys(), vec!["test.after_hit"]);
}

#[tokio::test]
async fn every_strike_hits_again() {
    let data = strike("normal").with_strikes(3);
    let arena = Arena::new(content().with_skill(skill("triple_kick", data)))
        .with_character(hero().with_skill("triple_kick", 10), 0, 0)
        .with_character(foe(FOE), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("triple kick should be usable");
    let outcome = resolve(ctx, &env).await.expect("triple kick should resolve");

    assert!(!outcome.cancelled);
    assert_eq!(outcome.strikes, 3);
    assert_eq!(outcome.damage_to(FOE), 132);
    assert_eq!(outcome.total_damage, 132);
}

/// Strikes stop once nobody is left standing.
#[tokio::test]
async fn strikes_stop_after_knockout() {
    let data = strike("normal").with_strikes(3);
    let arena = Arena::new(content().with_skill(skill("triple_kick", data)))
        .with_character(hero().with_skill("triple_kick", 10), 0, 0)
        .with_character(foe(FOE).with_hp(50), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("triple kick should be usable");
    let outcome = resolve(ctx, &env).await.expect("triple kick should resolve");

    assert_eq!(outcome.damage_to(FOE), 50);
    assert_eq!(outcome.knockouts, 1);
    assert!(outcome.changes.contains(&Change::Knockout { target: FOE }));
    assert!(outcome.logged(msg::KNOCKOUT));
}

/// An area hit resets per-target state, so every target takes full damage.
#[tokio::test]
async fn area_hit_damages_each_matching_target() {
    let data = strike("normal").with_explosion(combat_core::Explosion::area(
        1,
        combat_core::Alignment::Foe,
    ));
    let arena = Arena::new(content().with_skill(skill("quake", data)))
        .with_character(hero().with_skill("quake", 10), 0, 0)
        .with_character(foe(FOE), 1, 0)
        .with_character(foe(FOE_2), 2, 0)
        .with_character(fighter(ALLY, 0, 50, 80), 1, 1);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("quake should be usable");
    let outcome = resolve(ctx, &env).await.expect("quake should resolve");

    assert_eq!(outcome.damage_to(FOE), 44);
    assert_eq!(outcome.damage_to(FOE_2), 44);
    assert_eq!(outcome.damage_to(ALLY), 0);
    assert_eq!(outcome.damage_to(HERO), 0);
    assert_eq!(outcome.total_damage, 88);
}

// ============================================================================
// Thrown items
// ============================================================================

fn rock() -> ItemData {
    ItemData {
        throw_data: Some(strike("normal")),
        ..item("rock")
    }
}

fn catcher() -> combat_core::StatusData {
    passive("catcher", PassiveHook::BeforeBeingHit, BattleEffect::CatchItem)
}

/// A caught throw deals no damage and the item ends up held by the catcher.
#[tokio::test]
async fn caught_throw_hands_item_to_catcher() {
    let arena = Arena::new(content().with_item(rock()).with_status(catcher()))
        .with_character(hero().with_inventory(&["rock"], 8), 0, 0)
        .with_character(foe(FOE).with_status("catcher"), 1, 0);
    let env = arena.env();

    let ctx = prepare_throw(&env, HERO, &"rock".into(), FOE).expect("rock should be throwable");
    let outcome = resolve(ctx, &env).await.expect("throw should resolve");

    assert_eq!(outcome.damage_to(FOE), 0);
    assert!(outcome.logged(msg::CATCH));
    assert!(!outcome.logged(msg::ITEM_LANDED));
    assert_eq!(arena.character(FOE).held_item, Some("rock".into()));
    assert!(arena.character(HERO).inventory.is_empty());
    assert!(outcome.changes.contains(&Change::ItemMoved {
        item: "rock".into(),
        from: ItemLocation::Inventory(HERO),
        to: ItemLocation::Held(FOE),
    }));
}

/// A catcher with no room lets the item slide to its feet.
#[tokio::test]
async fn caught_throw_slides_when_catcher_is_full() {
    let arena = Arena::new(
        content()
            .with_item(rock())
            .with_item(item("berry"))
            .with_status(catcher()),
    )
    .with_character(hero().with_inventory(&["rock"], 8), 0, 0)
    .with_character(
        foe(FOE)
            .with_status("catcher")
            .with_held_item("berry")
            .with_inventory(&[], 0),
        1,
        0,
    );
    let env = arena.env();

    let ctx = prepare_throw(&env, HERO, &"rock".into(), FOE).expect("rock should be throwable");
    let outcome = resolve(ctx, &env).await.expect("throw should resolve");

    assert!(outcome.logged(msg::CATCH));
    assert!(outcome.logged(msg::ITEM_SLID));
    assert_eq!(arena.map.items_at(Position::new(1, 0)), vec![ItemId::new("rock")]);
}

#[tokio::test]
async fn uncaught_throw_lands_at_target() {
    let arena = Arena::new(content().with_item(rock()))
        .with_character(hero().with_inventory(&["rock"], 8), 0, 0)
        .with_character(foe(FOE), 1, 0);
    let env = arena.env();

    let ctx = prepare_throw(&env, HERO, &"rock".into(), FOE).expect("rock should be throwable");
    let outcome = resolve(ctx, &env).await.expect("throw should resolve");

    assert_eq!(outcome.damage_to(FOE), 44);
    assert!(outcome.logged(msg::ITEM_LANDED));
    assert_eq!(arena.map.items_at(Position::new(1, 0)), vec![ItemId::new("rock")]);
    assert!(arena.character(HERO).inventory.is_empty());
}

// ============================================================================
// Suspension
// ============================================================================

/// Effects after a blocking animation or wait only run once it finished.
#[tokio::test]
async fn blocking_presentation_finishes_before_next_effect() {
    let data = combat_core::BattleData::new("normal", Category::Status, 0)
        .with_effect(Stage::OnHit, 0, message("test.before"))
        .with_effect(
            Stage::OnHit,
            1,
            BattleEffect::Animation {
                animation: "slash".into(),
                wait: true,
            },
        )
        .with_effect(Stage::OnHit, 2, BattleEffect::Wait { frames: 12 })
        .with_effect(Stage::OnHit, 3, message("test.after"));
    let arena = Arena::new(content().with_skill(skill("flourish", data)))
        .with_character(hero().with_skill("flourish", 10), 0, 0)
        .with_character(foe(FOE), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("flourish should be usable");
    resolve(ctx, &env).await.expect("flourish should resolve");

    let trace: Vec<String> = arena
        .presenter
        .events()
        .into_iter()
        .filter_map(|event| match event {
            PresentationEvent::Log(m) if m.key.starts_with("test.") => Some(m.key),
            PresentationEvent::AnimationStarted(_) => Some("started".to_string()),
            PresentationEvent::AnimationFinished(_) => Some("finished".to_string()),
            PresentationEvent::Waited(frames) => Some(format!("waited {frames}")),
            _ => None,
        })
        .collect();
    assert_eq!(
        trace,
        vec!["test.before", "started", "finished", "waited 12", "test.after"]
    );
}

/// A fire-and-forget animation never reports completion to the pipeline.
#[tokio::test]
async fn non_blocking_animation_only_starts() {
    let data = combat_core::BattleData::new("normal", Category::Status, 0).with_effect(
        Stage::OnAction,
        0,
        BattleEffect::Animation {
            animation: "sparkle".into(),
            wait: false,
        },
    );
    let arena = Arena::new(content().with_skill(skill("sparkle", data)))
        .with_character(hero().with_skill("sparkle", 10), 0, 0)
        .with_character(foe(FOE), 1, 0);
    let env = arena.env();

    let ctx = prepare_skill(&env, HERO, 0, FOE).expect("sparkle should be usable");
    resolve(ctx, &env).await.expect("sparkle should resolve");

    let events = arena.presenter.events();
    assert!(
        events
            .iter()
            .any(|e| matches!(e, PresentationEvent::AnimationStarted(_)))
    );
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, PresentationEvent::AnimationFinished(_)))
    );
}
