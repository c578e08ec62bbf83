//! The data shipped with the crate loads cleanly and resolves real actions.

use std::path::PathBuf;

use combat_content::{ContentFactory, ContentRegistry, Scenario};
use combat_core::env::memory::{FixedRng, MemoryMap, MemoryRoster, RecordingPresenter};
use combat_core::env::msg;
use combat_core::{BattleEnv, ContentOracle, EntityId, LogMessage, prepare_skill, resolve};

fn factory() -> ContentFactory {
    ContentFactory::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"))
}

fn registry() -> ContentRegistry {
    factory().load_registry().expect("bundled content should load")
}

fn duel() -> Scenario {
    factory()
        .load_scenario("duel")
        .expect("bundled scenario should load")
}

#[test]
fn bundled_content_has_no_dangling_references() {
    let registry = registry();

    assert!(registry.skill_count() > 10);
    assert!(registry.item(&"potion".into()).is_some());
    assert!(registry.status(&"guardian".into()).is_some());
    let issues = registry.validate();
    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn bundled_config_matches_stock_rules() {
    let config = factory().load_config().expect("config should load");
    assert_eq!(config, combat_core::BattleConfig::default());
}

#[test]
fn every_engine_message_has_a_template() {
    let messages = factory().load_messages().expect("messages should load");
    let keys = [
        msg::USE_SKILL,
        msg::USE_ITEM,
        msg::THROW_ITEM,
        msg::TRAP,
        msg::DAMAGE,
        msg::HEAL,
        msg::KNOCKOUT,
        msg::CRITICAL,
        msg::SUPER_EFFECTIVE,
        msg::NOT_VERY_EFFECTIVE,
        msg::NO_EFFECT,
        msg::MISS,
        msg::ABSORB,
        msg::RECOIL,
        msg::COUNTER,
        msg::DRAIN,
        msg::SNATCH,
        msg::DRAW,
        msg::COVER,
        msg::PASS,
        msg::STATUS_ADDED,
        msg::STATUS_REMOVED,
        msg::STAT_BOOST,
        msg::CATCH,
        msg::ITEM_SLID,
        msg::ITEM_LANDED,
        msg::STEAL,
        msg::MONEY_DROPPED,
        msg::CHARGES_RESTORED,
        msg::SKILL_LEARNED,
        msg::WEATHER_SET,
        msg::WEATHER_CLEARED,
        msg::FAILED,
    ];

    let missing: Vec<&str> = keys
        .into_iter()
        .filter(|key| messages.template(key).is_none())
        .collect();
    assert!(missing.is_empty(), "no template for {missing:?}");

    let line = messages.format(&LogMessage::new(msg::COVER).arg("Pip").arg("Ash"));
    assert_eq!(line, "Pip took the hit for Ash!");
}

#[test]
fn duel_places_every_scripted_character() {
    let scenario = duel();

    assert_eq!(scenario.characters.len(), 3);
    assert!(scenario.missing_characters().is_empty());
    assert_eq!(scenario.seed, Some(20240611));
}

#[tokio::test]
async fn bundled_ember_is_super_effective_on_grass() {
    let registry = registry();
    let scenario = duel();
    let roster = MemoryRoster::new();
    let map = MemoryMap::new();
    for placement in &scenario.characters {
        map.place(placement.character.id, placement.position);
        roster.insert(placement.character.clone());
    }
    let presenter = RecordingPresenter::new();
    let rng = FixedRng(10);
    let env = BattleEnv::with_all(&roster, &map, &presenter, &rng, &registry);

    let (ash, bram) = (EntityId(1), EntityId(3));
    let ctx = prepare_skill(&env, ash, 0, bram).expect("ember should be usable");
    let outcome = resolve(ctx, &env).await.expect("ember should resolve");

    assert!(outcome.logged(msg::SUPER_EFFECTIVE));
    assert!(outcome.damage_to(bram) > 0);
    assert!(outcome.logged(msg::COUNTER), "Bram is vengeful");
}
