//! Shared fixtures for the end-to-end combat tests.
#![allow(dead_code)]

use combat_core::env::memory::{
    FixedRng, MemoryMap, MemoryRoster, RecordingPresenter, StaticContent,
};
use combat_core::{
    BattleConfig, BattleData, BattleEffect, BattleEnv, Category, CharacterSnapshot, Effectiveness,
    ElementId, EntityId, ItemData, PassiveHook, PassiveLists, Position, RngOracle, RosterOracle,
    SkillData, Stage, StatBlock, StatusData, TeamId, TypeChart,
};

pub const HERO: EntityId = EntityId(1);
pub const FOE: EntityId = EntityId(2);
pub const ALLY: EntityId = EntityId(3);
pub const FOE_2: EntityId = EntityId(4);
pub const BYSTANDER: EntityId = EntityId(5);

pub const MAX_HP: u32 = 200;

/// Services for one test battle. `FixedRng(10)` by default: no critical
/// hits, maximum variance, and every accuracy check above 10% passes.
pub struct Arena {
    pub roster: MemoryRoster,
    pub map: MemoryMap,
    pub presenter: RecordingPresenter,
    pub rng: Box<dyn RngOracle>,
    pub content: StaticContent,
}

impl Arena {
    pub fn new(content: StaticContent) -> Self {
        Self {
            roster: MemoryRoster::new(),
            map: MemoryMap::new(),
            presenter: RecordingPresenter::new(),
            rng: Box::new(FixedRng(10)),
            content,
        }
    }

    pub fn with_rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_character(self, character: CharacterSnapshot, x: i32, y: i32) -> Self {
        self.map.place(character.id, Position::new(x, y));
        self.roster.insert(character);
        self
    }

    pub fn env(&self) -> BattleEnv<'_> {
        BattleEnv::with_all(
            &self.roster,
            &self.map,
            &self.presenter,
            self.rng.as_ref(),
            &self.content,
        )
    }

    pub fn character(&self, id: EntityId) -> CharacterSnapshot {
        self.roster.character(id).expect("character should exist")
    }

    pub fn hp(&self, id: EntityId) -> u32 {
        self.character(id).hp
    }

    /// Logged keys under the `test.` namespace, in order.
    pub fn test_keys(&self) -> Vec<String> {
        self.presenter
            .keys()
            .into_iter()
            .filter(|key| key.starts_with("test."))
            .collect()
    }
}

pub fn chart() -> TypeChart {
    let elements = ["normal", "fire", "water", "grass", "electric", "ghost"]
        .into_iter()
        .map(ElementId::new)
        .collect();
    TypeChart::new(elements)
        .with_matchup("fire", "grass", Effectiveness::SuperEffective)
        .with_matchup("fire", "water", Effectiveness::NotVeryEffective)
        .with_matchup("water", "fire", Effectiveness::SuperEffective)
        .with_matchup("electric", "water", Effectiveness::SuperEffective)
        .with_matchup("normal", "ghost", Effectiveness::NoEffect)
}

pub fn content() -> StaticContent {
    StaticContent::new(BattleConfig::default(), chart())
}

/// Level-50 fighter with 200 max HP, no elements and no stages.
pub fn fighter(id: EntityId, team: u16, attack: u32, defense: u32) -> CharacterSnapshot {
    CharacterSnapshot::new(id, TeamId(team), 50, MAX_HP)
        .with_name(format!("fighter{}", id.0))
        .with_stats(StatBlock::new(attack, defense, attack, defense, 10))
}

/// The reference attacker: attack 100.
pub fn hero() -> CharacterSnapshot {
    fighter(HERO, 0, 100, 50)
}

/// The reference defender: defense 80.
pub fn foe(id: EntityId) -> CharacterSnapshot {
    fighter(id, 1, 50, 80)
}

pub fn skill(id: &str, data: BattleData) -> SkillData {
    SkillData {
        id: id.into(),
        name: id.replace('_', " "),
        charges: 10,
        data,
    }
}

pub fn status(id: &str, passive: PassiveLists) -> StatusData {
    StatusData {
        id: id.into(),
        name: id.replace('_', " "),
        passive,
    }
}

pub fn item(id: &str) -> ItemData {
    ItemData {
        id: id.into(),
        name: id.replace('_', " "),
        use_data: None,
        throw_data: None,
        passive: PassiveLists::new(),
    }
}

/// Status carrying a single passive effect.
pub fn passive(id: &str, hook: PassiveHook, effect: BattleEffect) -> StatusData {
    status(id, PassiveLists::new().with(hook, 0, effect))
}

/// Power-80 physical hit: 44 damage from [`hero`] to [`foe`].
pub fn strike(element: &str) -> BattleData {
    BattleData::new(element, Category::Physical, 80).with_effect(
        Stage::OnHit,
        0,
        BattleEffect::DamageFormula,
    )
}

pub fn message(key: &str) -> BattleEffect {
    BattleEffect::Message {
        key: key.to_string(),
    }
}
