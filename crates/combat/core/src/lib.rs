//! Combat resolution for a turn-based dungeon crawler.
//!
//! `combat-core` takes an initiated action (skill, item use, throw, trap),
//! runs its staged effect lists against a per-action [`ActionContext`], and
//! reports every HP, status, item, money and charge change plus the log lines
//! it emitted. Characters, the map, presentation, randomness and content are
//! reached only through the service traits in [`env`], bundled into a
//! [`BattleEnv`].
//!
//! Entry points are the `prepare_*` constructors and [`pipeline::resolve`].
pub mod action;
pub mod config;
pub mod damage;
pub mod effect;
pub mod element;
pub mod env;
pub mod error;
pub mod ids;
pub mod pipeline;
pub mod state;
pub mod stats;

pub use action::{
    ActionContext, ActionError, ActionKind, ActionOutcome, Alignment, BattleData, Change,
    DataFlags, DataOrigin, Explosion, ItemLocation, Phase, PriorityList, Stage, StageLists,
};
pub use config::BattleConfig;
pub use damage::{DamageOutcome, DamageReport, DamageSource};
pub use effect::{BattleEffect, Condition, EffectOwner};
pub use element::{Effectiveness, Tier, TypeChart};
pub use env::{
    AnimationCue, BattleEnv, CharacterSnapshot, ContentOracle, HpChange, ItemData, LogMessage,
    MapOracle, OracleError, PassiveHook, PassiveLists, PcgRng, Presenter, RngOracle,
    RosterOracle, SkillData, SkillSlot, StatusData,
};
pub use error::{CombatError, ErrorContext, ErrorSeverity};
pub use ids::{ElementId, EntityId, ItemId, MapStatusId, Position, SkillId, StatusId, TeamId};
pub use pipeline::{prepare_item, prepare_skill, prepare_throw, prepare_trap, resolve};
pub use state::StateStore;
pub use stats::{Category, CritTable, Ratio, StageTable, Stat, StatBlock, StatStages};
