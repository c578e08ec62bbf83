//! Presentation service: player-facing log, sounds and animations.
//!
//! The async methods are the suspension points of an action. The pipeline
//! awaits each one before running the next effect, so presentation never
//! interleaves with other effects.
use std::fmt;

use async_trait::async_trait;

use crate::ids::EntityId;

/// A localizable log line: a template key plus positional arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogMessage {
    pub key: String,
    pub args: Vec<String>,
}

impl LogMessage {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            args: Vec::new(),
        }
    }

    /// Builder: append a positional argument.
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.args.push(value.to_string());
        self
    }
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)?;
        if !self.args.is_empty() {
            write!(f, "({})", self.args.join(", "))?;
        }
        Ok(())
    }
}

/// An animation between two characters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationCue {
    pub animation: String,
    pub origin: EntityId,
    pub target: EntityId,
}

#[async_trait]
pub trait Presenter: Send + Sync {
    /// Emits a log line (fire-and-continue).
    fn log(&self, message: &LogMessage);

    /// Triggers a sound (fire-and-continue).
    fn play_sound(&self, sound: &str);

    /// Starts an animation without waiting for it.
    fn start_animation(&self, cue: &AnimationCue);

    /// Plays an animation and resolves when it has finished.
    async fn play_animation(&self, cue: &AnimationCue);

    /// Resolves after `frames` frames.
    async fn wait_frames(&self, frames: u32);
}

/// Template keys of every message the engine emits.
pub mod msg {
    pub const USE_SKILL: &str = "battle.use_skill";
    pub const USE_ITEM: &str = "battle.use_item";
    pub const THROW_ITEM: &str = "battle.throw_item";
    pub const TRAP: &str = "battle.trap";
    pub const DAMAGE: &str = "battle.damage";
    pub const HEAL: &str = "battle.heal";
    pub const KNOCKOUT: &str = "battle.knockout";
    pub const CRITICAL: &str = "battle.critical";
    pub const SUPER_EFFECTIVE: &str = "battle.super_effective";
    pub const NOT_VERY_EFFECTIVE: &str = "battle.not_very_effective";
    pub const NO_EFFECT: &str = "battle.no_effect";
    pub const MISS: &str = "battle.miss";
    pub const ABSORB: &str = "battle.absorb";
    pub const RECOIL: &str = "battle.recoil";
    pub const COUNTER: &str = "battle.counter";
    pub const DRAIN: &str = "battle.drain";
    pub const SNATCH: &str = "battle.snatch";
    pub const DRAW: &str = "battle.draw";
    pub const COVER: &str = "battle.cover";
    pub const PASS: &str = "battle.pass";
    pub const STATUS_ADDED: &str = "battle.status_added";
    pub const STATUS_REMOVED: &str = "battle.status_removed";
    pub const STAT_BOOST: &str = "battle.stat_boost";
    pub const CATCH: &str = "battle.catch";
    pub const ITEM_SLID: &str = "battle.item_slid";
    pub const ITEM_LANDED: &str = "battle.item_landed";
    pub const STEAL: &str = "battle.steal";
    pub const MONEY_DROPPED: &str = "battle.money_dropped";
    pub const CHARGES_RESTORED: &str = "battle.charges_restored";
    pub const SKILL_LEARNED: &str = "battle.skill_learned";
    pub const WEATHER_SET: &str = "battle.weather_set";
    pub const WEATHER_CLEARED: &str = "battle.weather_cleared";
    pub const FAILED: &str = "battle.failed";
}
