//! Services the engine consumes.
//!
//! The engine owns no characters, maps or content. Everything it reads or
//! mutates outside the action context goes through the traits in this module,
//! bundled into a [`BattleEnv`] that is handed to every action.
mod content;
mod error;
mod map;
pub mod memory;
mod presenter;
mod rng;
mod roster;

pub use content::{ContentOracle, ItemData, PassiveHook, PassiveLists, SkillData, StatusData};
pub use error::OracleError;
pub use map::MapOracle;
pub use presenter::{AnimationCue, LogMessage, Presenter, msg};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use roster::{
    CharacterSnapshot, HpChange, MAX_ELEMENTS, MAX_SKILLS, RosterOracle, SkillSlot,
};

use crate::ids::{EntityId, ItemId, SkillId};

/// Aggregates the services an action resolves against.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    roster: Option<&'a dyn RosterOracle>,
    map: Option<&'a dyn MapOracle>,
    presenter: Option<&'a dyn Presenter>,
    rng: Option<&'a dyn RngOracle>,
    content: Option<&'a dyn ContentOracle>,
}

impl<'a> BattleEnv<'a> {
    pub fn new(
        roster: Option<&'a dyn RosterOracle>,
        map: Option<&'a dyn MapOracle>,
        presenter: Option<&'a dyn Presenter>,
        rng: Option<&'a dyn RngOracle>,
        content: Option<&'a dyn ContentOracle>,
    ) -> Self {
        Self {
            roster,
            map,
            presenter,
            rng,
            content,
        }
    }

    pub fn with_all(
        roster: &'a dyn RosterOracle,
        map: &'a dyn MapOracle,
        presenter: &'a dyn Presenter,
        rng: &'a dyn RngOracle,
        content: &'a dyn ContentOracle,
    ) -> Self {
        Self::new(
            Some(roster),
            Some(map),
            Some(presenter),
            Some(rng),
            Some(content),
        )
    }

    pub fn empty() -> Self {
        Self::new(None, None, None, None, None)
    }

    /// # Errors
    ///
    /// Returns `OracleError::RosterNotAvailable` if no roster was provided.
    pub fn roster(&self) -> Result<&'a dyn RosterOracle, OracleError> {
        self.roster.ok_or(OracleError::RosterNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::MapNotAvailable` if no map was provided.
    pub fn map(&self) -> Result<&'a dyn MapOracle, OracleError> {
        self.map.ok_or(OracleError::MapNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::PresenterNotAvailable` if no presenter was provided.
    pub fn presenter(&self) -> Result<&'a dyn Presenter, OracleError> {
        self.presenter.ok_or(OracleError::PresenterNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no random source was provided.
    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::ContentNotAvailable` if no content index was provided.
    pub fn content(&self) -> Result<&'a dyn ContentOracle, OracleError> {
        self.content.ok_or(OracleError::ContentNotAvailable)
    }

    /// Display name for log lines; falls back to the raw id.
    pub fn name_of(&self, id: EntityId) -> String {
        self.roster
            .and_then(|roster| roster.character(id))
            .map(|c| c.name)
            .unwrap_or_else(|| id.to_string())
    }

    /// Display name of a skill; falls back to the raw id.
    pub fn skill_name(&self, skill: &SkillId) -> String {
        self.content
            .and_then(|content| content.skill(skill))
            .map(|data| data.name.clone())
            .unwrap_or_else(|| skill.to_string())
    }

    /// Display name of an item; falls back to the raw id.
    pub fn item_name(&self, item: &ItemId) -> String {
        self.content
            .and_then(|content| content.item(item))
            .map(|data| data.name.clone())
            .unwrap_or_else(|| item.to_string())
    }
}

impl std::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("roster", &self.roster.is_some())
            .field("map", &self.map.is_some())
            .field("presenter", &self.presenter.is_some())
            .field("rng", &self.rng.is_some())
            .field("content", &self.content.is_some())
            .finish()
    }
}
