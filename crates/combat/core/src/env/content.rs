//! Content index: immutable skill, item and status definitions.
use std::collections::BTreeMap;

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::action::{BattleData, PriorityList};
use crate::config::BattleConfig;
use crate::effect::BattleEffect;
use crate::element::TypeChart;
use crate::ids::{ItemId, SkillId, StatusId};

/// Moment at which a passive (status or held item) joins the pipeline.
///
/// Hooks are named from the carrier's point of view: a character being hit
/// runs its `BeforeBeingHit` effects, a bystander near the target runs its
/// `NearbyHit` effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PassiveHook {
    BeforeTry,
    BeforeAction,
    OnAction,
    /// Carrier stands near a user who is about to act.
    NearbyAction,
    BeforeHitting,
    BeforeBeingHit,
    /// Carrier stands near a target that is about to be hit.
    NearbyHit,
    AfterHitting,
    AfterBeingHit,
    AfterAction,
}

/// Effect lists keyed by passive hook.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PassiveLists(BTreeMap<PassiveHook, PriorityList<BattleEffect>>);

impl PassiveLists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hook: PassiveHook) -> Option<&PriorityList<BattleEffect>> {
        self.0.get(&hook)
    }

    pub fn with(mut self, hook: PassiveHook, priority: i32, effect: BattleEffect) -> Self {
        self.0.entry(hook).or_default().add(priority, effect);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(PriorityList::is_empty)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillData {
    pub id: SkillId,
    pub name: String,
    /// Charges a freshly learned copy starts with.
    pub charges: u32,
    pub data: BattleData,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemData {
    pub id: ItemId,
    pub name: String,
    /// Data used when the item is consumed by its owner.
    #[cfg_attr(feature = "serde", serde(default))]
    pub use_data: Option<BattleData>,
    /// Data used when the item is thrown.
    #[cfg_attr(feature = "serde", serde(default))]
    pub throw_data: Option<BattleData>,
    /// Effects active while the item is held.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passive: PassiveLists,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusData {
    pub id: StatusId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub passive: PassiveLists,
}

/// Resolves identifiers to definitions. Never mutated during a battle.
pub trait ContentOracle: Send + Sync {
    fn config(&self) -> &BattleConfig;

    fn type_chart(&self) -> &TypeChart;

    fn skill(&self, id: &SkillId) -> Option<&SkillData>;

    fn item(&self, id: &ItemId) -> Option<&ItemData>;

    fn status(&self, id: &StatusId) -> Option<&StatusData>;
}
