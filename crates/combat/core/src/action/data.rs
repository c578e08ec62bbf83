//! Effective data of a skill, item or trap.
use std::collections::BTreeMap;

use bitflags::bitflags;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::effect::BattleEffect;
use crate::ids::{ElementId, ItemId, SkillId};
use crate::stats::Category;

use super::priority::PriorityList;

/// Named resolution stage, in execution order.
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
pub enum Stage {
    /// Before the action is committed; cancelling here refunds nothing
    /// because nothing was spent yet.
    BeforeTry,
    BeforeAction,
    OnAction,
    /// Once per strike, before targets are gathered.
    BeforeExplosion,
    /// Once per target, before the accuracy check.
    BeforeHit,
    OnHit,
    /// Once per strike, after every target, against the aimed tile. Skipped
    /// once a thrown item has been caught.
    OnHitTile,
    AfterHit,
    AfterAction,
}

impl Stage {
    pub const fn phase(self) -> Phase {
        match self {
            Stage::BeforeTry => Phase::Prepare,
            Stage::BeforeAction | Stage::OnAction => Phase::PreHit,
            Stage::BeforeExplosion => Phase::Strike,
            Stage::BeforeHit | Stage::OnHit | Stage::OnHitTile | Stage::AfterHit => Phase::Hit,
            Stage::AfterAction => Phase::Cleanup,
        }
    }
}

/// State machine phase a stage belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Prepare,
    PreHit,
    Strike,
    Hit,
    Cleanup,
}

bitflags! {
    /// Static properties of a skill or item.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct DataFlags: u16 {
        /// The user touches the target.
        const CONTACT = 1 << 0;
        const SOUND = 1 << 1;
        /// Formula damage is not floored at the minimum.
        const ZERO_DAMAGE_PLACEHOLDER = 1 << 2;
        /// Cannot be snatched or reflected by redirection effects.
        const NO_REDIRECT = 1 << 3;
    }
}

/// Where the effective data came from. Survives wholesale data replacement.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataOrigin {
    #[default]
    Anonymous,
    Skill(SkillId),
    Item(ItemId),
    Trap(SkillId),
}

/// Which characters around the impact point an explosion reaches.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    /// Characters on another team than the user.
    #[default]
    Foe,
    /// Characters on the user's team, the user included.
    Friend,
    /// Everyone but the user.
    Any,
    /// The user only.
    SelfOnly,
}

/// Hitbox geometry around the primary target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Explosion {
    /// Zero hits only the primary target.
    pub radius: u32,
    pub alignment: Alignment,
}

impl Explosion {
    pub const fn single(alignment: Alignment) -> Self {
        Self {
            radius: 0,
            alignment,
        }
    }

    pub const fn area(radius: u32, alignment: Alignment) -> Self {
        Self { radius, alignment }
    }
}

/// Effect lists keyed by stage.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StageLists(BTreeMap<Stage, PriorityList<BattleEffect>>);

impl StageLists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stage: Stage) -> Option<&PriorityList<BattleEffect>> {
        self.0.get(&stage)
    }

    /// Live list for `stage`, created empty when absent.
    pub fn list_mut(&mut self, stage: Stage) -> &mut PriorityList<BattleEffect> {
        self.0.entry(stage).or_default()
    }

    pub fn add(&mut self, stage: Stage, priority: i32, effect: BattleEffect) {
        self.list_mut(stage).add(priority, effect);
    }

    /// Swaps the whole list of `stage`, returning the previous one.
    pub fn replace(
        &mut self,
        stage: Stage,
        list: PriorityList<BattleEffect>,
    ) -> Option<PriorityList<BattleEffect>> {
        self.0.insert(stage, list)
    }

    pub fn clear(&mut self, stage: Stage) {
        self.0.remove(&stage);
    }
}

/// The mutable definition an action resolves with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleData {
    #[cfg_attr(feature = "serde", serde(skip))]
    pub origin: DataOrigin,
    pub element: ElementId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Category,
    #[cfg_attr(feature = "serde", serde(default))]
    pub power: u32,
    /// Percentage chance to hit before stage scaling. `None` never misses.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hit_rate: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default = "BattleData::default_strikes"))]
    pub strikes: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub explosion: Explosion,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: DataFlags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stages: StageLists,
}

impl BattleData {
    pub fn new(element: impl Into<ElementId>, category: Category, power: u32) -> Self {
        Self {
            origin: DataOrigin::Anonymous,
            element: element.into(),
            category,
            power,
            hit_rate: None,
            strikes: Self::default_strikes(),
            explosion: Explosion::default(),
            flags: DataFlags::empty(),
            stages: StageLists::new(),
        }
    }

    pub const fn default_strikes() -> u32 {
        1
    }

    pub fn with_origin(mut self, origin: DataOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_hit_rate(mut self, hit_rate: u32) -> Self {
        self.hit_rate = Some(hit_rate);
        self
    }

    pub fn with_strikes(mut self, strikes: u32) -> Self {
        self.strikes = strikes;
        self
    }

    pub fn with_explosion(mut self, explosion: Explosion) -> Self {
        self.explosion = explosion;
        self
    }

    pub fn with_flags(mut self, flags: DataFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_effect(mut self, stage: Stage, priority: i32, effect: BattleEffect) -> Self {
        self.stages.add(stage, priority, effect);
        self
    }

    /// Replaces everything except the origin tag.
    pub fn replace_keeping_origin(&mut self, replacement: BattleData) {
        let origin = std::mem::take(&mut self.origin);
        *self = replacement;
        self.origin = origin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_sort_in_execution_order() {
        assert!(Stage::BeforeTry < Stage::OnAction);
        assert!(Stage::BeforeHit < Stage::OnHit);
        assert!(Stage::AfterHit < Stage::AfterAction);
        assert_eq!(Stage::OnHitTile.phase(), Phase::Hit);
        assert_eq!(Stage::BeforeExplosion.phase(), Phase::Strike);
    }

    #[test]
    fn replacement_keeps_origin() {
        let mut data = BattleData::new("fire", Category::Magical, 90)
            .with_origin(DataOrigin::Skill(SkillId::new("flamethrower")));
        data.replace_keeping_origin(BattleData::new("water", Category::Physical, 40));

        assert_eq!(data.origin, DataOrigin::Skill(SkillId::new("flamethrower")));
        assert_eq!(data.element, ElementId::new("water"));
        assert_eq!(data.power, 40);
    }

    #[test]
    fn stage_lists_replace_whole_list() {
        let mut lists = StageLists::new();
        lists.add(Stage::OnHit, 0, BattleEffect::DamageFormula);
        lists.add(Stage::OnHit, 5, BattleEffect::LevelDamage);

        let previous =
            lists.replace(Stage::OnHit, PriorityList::single(0, BattleEffect::CatchItem));
        assert_eq!(previous.map(|l| l.len()), Some(2));
        assert_eq!(lists.get(Stage::OnHit).map(PriorityList::len), Some(1));

        lists.clear(Stage::OnHit);
        assert!(lists.get(Stage::OnHit).is_none());
    }
}
