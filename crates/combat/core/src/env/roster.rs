//! Character/party service.
//!
//! Reads return owned snapshots; every mutation goes through an explicit
//! async command so the pipeline can await it as a suspension point.
use arrayvec::ArrayVec;
use async_trait::async_trait;

use crate::ids::{ElementId, EntityId, ItemId, SkillId, StatusId, TeamId};
use crate::stats::{StatBlock, StatStages};

/// Maximum number of skills a character knows.
pub const MAX_SKILLS: usize = 4;

/// Maximum number of elements a character has.
pub const MAX_ELEMENTS: usize = 2;

/// A learned skill and its remaining charges.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSlot {
    pub skill: SkillId,
    pub charges: u32,
    pub max_charges: u32,
}

impl SkillSlot {
    pub fn new(skill: impl Into<SkillId>, charges: u32) -> Self {
        Self {
            skill: skill.into(),
            charges,
            max_charges: charges,
        }
    }
}

/// Point-in-time view of a character.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSnapshot {
    pub id: EntityId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub team: TeamId,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub stats: StatBlock,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stages: StatStages,
    pub elements: ArrayVec<ElementId, MAX_ELEMENTS>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: ArrayVec<SkillSlot, MAX_SKILLS>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub statuses: Vec<StatusId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub held_item: Option<ItemId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Vec<ItemId>,
    #[cfg_attr(
        feature = "serde",
        serde(default = "CharacterSnapshot::default_inventory_capacity")
    )]
    pub inventory_capacity: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub money: u32,
}

impl CharacterSnapshot {
    pub const fn default_inventory_capacity() -> usize {
        8
    }

    /// Full-health character with zeroed stats.
    pub fn new(id: EntityId, team: TeamId, level: u32, max_hp: u32) -> Self {
        Self {
            id,
            name: format!("{id}"),
            team,
            level,
            hp: max_hp,
            max_hp,
            stats: StatBlock::default(),
            stages: StatStages::default(),
            elements: ArrayVec::new(),
            skills: ArrayVec::new(),
            statuses: Vec::new(),
            held_item: None,
            inventory: Vec::new(),
            inventory_capacity: Self::default_inventory_capacity(),
            money: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp.min(self.max_hp);
        self
    }

    pub fn with_stats(mut self, stats: StatBlock) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_stages(mut self, stages: StatStages) -> Self {
        self.stages = stages;
        self
    }

    /// Sets up to [`MAX_ELEMENTS`] elements; extras are ignored.
    pub fn with_elements(mut self, elements: &[&str]) -> Self {
        self.elements = elements
            .iter()
            .take(MAX_ELEMENTS)
            .map(|e| ElementId::new(*e))
            .collect();
        self
    }

    /// Learns a skill into the next free slot; ignored when all slots are used.
    pub fn with_skill(mut self, skill: impl Into<SkillId>, charges: u32) -> Self {
        let _ = self.skills.try_push(SkillSlot::new(skill, charges));
        self
    }

    pub fn with_status(mut self, status: impl Into<StatusId>) -> Self {
        self.statuses.push(status.into());
        self
    }

    pub fn with_held_item(mut self, item: impl Into<ItemId>) -> Self {
        self.held_item = Some(item.into());
        self
    }

    pub fn with_inventory(mut self, items: &[&str], capacity: usize) -> Self {
        self.inventory = items.iter().map(|i| ItemId::new(*i)).collect();
        self.inventory_capacity = capacity;
        self
    }

    pub fn with_money(mut self, money: u32) -> Self {
        self.money = money;
        self
    }

    pub fn is_knocked_out(&self) -> bool {
        self.hp == 0
    }

    pub fn is_ally(&self, other: &CharacterSnapshot) -> bool {
        self.team == other.team
    }

    pub fn has_element(&self, element: &ElementId) -> bool {
        self.elements.iter().any(|e| e == element)
    }

    pub fn has_status(&self, status: &StatusId) -> bool {
        self.statuses.iter().any(|s| s == status)
    }

    pub fn inventory_full(&self) -> bool {
        self.inventory.len() >= self.inventory_capacity
    }

    pub fn skill(&self, slot: usize) -> Option<&SkillSlot> {
        self.skills.get(slot)
    }
}

/// HP before and after a damage or heal command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HpChange {
    pub before: u32,
    pub after: u32,
}

impl HpChange {
    pub const fn amount(&self) -> u32 {
        self.before.abs_diff(self.after)
    }

    pub const fn knocked_out(&self) -> bool {
        self.before > 0 && self.after == 0
    }
}

#[async_trait]
pub trait RosterOracle: Send + Sync {
    fn character(&self, id: EntityId) -> Option<CharacterSnapshot>;

    /// Removes up to `amount` HP. `None` when the character is unknown.
    async fn inflict_damage(&self, id: EntityId, amount: u32) -> Option<HpChange>;

    /// Restores up to `amount` HP, capped at max HP.
    async fn restore_hp(&self, id: EntityId, amount: u32) -> Option<HpChange>;

    /// Puts `item` in the held slot. False when the slot is taken.
    async fn equip_item(&self, id: EntityId, item: ItemId) -> bool;

    async fn dequip_item(&self, id: EntityId) -> Option<ItemId>;

    /// Adds `item` to the inventory. False when the inventory is full.
    async fn give_item(&self, id: EntityId, item: ItemId) -> bool;

    /// Removes one `item` from the inventory.
    async fn take_item(&self, id: EntityId, item: &ItemId) -> bool;

    /// Returns how many charges were actually removed.
    async fn deduct_charges(&self, id: EntityId, slot: usize, amount: u32) -> u32;

    /// Returns how many charges were actually restored.
    async fn restore_charges(&self, id: EntityId, slot: usize, amount: u32) -> u32;

    /// Writes `skill` into `slot`, replacing what was there, or into the next
    /// free slot when `slot` is past the end.
    async fn learn_skill(&self, id: EntityId, slot: usize, skill: SkillId, charges: u32) -> bool;

    /// False when the status was already present.
    async fn add_status(&self, id: EntityId, status: StatusId) -> bool;

    async fn remove_status(&self, id: EntityId, status: &StatusId) -> bool;

    /// Applies `delta` without going below zero; returns the applied delta.
    async fn change_money(&self, id: EntityId, delta: i64) -> i64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_caps_elements_and_skills() {
        let snapshot = CharacterSnapshot::new(EntityId(1), TeamId(0), 10, 30)
            .with_elements(&["fire", "flying", "dragon"])
            .with_skill("a", 5)
            .with_skill("b", 5)
            .with_skill("c", 5)
            .with_skill("d", 5)
            .with_skill("e", 5);

        assert_eq!(snapshot.elements.len(), MAX_ELEMENTS);
        assert_eq!(snapshot.skills.len(), MAX_SKILLS);
        assert!(snapshot.has_element(&ElementId::new("flying")));
        assert!(!snapshot.has_element(&ElementId::new("dragon")));
    }

    #[test]
    fn hp_change_reports_knockout_once() {
        let change = HpChange {
            before: 5,
            after: 0,
        };
        assert!(change.knocked_out());
        assert_eq!(change.amount(), 5);

        let already_down = HpChange {
            before: 0,
            after: 0,
        };
        assert!(!already_down.knocked_out());
    }

    #[test]
    fn inventory_capacity() {
        let snapshot = CharacterSnapshot::new(EntityId(1), TeamId(0), 10, 30)
            .with_inventory(&["apple", "berry"], 2);
        assert!(snapshot.inventory_full());
    }
}
