//! What an action did, reported back to the caller.
use crate::env::LogMessage;
use crate::ids::{EntityId, ItemId, MapStatusId, Position, SkillId, StatusId};

/// Where an item ended up (or came from).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemLocation {
    Held(EntityId),
    Inventory(EntityId),
    Floor(Position),
    /// Used up or thrown; no longer anywhere.
    Consumed,
}

/// One observable mutation performed through a service.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Change {
    Damage {
        target: EntityId,
        amount: u32,
        remaining: u32,
    },
    Heal {
        target: EntityId,
        amount: u32,
    },
    Knockout {
        target: EntityId,
    },
    StatusAdded {
        target: EntityId,
        status: StatusId,
    },
    StatusRemoved {
        target: EntityId,
        status: StatusId,
    },
    ItemMoved {
        item: ItemId,
        from: ItemLocation,
        to: ItemLocation,
    },
    Money {
        target: EntityId,
        delta: i64,
    },
    Charges {
        target: EntityId,
        slot: usize,
        delta: i32,
    },
    Weather {
        status: MapStatusId,
        active: bool,
    },
    SkillLearned {
        target: EntityId,
        skill: SkillId,
        slot: usize,
    },
    Redirected {
        from: EntityId,
        to: EntityId,
    },
}

/// Result of a fully resolved action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    /// Strikes that started (a cancelled strike counts).
    pub strikes: u32,
    pub cancelled: bool,
    /// Sum of HP removed from hit targets.
    pub total_damage: i32,
    pub knockouts: i32,
    pub changes: Vec<Change>,
    pub messages: Vec<LogMessage>,
}

impl ActionOutcome {
    pub fn damage_to(&self, target: EntityId) -> u32 {
        self.changes
            .iter()
            .filter_map(|change| match change {
                Change::Damage { target: t, amount, .. } if *t == target => Some(*amount),
                _ => None,
            })
            .sum()
    }

    pub fn logged(&self, key: &str) -> bool {
        self.messages.iter().any(|m| m.key == key)
    }
}
