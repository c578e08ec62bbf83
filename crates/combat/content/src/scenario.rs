//! Scripted encounters: who stands where, and what they do in which order.
use combat_core::{CharacterSnapshot, EntityId, ItemId, MapStatusId, Position, SkillId};
use serde::{Deserialize, Serialize};

/// A character and the tile it starts on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Position,
    pub character: CharacterSnapshot,
}

/// One initiated action in a scenario script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptedAction {
    /// Use the skill in `slot` of `user`'s skill list.
    Skill {
        user: EntityId,
        slot: usize,
        target: EntityId,
    },
    Item {
        user: EntityId,
        item: ItemId,
    },
    Throw {
        user: EntityId,
        item: ItemId,
        target: EntityId,
    },
    /// A trap skill springing on `victim`; no character initiates it.
    Trap {
        trap: SkillId,
        victim: EntityId,
    },
}

impl ScriptedAction {
    /// Character whose turn this is. Traps act for their victim.
    pub fn actor(&self) -> EntityId {
        match self {
            Self::Skill { user, .. } | Self::Item { user, .. } | Self::Throw { user, .. } => *user,
            Self::Trap { victim, .. } => *victim,
        }
    }
}

/// A complete encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Session seed. Drivers pick their own when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    pub characters: Vec<Placement>,
    /// Map statuses active before the first action.
    #[serde(default)]
    pub weather: Vec<MapStatusId>,
    pub actions: Vec<ScriptedAction>,
}

impl Scenario {
    pub fn placement(&self, id: EntityId) -> Option<&Placement> {
        self.characters.iter().find(|p| p.character.id == id)
    }

    /// Ids that scripted actions refer to but no placement provides.
    pub fn missing_characters(&self) -> Vec<EntityId> {
        let mut missing: Vec<EntityId> = self
            .actions
            .iter()
            .flat_map(|action| match action {
                ScriptedAction::Skill { user, target, .. }
                | ScriptedAction::Throw { user, target, .. } => vec![*user, *target],
                ScriptedAction::Item { user, .. } => vec![*user],
                ScriptedAction::Trap { victim, .. } => vec![*victim],
            })
            .filter(|id| self.placement(*id).is_none())
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }
}
