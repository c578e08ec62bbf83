//! Skill, item and status catalog loaders.

use std::path::Path;

use combat_core::{ItemData, SkillData, StatusData};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillData>,
}

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemData>,
}

/// Status catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCatalog {
    pub statuses: Vec<StatusData>,
}

/// Loader for the skill catalog from RON files.
///
/// Traps are skills too; they are told apart only by how they are initiated.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SkillData>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SkillData>> {
        let catalog: SkillCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;
        Ok(catalog.skills)
    }
}

/// Loader for the item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ItemData>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ItemData>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        Ok(catalog.items)
    }
}

/// Loader for the status catalog from RON files.
pub struct StatusLoader;

impl StatusLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<StatusData>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<StatusData>> {
        let catalog: StatusCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse status catalog RON: {}", e))?;
        Ok(catalog.statuses)
    }
}

#[cfg(test)]
mod tests {
    use combat_core::{BattleEffect, Category, DataFlags, PassiveHook, Ratio, Stage};

    use super::*;

    #[test]
    fn skill_with_staged_effects() {
        let skills = SkillLoader::parse(
            r#"(
                skills: [
                    (
                        id: "take_down",
                        name: "Take Down",
                        charges: 20,
                        data: (
                            element: "normal",
                            category: Physical,
                            power: 90,
                            hit_rate: Some(85),
                            flags: "CONTACT",
                            stages: {
                                OnHit: [(0, DamageFormula)],
                                AfterAction: [(0, Recoil(fraction: (num: 1, den: 4)))],
                            },
                        ),
                    ),
                ],
            )"#,
        )
        .expect("skills should parse");

        let data = &skills[0].data;
        assert_eq!(data.category, Category::Physical);
        assert_eq!(data.hit_rate, Some(85));
        assert_eq!(data.strikes, 1);
        assert!(data.flags.contains(DataFlags::CONTACT));
        let recoil: Vec<_> = data
            .stages
            .get(Stage::AfterAction)
            .expect("after action list")
            .iter()
            .map(|(_, effect)| effect.clone())
            .collect();
        assert_eq!(recoil, vec![BattleEffect::Recoil {
            fraction: Ratio::new(1, 4)
        }]);
    }

    #[test]
    fn status_passives_key_by_hook() {
        let statuses = StatusLoader::parse(
            r#"(
                statuses: [
                    (
                        id: "flash_fire",
                        name: "Flash Fire",
                        passive: {
                            BeforeBeingHit: [(0, ImmuneToElement(element: "fire", absorb: None))],
                        },
                    ),
                ],
            )"#,
        )
        .expect("statuses should parse");

        assert!(statuses[0].passive.get(PassiveHook::BeforeBeingHit).is_some());
        assert!(statuses[0].passive.get(PassiveHook::AfterBeingHit).is_none());
    }

    #[test]
    fn items_default_to_inert() {
        let items = ItemLoader::parse(r#"(items: [(id: "pebble", name: "Pebble")])"#)
            .expect("items should parse");

        assert!(items[0].use_data.is_none());
        assert!(items[0].throw_data.is_none());
        assert!(items[0].passive.is_empty());
    }

    #[test]
    fn unknown_effects_are_rejected() {
        let err = SkillLoader::parse(
            r#"(skills: [(id: "x", name: "X", charges: 1,
                data: (element: "none", stages: { OnHit: [(0, Teleport)] }))])"#,
        )
        .expect_err("Teleport is not an effect");
        assert!(err.to_string().contains("skill catalog"));
    }
}
