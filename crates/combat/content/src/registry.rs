//! In-memory content index.
use std::collections::HashMap;

use combat_core::{
    BattleConfig, BattleData, BattleEffect, Condition, ContentOracle, ElementId, ItemData, ItemId,
    PassiveHook, PassiveLists, SkillData, SkillId, Stage, StatusData, StatusId, TypeChart,
};
use strum::IntoEnumIterator;
use tracing::debug;

/// A reference inside content that resolves to nothing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentIssue {
    #[error("{owner}: element '{element}' is not in the chart")]
    UnknownElement { owner: String, element: ElementId },

    #[error("{owner}: skill '{skill}' is not defined")]
    UnknownSkill { owner: String, skill: SkillId },

    #[error("{owner}: status '{status}' is not defined")]
    UnknownStatus { owner: String, status: StatusId },
}

/// Every definition the engine can look up during a battle.
#[derive(Clone, Debug)]
pub struct ContentRegistry {
    config: BattleConfig,
    chart: TypeChart,
    skills: HashMap<SkillId, SkillData>,
    items: HashMap<ItemId, ItemData>,
    statuses: HashMap<StatusId, StatusData>,
}

impl ContentRegistry {
    pub fn new(config: BattleConfig, chart: TypeChart) -> Self {
        Self {
            config,
            chart,
            skills: HashMap::new(),
            items: HashMap::new(),
            statuses: HashMap::new(),
        }
    }

    /// Registers a skill, returning the definition it replaced.
    pub fn insert_skill(&mut self, skill: SkillData) -> Option<SkillData> {
        self.skills.insert(skill.id.clone(), skill)
    }

    pub fn insert_item(&mut self, item: ItemData) -> Option<ItemData> {
        self.items.insert(item.id.clone(), item)
    }

    pub fn insert_status(&mut self, status: StatusData) -> Option<StatusData> {
        self.statuses.insert(status.id.clone(), status)
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn status_count(&self) -> usize {
        self.statuses.len()
    }

    /// Checks every element, skill and status reference in the catalogs.
    ///
    /// Issues are sorted so repeated runs report in the same order.
    pub fn validate(&self) -> Vec<ContentIssue> {
        let mut issues = Vec::new();

        for skill in self.skills.values() {
            let owner = format!("skill '{}'", skill.id);
            self.check_data(&owner, &skill.data, &mut issues);
        }
        for item in self.items.values() {
            let owner = format!("item '{}'", item.id);
            if let Some(data) = &item.use_data {
                self.check_data(&owner, data, &mut issues);
            }
            if let Some(data) = &item.throw_data {
                self.check_data(&owner, data, &mut issues);
            }
            self.check_passive(&owner, &item.passive, &mut issues);
        }
        for status in self.statuses.values() {
            let owner = format!("status '{}'", status.id);
            self.check_passive(&owner, &status.passive, &mut issues);
        }

        issues.sort_by_key(|issue| issue.to_string());
        issues.dedup();
        debug!(issues = issues.len(), "content validated");
        issues
    }

    fn check_data(&self, owner: &str, data: &BattleData, issues: &mut Vec<ContentIssue>) {
        self.check_element(owner, &data.element, issues);
        for stage in Stage::iter() {
            if let Some(list) = data.stages.get(stage) {
                for (_, effect) in list.iter() {
                    self.check_effect(owner, effect, issues);
                }
            }
        }
    }

    fn check_passive(&self, owner: &str, passive: &PassiveLists, issues: &mut Vec<ContentIssue>) {
        for hook in PassiveHook::iter() {
            if let Some(list) = passive.get(hook) {
                for (_, effect) in list.iter() {
                    self.check_effect(owner, effect, issues);
                }
            }
        }
    }

    fn check_effect(&self, owner: &str, effect: &BattleEffect, issues: &mut Vec<ContentIssue>) {
        match effect {
            BattleEffect::ElementMultiplier { element, .. }
            | BattleEffect::WeatherMultiplier { element, .. }
            | BattleEffect::ImmuneToElement { element, .. }
            | BattleEffect::Draw { element }
            | BattleEffect::ChangeElement { element } => self.check_element(owner, element, issues),
            BattleEffect::ApplyStatus { status, .. } | BattleEffect::RemoveStatus { status } => {
                self.check_status(owner, status, issues)
            }
            BattleEffect::LearnSkill { skill, .. }
            | BattleEffect::ReplaceData { skill }
            | BattleEffect::Invoke { skill } => self.check_skill(owner, skill, issues),
            BattleEffect::ReplaceStage { effects, .. } => {
                for (_, nested) in effects.iter() {
                    self.check_effect(owner, nested, issues);
                }
            }
            BattleEffect::Conditional {
                condition,
                then,
                otherwise,
            } => {
                self.check_condition(owner, condition, issues);
                for nested in then.iter().chain(otherwise) {
                    self.check_effect(owner, nested, issues);
                }
            }
            _ => {}
        }
    }

    fn check_condition(&self, owner: &str, condition: &Condition, issues: &mut Vec<ContentIssue>) {
        match condition {
            Condition::TargetHasStatus(status) => self.check_status(owner, status, issues),
            Condition::ElementIs(element) => self.check_element(owner, element, issues),
            Condition::Not(inner) => self.check_condition(owner, inner, issues),
            Condition::All(all) | Condition::Any(all) => {
                for inner in all {
                    self.check_condition(owner, inner, issues);
                }
            }
            _ => {}
        }
    }

    fn check_element(&self, owner: &str, element: &ElementId, issues: &mut Vec<ContentIssue>) {
        if !element.is_none() && !self.chart.contains(element) {
            issues.push(ContentIssue::UnknownElement {
                owner: owner.to_string(),
                element: element.clone(),
            });
        }
    }

    fn check_skill(&self, owner: &str, skill: &SkillId, issues: &mut Vec<ContentIssue>) {
        if !self.skills.contains_key(skill) {
            issues.push(ContentIssue::UnknownSkill {
                owner: owner.to_string(),
                skill: skill.clone(),
            });
        }
    }

    fn check_status(&self, owner: &str, status: &StatusId, issues: &mut Vec<ContentIssue>) {
        if !self.statuses.contains_key(status) {
            issues.push(ContentIssue::UnknownStatus {
                owner: owner.to_string(),
                status: status.clone(),
            });
        }
    }
}

impl ContentOracle for ContentRegistry {
    fn config(&self) -> &BattleConfig {
        &self.config
    }

    fn type_chart(&self) -> &TypeChart {
        &self.chart
    }

    fn skill(&self, id: &SkillId) -> Option<&SkillData> {
        self.skills.get(id)
    }

    fn item(&self, id: &ItemId) -> Option<&ItemData> {
        self.items.get(id)
    }

    fn status(&self, id: &StatusId) -> Option<&StatusData> {
        self.statuses.get(id)
    }
}

#[cfg(test)]
mod tests {
    use combat_core::{Category, Ratio};

    use super::*;

    fn registry() -> ContentRegistry {
        let chart = TypeChart::new(vec![ElementId::new("fire"), ElementId::new("water")]);
        ContentRegistry::new(BattleConfig::default(), chart)
    }

    fn skill(id: &str, data: BattleData) -> SkillData {
        SkillData {
            id: id.into(),
            name: id.to_string(),
            charges: 5,
            data,
        }
    }

    #[test]
    fn lookups_go_through_the_oracle() {
        let mut registry = registry();
        registry.insert_skill(skill("ember", BattleData::new("fire", Category::Magical, 40)));

        assert!(registry.skill(&"ember".into()).is_some());
        assert!(registry.skill(&"surf".into()).is_none());
        assert_eq!(registry.skill_count(), 1);
    }

    #[test]
    fn reinserting_returns_the_old_definition() {
        let mut registry = registry();
        assert!(
            registry
                .insert_skill(skill("ember", BattleData::new("fire", Category::Magical, 40)))
                .is_none()
        );
        let replaced =
            registry.insert_skill(skill("ember", BattleData::new("fire", Category::Magical, 90)));
        assert_eq!(replaced.map(|s| s.data.power), Some(40));
    }

    #[test]
    fn validate_finds_dangling_references() {
        let mut registry = registry();
        let data = BattleData::new("shadow", Category::Physical, 50)
            .with_effect(Stage::AfterHit, 0, BattleEffect::ApplyStatus {
                status: "burn".into(),
                chance: Some(10),
            })
            .with_effect(Stage::OnHit, 0, BattleEffect::Conditional {
                condition: Condition::Not(Box::new(Condition::ElementIs("ice".into()))),
                then: vec![BattleEffect::Invoke {
                    skill: "ember".into(),
                }],
                otherwise: Vec::new(),
            });
        registry.insert_skill(skill("mystery", data));

        let issues = registry.validate();
        assert_eq!(issues.len(), 4, "{issues:?}");
        assert!(issues.contains(&ContentIssue::UnknownStatus {
            owner: "skill 'mystery'".into(),
            status: "burn".into(),
        }));
        assert!(issues.contains(&ContentIssue::UnknownElement {
            owner: "skill 'mystery'".into(),
            element: "ice".into(),
        }));
    }

    #[test]
    fn typeless_data_and_valid_passives_pass() {
        let mut registry = registry();
        registry.insert_status(StatusData {
            id: "wet".into(),
            name: "Wet".into(),
            passive: PassiveLists::new().with(
                PassiveHook::BeforeBeingHit,
                0,
                BattleEffect::ImmuneToElement {
                    element: "fire".into(),
                    absorb: Some(Ratio::new(1, 4)),
                },
            ),
        });
        registry.insert_skill(skill(
            "rest",
            BattleData::new(ElementId::NONE, Category::Status, 0),
        ));

        assert!(registry.validate().is_empty());
    }
}
