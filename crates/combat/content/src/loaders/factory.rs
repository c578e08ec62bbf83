//! Content factory for building a registry from data files.

use std::path::{Path, PathBuf};

use combat_core::{BattleConfig, ItemData, SkillData, StatusData, TypeChart};
use tracing::{info, warn};

use crate::loaders::{
    ChartLoader, ConfigLoader, ItemLoader, LoadResult, MessageLoader, ScenarioLoader, SkillLoader,
    StatusLoader,
};
use crate::{ContentRegistry, MessageCatalog, Scenario};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml      (optional)
/// ├── elements.ron
/// ├── skills.ron
/// ├── items.ron
/// ├── statuses.ron
/// ├── messages.toml
/// └── scenarios/
///     └── duel.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle rules from `config.toml`, or the stock rules when the
    /// file does not exist.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            info!(path = %path.display(), "no config file, using stock rules");
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the element chart from `elements.ron`.
    pub fn load_chart(&self) -> LoadResult<TypeChart> {
        ChartLoader::load(&self.data_dir.join("elements.ron"))
    }

    /// Load skill and trap definitions from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<SkillData>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load item definitions from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemData>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load status definitions from `statuses.ron`.
    pub fn load_statuses(&self) -> LoadResult<Vec<StatusData>> {
        StatusLoader::load(&self.data_dir.join("statuses.ron"))
    }

    /// Load message templates from `messages.toml`.
    pub fn load_messages(&self) -> LoadResult<MessageCatalog> {
        MessageLoader::load(&self.data_dir.join("messages.toml"))
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the scenario file (without `.ron` extension)
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self.data_dir.join("scenarios").join(format!("{}.ron", name));
        ScenarioLoader::load(&path)
    }

    /// Load every catalog into one registry.
    ///
    /// Duplicate ids within a catalog are an error. Dangling references
    /// between catalogs are logged, not fatal: the engine treats a missing
    /// status or skill as a no-op.
    pub fn load_registry(&self) -> LoadResult<ContentRegistry> {
        let mut registry = ContentRegistry::new(self.load_config()?, self.load_chart()?);

        for skill in self.load_skills()? {
            let id = skill.id.clone();
            if registry.insert_skill(skill).is_some() {
                anyhow::bail!("Duplicate skill id '{}' in skills.ron", id);
            }
        }
        for item in self.load_items()? {
            let id = item.id.clone();
            if registry.insert_item(item).is_some() {
                anyhow::bail!("Duplicate item id '{}' in items.ron", id);
            }
        }
        for status in self.load_statuses()? {
            let id = status.id.clone();
            if registry.insert_status(status).is_some() {
                anyhow::bail!("Duplicate status id '{}' in statuses.ron", id);
            }
        }

        for issue in registry.validate() {
            warn!(%issue, "content reference does not resolve");
        }
        info!(
            skills = registry.skill_count(),
            items = registry.item_count(),
            statuses = registry.status_count(),
            "content loaded"
        );
        Ok(registry)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
