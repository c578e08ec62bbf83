//! Scenario loader.

use std::path::Path;

use crate::Scenario;
use crate::loaders::{LoadResult, read_file};

/// Loader for scripted encounters from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parses a scenario and checks that every scripted action names a
    /// placed character.
    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;

        let missing = scenario.missing_characters();
        if !missing.is_empty() {
            let ids: Vec<String> = missing.iter().map(ToString::to_string).collect();
            anyhow::bail!(
                "Scenario '{}' scripts actions for unplaced characters: {}",
                scenario.name,
                ids.join(", ")
            );
        }
        Ok(scenario)
    }
}
