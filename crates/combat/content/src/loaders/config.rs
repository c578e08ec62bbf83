//! Battle rules loader.

use std::path::Path;

use combat_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle rules from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load rules from a TOML file. Keys left out keep their stock values.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use combat_core::Ratio;

    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            max_invoke_depth = 2
            crit_chances = [5, 25, 100]
            stab_multiplier = { num = 3, den = 2 }
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.max_invoke_depth, 2);
        assert_eq!(config.stab_multiplier, Ratio::new(3, 2));
        assert_eq!(config.variance_min, BattleConfig::DEFAULT_VARIANCE_MIN);
        assert_eq!(config.max_strikes, BattleConfig::DEFAULT_MAX_STRIKES);
    }

    #[test]
    fn empty_config_is_the_stock_ruleset() {
        let config = ConfigLoader::parse("").expect("empty config should parse");
        assert_eq!(config, BattleConfig::default());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let err = ConfigLoader::parse("max_strikes = \"many\"").expect_err("should fail");
        assert!(err.to_string().contains("Failed to parse config TOML"));
    }
}
