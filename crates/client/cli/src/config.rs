//! Runtime settings of the terminal driver.
use std::env;
use std::path::PathBuf;

/// Where content comes from, which encounter to play, and where logs go.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub scenario: String,
    /// Overrides the scenario's own seed.
    pub seed: Option<u64>,
    /// Diagnostics are also written to `<log_dir>/combat.log` when set.
    pub log_dir: Option<PathBuf>,
    /// Real time per presentation frame. Zero plays the battle instantly.
    pub frame_millis: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(Self::DEFAULT_DATA_DIR),
            scenario: Self::DEFAULT_SCENARIO.to_string(),
            seed: None,
            log_dir: None,
            frame_millis: 0,
        }
    }
}

impl CliConfig {
    pub const DEFAULT_DATA_DIR: &'static str = "crates/combat/content/data";
    pub const DEFAULT_SCENARIO: &'static str = "duel";

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_DATA_DIR` - Content directory (default: bundled data)
    /// - `COMBAT_SCENARIO` - Scenario name under `scenarios/` (default: duel)
    /// - `COMBAT_SEED` - Session seed (default: the scenario's, else 0)
    /// - `COMBAT_LOG_DIR` - Directory for a diagnostics log file (default: none)
    /// - `COMBAT_FRAME_MS` - Milliseconds per animation frame (default: 0)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("COMBAT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(scenario) = env::var("COMBAT_SCENARIO") {
            config.scenario = scenario;
        }
        config.seed = read_env::<u64>("COMBAT_SEED");
        config.log_dir = env::var("COMBAT_LOG_DIR").ok().map(PathBuf::from);
        if let Some(millis) = read_env::<u64>("COMBAT_FRAME_MS") {
            config.frame_millis = millis;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_bundled_duel() {
        let config = CliConfig::default();
        assert_eq!(config.scenario, "duel");
        assert!(config.data_dir.ends_with("data"));
        assert!(config.seed.is_none());
        assert_eq!(config.frame_millis, 0);
    }
}
