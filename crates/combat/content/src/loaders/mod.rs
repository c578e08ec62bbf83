//! Content loaders for reading combat data from files.
//!
//! Each loader turns one RON/TOML file into core definitions;
//! [`ContentFactory`] ties them together into a [`crate::ContentRegistry`].

pub mod catalog;
pub mod chart;
pub mod config;
pub mod factory;
pub mod messages;
pub mod scenario;

pub use catalog::{ItemLoader, SkillLoader, StatusLoader};
pub use chart::ChartLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use messages::MessageLoader;
pub use scenario::ScenarioLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
