//! Data-driven combat content.
//!
//! This crate turns hand-authored data files into the definitions the engine
//! resolves actions with:
//! - Battle rules (`config.toml`)
//! - Element chart (`elements.ron`)
//! - Skill, item and status catalogs (`skills.ron`, `items.ron`, `statuses.ron`)
//! - Player-facing message templates (`messages.toml`)
//! - Scripted encounters (`scenarios/*.ron`)
//!
//! Definitions end up in a [`ContentRegistry`], which is what the engine
//! reads through its content oracle.

mod messages;
mod registry;
mod scenario;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use messages::MessageCatalog;
pub use registry::{ContentIssue, ContentRegistry};
pub use scenario::{Placement, Scenario, ScriptedAction};

#[cfg(feature = "loaders")]
pub use loaders::{
    ChartLoader, ConfigLoader, ContentFactory, ItemLoader, MessageLoader, ScenarioLoader,
    SkillLoader, StatusLoader,
};
