//! Message template loader.

use std::path::Path;

use tracing::debug;

use crate::MessageCatalog;
use crate::loaders::{LoadResult, read_file};

/// Loader for message templates from TOML files.
///
/// Nested tables become dotted keys, so `[battle] damage = "..."` is the
/// template for `battle.damage`.
pub struct MessageLoader;

impl MessageLoader {
    pub fn load(path: &Path) -> LoadResult<MessageCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<MessageCatalog> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse messages TOML: {}", e))?;

        let mut catalog = MessageCatalog::new();
        flatten(&mut catalog, "", &table)?;
        debug!(templates = catalog.len(), "message templates loaded");
        Ok(catalog)
    }
}

fn flatten(catalog: &mut MessageCatalog, prefix: &str, table: &toml::Table) -> LoadResult<()> {
    for (key, value) in table {
        let key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::String(template) => catalog.insert(key, template.clone()),
            toml::Value::Table(nested) => flatten(catalog, &key, nested)?,
            other => anyhow::bail!(
                "Message '{}' must be a string, found {}",
                key,
                other.type_str()
            ),
        }
    }
    Ok(())
}
