//! Element chart loader.

use std::path::Path;

use combat_core::{Effectiveness, ElementId, Ratio, TypeChart};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// One non-neutral cell of the chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matchup {
    pub attacking: ElementId,
    pub defending: ElementId,
    pub effectiveness: Effectiveness,
}

/// Element chart structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartFile {
    pub elements: Vec<ElementId>,
    #[serde(default)]
    pub matchups: Vec<Matchup>,
    /// Ratio per tier; the stock bands apply when absent.
    #[serde(default)]
    pub bands: Option<Vec<Ratio>>,
}

/// Loader for the element chart from RON files.
pub struct ChartLoader;

impl ChartLoader {
    pub fn load(path: &Path) -> LoadResult<TypeChart> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Builds a chart, rejecting matchups that name unlisted elements.
    pub fn parse(content: &str) -> LoadResult<TypeChart> {
        let file: ChartFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse element chart RON: {}", e))?;

        let mut chart = TypeChart::new(file.elements);
        for matchup in &file.matchups {
            if !chart.set(
                &matchup.attacking,
                &matchup.defending,
                matchup.effectiveness.tier(),
            ) {
                anyhow::bail!(
                    "Matchup {} -> {} names an element missing from the chart",
                    matchup.attacking,
                    matchup.defending
                );
            }
        }
        if let Some(bands) = file.bands {
            if bands.is_empty() {
                anyhow::bail!("Element chart bands must not be empty");
            }
            chart = chart.with_bands(bands);
        }

        debug!(
            elements = chart.elements().len(),
            matchups = file.matchups.len(),
            "element chart loaded"
        );
        Ok(chart)
    }
}
