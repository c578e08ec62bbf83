//! Type effectiveness table.
//!
//! The chart is a total matrix over every registered element: each
//! (attacking, defending) pair maps to an effectiveness tier. Tiers are small
//! integers so dual-typed defenders can be resolved by summing the two lookups
//! and re-centering on neutral; the resulting tier is turned into a damage
//! ratio through a band table owned by content.
use std::collections::HashMap;

use strum::{AsRefStr, Display, EnumString};
use tracing::warn;

use crate::ids::ElementId;
use crate::stats::Ratio;

/// Effectiveness tier. Higher is more effective; [`Tier::NEUTRAL`] is x1.
pub type Tier = i32;

/// Named tiers used when authoring the chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effectiveness {
    NoEffect,
    NotVeryEffective,
    Neutral,
    SuperEffective,
}

impl Effectiveness {
    pub const NO_EFFECT: Tier = 0;
    pub const NOT_VERY: Tier = 3;
    pub const NEUTRAL: Tier = 4;
    pub const SUPER: Tier = 5;

    pub const fn tier(self) -> Tier {
        match self {
            Self::NoEffect => Self::NO_EFFECT,
            Self::NotVeryEffective => Self::NOT_VERY,
            Self::Neutral => Self::NEUTRAL,
            Self::SuperEffective => Self::SUPER,
        }
    }

    /// Message category of a (possibly combined) tier.
    pub const fn classify(tier: Tier) -> Self {
        if tier <= Self::NO_EFFECT {
            Self::NoEffect
        } else if tier < Self::NEUTRAL {
            Self::NotVeryEffective
        } else if tier == Self::NEUTRAL {
            Self::Neutral
        } else {
            Self::SuperEffective
        }
    }
}

/// Element-by-element effectiveness matrix plus the tier-to-ratio bands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeChart {
    elements: Vec<ElementId>,
    index: HashMap<ElementId, usize>,
    matrix: Vec<Tier>,
    bands: Vec<Ratio>,
}

impl TypeChart {
    /// Ratio per tier, indexed by tier value.
    pub const DEFAULT_BANDS: [Ratio; 7] = [
        Ratio::ZERO,
        Ratio::new(1, 4),
        Ratio::new(1, 4),
        Ratio::new(1, 2),
        Ratio::ONE,
        Ratio::new(2, 1),
        Ratio::new(4, 1),
    ];

    /// Creates a chart where every pair is neutral.
    pub fn new(elements: Vec<ElementId>) -> Self {
        let index = elements
            .iter()
            .enumerate()
            .map(|(i, element)| (element.clone(), i))
            .collect();
        let len = elements.len();
        Self {
            elements,
            index,
            matrix: vec![Effectiveness::NEUTRAL; len * len],
            bands: Self::DEFAULT_BANDS.to_vec(),
        }
    }

    /// Builder: set one matchup.
    pub fn with_matchup(
        mut self,
        attacking: impl Into<ElementId>,
        defending: impl Into<ElementId>,
        effectiveness: Effectiveness,
    ) -> Self {
        self.set(&attacking.into(), &defending.into(), effectiveness.tier());
        self
    }

    pub fn with_bands(mut self, bands: Vec<Ratio>) -> Self {
        debug_assert!(!bands.is_empty(), "band table must not be empty");
        self.bands = bands;
        self
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    pub fn contains(&self, element: &ElementId) -> bool {
        self.index.contains_key(element)
    }

    /// Sets one cell. Returns false when either element is unregistered.
    pub fn set(&mut self, attacking: &ElementId, defending: &ElementId, tier: Tier) -> bool {
        match (self.index.get(attacking), self.index.get(defending)) {
            (Some(&a), Some(&d)) => {
                let width = self.elements.len();
                self.matrix[a * width + d] = tier;
                true
            }
            _ => false,
        }
    }

    /// Single-element lookup.
    ///
    /// The typeless element is neutral against everything. Unregistered
    /// elements are a content error: asserted in debug builds, neutral in
    /// release builds.
    pub fn lookup(&self, attacking: &ElementId, defending: &ElementId) -> Tier {
        if attacking.is_none() || defending.is_none() {
            return Effectiveness::NEUTRAL;
        }
        match (self.index.get(attacking), self.index.get(defending)) {
            (Some(&a), Some(&d)) => self.matrix[a * self.elements.len() + d],
            _ => {
                debug_assert!(
                    false,
                    "unregistered element in lookup: {attacking} vs {defending}"
                );
                warn!(%attacking, %defending, "unregistered element, treating as neutral");
                Effectiveness::NEUTRAL
            }
        }
    }

    /// Combined tier against a defender with one or two elements.
    ///
    /// Immune if any single lookup is immune; otherwise the lookups are summed
    /// and re-centered so that two neutral lookups stay neutral.
    pub fn combined(&self, attacking: &ElementId, defending: &[ElementId]) -> Tier {
        let mut total = Effectiveness::NEUTRAL;
        for element in defending {
            let tier = self.lookup(attacking, element);
            if tier == Effectiveness::NO_EFFECT {
                return Effectiveness::NO_EFFECT;
            }
            total += tier - Effectiveness::NEUTRAL;
        }
        total
    }

    /// Damage ratio of a tier. Tiers outside the band table are clamped into
    /// it, except that only tier 0 ever maps to immunity.
    pub fn band(&self, tier: Tier) -> Ratio {
        if tier <= Effectiveness::NO_EFFECT {
            return self.bands.first().copied().unwrap_or(Ratio::ZERO);
        }
        let last = self.bands.len().saturating_sub(1);
        let index = usize::try_from(tier).unwrap_or(0).clamp(1.min(last), last);
        self.bands.get(index).copied().unwrap_or(Ratio::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> TypeChart {
        TypeChart::new(vec!["normal".into(), "fire".into(), "water".into(), "ghost".into()])
            .with_matchup("fire", "water", Effectiveness::NotVeryEffective)
            .with_matchup("water", "fire", Effectiveness::SuperEffective)
            .with_matchup("normal", "ghost", Effectiveness::NoEffect)
            .with_matchup("fire", "fire", Effectiveness::NotVeryEffective)
    }

    #[test]
    fn unset_pairs_are_neutral() {
        let chart = chart();
        assert_eq!(
            chart.lookup(&"normal".into(), &"fire".into()),
            Effectiveness::NEUTRAL
        );
    }

    #[test]
    fn typeless_attack_is_neutral() {
        let chart = chart();
        let none = ElementId::new(ElementId::NONE);
        assert_eq!(chart.lookup(&none, &"ghost".into()), Effectiveness::NEUTRAL);
    }

    #[test]
    fn any_immune_lookup_makes_combination_immune() {
        let chart = chart();
        let tier = chart.combined(&"normal".into(), &["fire".into(), "ghost".into()]);
        assert_eq!(tier, Effectiveness::NO_EFFECT);
        assert_eq!(chart.band(tier), Ratio::ZERO);
    }

    #[test]
    fn dual_resistance_stacks() {
        let chart = chart();
        let tier = chart.combined(&"fire".into(), &["water".into(), "fire".into()]);
        assert_eq!(tier, 2);
        assert_eq!(chart.band(tier), Ratio::new(1, 4));
    }

    #[test]
    fn resist_and_weakness_cancel() {
        let chart = chart().with_matchup("fire", "normal", Effectiveness::SuperEffective);
        let tier = chart.combined(&"fire".into(), &["water".into(), "normal".into()]);
        assert_eq!(tier, Effectiveness::NEUTRAL);
        assert_eq!(Effectiveness::classify(tier), Effectiveness::Neutral);
    }

    #[test]
    fn out_of_range_tiers_clamp_to_band_edges() {
        let chart = chart();
        assert_eq!(chart.band(40), Ratio::new(4, 1));
        assert_eq!(chart.band(-3), Ratio::ZERO);
    }

    #[test]
    fn set_rejects_unknown_elements() {
        let mut chart = chart();
        assert!(!chart.set(&"dragon".into(), &"fire".into(), Effectiveness::SUPER));
    }
}
