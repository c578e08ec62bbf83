use crate::stats::{CritTable, Ratio, StageTable};

/// Tunable battle rules.
///
/// Every field has a default matching the stock ruleset; content can override
/// any subset from `config.toml`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Stage ladder for attack, defense and their magical counterparts.
    pub attack_stages: StageTable,
    /// Stage ladder for accuracy and evasion.
    pub accuracy_stages: StageTable,
    pub crit_chances: CritTable,
    pub crit_multiplier: Ratio,
    /// Used instead of `crit_multiplier` when the precision marker is set.
    pub precise_crit_multiplier: Ratio,
    /// Same-element bonus, applied once per hit.
    pub stab_multiplier: Ratio,
    /// Inclusive percentage bounds of the damage roll.
    pub variance_min: u32,
    pub variance_max: u32,
    pub min_damage: u32,
    /// Deepest allowed chain of nested sub-actions.
    pub max_invoke_depth: u32,
    /// Radius (in tiles) within which bystanders may react to an action.
    pub proximity_radius: u32,
    pub max_strikes: u32,
}

impl BattleConfig {
    pub const DEFAULT_CRIT_MULTIPLIER: Ratio = Ratio::new(3, 2);
    pub const DEFAULT_PRECISE_CRIT_MULTIPLIER: Ratio = Ratio::new(9, 4);
    pub const DEFAULT_STAB_MULTIPLIER: Ratio = Ratio::new(4, 3);
    pub const DEFAULT_VARIANCE_MIN: u32 = 90;
    pub const DEFAULT_VARIANCE_MAX: u32 = 100;
    pub const DEFAULT_MIN_DAMAGE: u32 = 1;
    pub const DEFAULT_MAX_INVOKE_DEPTH: u32 = 4;
    pub const DEFAULT_PROXIMITY_RADIUS: u32 = 1;
    pub const DEFAULT_MAX_STRIKES: u32 = 8;

    pub fn new() -> Self {
        Self {
            attack_stages: StageTable::ATTACK,
            accuracy_stages: StageTable::ACCURACY,
            crit_chances: CritTable::default(),
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            precise_crit_multiplier: Self::DEFAULT_PRECISE_CRIT_MULTIPLIER,
            stab_multiplier: Self::DEFAULT_STAB_MULTIPLIER,
            variance_min: Self::DEFAULT_VARIANCE_MIN,
            variance_max: Self::DEFAULT_VARIANCE_MAX,
            min_damage: Self::DEFAULT_MIN_DAMAGE,
            max_invoke_depth: Self::DEFAULT_MAX_INVOKE_DEPTH,
            proximity_radius: Self::DEFAULT_PROXIMITY_RADIUS,
            max_strikes: Self::DEFAULT_MAX_STRIKES,
        }
    }

    pub fn with_proximity_radius(mut self, radius: u32) -> Self {
        self.proximity_radius = radius;
        self
    }

    pub fn with_max_invoke_depth(mut self, depth: u32) -> Self {
        self.max_invoke_depth = depth;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
