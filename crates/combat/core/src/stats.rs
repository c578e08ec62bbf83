//! Stat blocks and the stage tables that scale them.
//!
//! Stages are small signed integers. A [`StageTable`] converts a stage into a
//! rational scale on the underlying stat; a [`CritTable`] converts the
//! critical-hit stage into a threshold on a d100-style draw.
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Stats that can carry stage boosts.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stat {
    Attack,
    Defense,
    MagicAttack,
    MagicDefense,
    Accuracy,
    Evasion,
    Speed,
}

/// Damage category of a skill or item.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    #[default]
    Physical,
    Magical,
    /// Deals no formula damage.
    Status,
}

impl Category {
    /// Governing (attack, defense) stat pair for this category.
    ///
    /// `cross` selects the other damaging category's pair. Status maps to
    /// the physical pair.
    pub const fn stat_pair(self, cross: bool) -> (Stat, Stat) {
        let magical = matches!(self, Category::Magical) != cross;
        if magical {
            (Stat::MagicAttack, Stat::MagicDefense)
        } else {
            (Stat::Attack, Stat::Defense)
        }
    }
}

/// Rational factor `num / den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ratio {
    pub num: i32,
    pub den: i32,
}

impl Ratio {
    pub const ONE: Self = Self { num: 1, den: 1 };
    pub const ZERO: Self = Self { num: 0, den: 1 };

    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    pub const fn is_zero(self) -> bool {
        self.num == 0
    }

    /// Scales `value`, truncating toward zero. A zero denominator yields zero.
    pub fn apply(self, value: i64) -> i64 {
        if self.den == 0 {
            debug_assert!(false, "ratio with zero denominator");
            return 0;
        }
        value * i64::from(self.num) / i64::from(self.den)
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Self::ONE
    }
}

/// Stage-to-multiplier table for one family of stats.
///
/// Positive stages scale by `(base + stage) / base`, negative stages by
/// `base / (base - stage)`. Stages outside `[min, max]` are clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageTable {
    pub min: i32,
    pub max: i32,
    pub base: i32,
}

impl StageTable {
    /// Attack and defense family: the classic x(2+n)/2 ladder.
    pub const ATTACK: Self = Self::new(-6, 6, 2);

    /// Accuracy and evasion family: the flatter x(3+n)/3 ladder.
    pub const ACCURACY: Self = Self::new(-6, 6, 3);

    pub const fn new(min: i32, max: i32, base: i32) -> Self {
        Self { min, max, base }
    }

    pub fn clamp(&self, stage: i32) -> i32 {
        stage.clamp(self.min, self.max)
    }

    pub fn ratio(&self, stage: i32) -> Ratio {
        let stage = self.clamp(stage);
        if stage >= 0 {
            Ratio::new(self.base + stage, self.base)
        } else {
            Ratio::new(self.base, self.base - stage)
        }
    }

    /// Applies the (clamped) stage to a stat value.
    pub fn apply(&self, value: u32, stage: i32) -> u32 {
        let scaled = self.ratio(stage).apply(i64::from(value));
        u32::try_from(scaled.max(0)).unwrap_or(u32::MAX)
    }
}

/// Critical-hit thresholds indexed by crit stage.
///
/// A draw in `0..100` is a critical hit when it falls below the threshold of
/// the (clamped) stage. Thresholds never decrease as the stage rises.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CritTable {
    chances: Vec<u32>,
}

impl CritTable {
    pub const DEFAULT_CHANCES: [u32; 4] = [4, 12, 50, 100];

    pub fn new(chances: Vec<u32>) -> Self {
        debug_assert!(!chances.is_empty(), "crit table needs at least one stage");
        debug_assert!(
            chances.windows(2).all(|w| w[0] <= w[1]),
            "crit chances must be non-decreasing"
        );
        Self { chances }
    }

    /// True when the thresholds are non-empty and never decrease.
    pub fn is_monotonic(&self) -> bool {
        !self.chances.is_empty() && self.chances.windows(2).all(|w| w[0] <= w[1])
    }

    pub fn chances(&self) -> &[u32] {
        &self.chances
    }

    /// Threshold for a stage; negative stages act as stage 0, stages past the
    /// table use the last entry.
    pub fn chance(&self, stage: i32) -> u32 {
        let last = self.chances.len().saturating_sub(1);
        let index = usize::try_from(stage.max(0)).unwrap_or(0).min(last);
        self.chances.get(index).copied().unwrap_or(0)
    }

    pub fn is_critical(&self, draw: u32, stage: i32) -> bool {
        draw < self.chance(stage)
    }
}

impl Default for CritTable {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CHANCES.to_vec())
    }
}

/// Base stats of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    pub attack: u32,
    pub defense: u32,
    pub magic_attack: u32,
    pub magic_defense: u32,
    pub speed: u32,
}

impl StatBlock {
    pub const fn new(
        attack: u32,
        defense: u32,
        magic_attack: u32,
        magic_defense: u32,
        speed: u32,
    ) -> Self {
        Self {
            attack,
            defense,
            magic_attack,
            magic_defense,
            speed,
        }
    }

    /// Value of a stat. Accuracy and evasion have no base value and read as 0.
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::MagicAttack => self.magic_attack,
            Stat::MagicDefense => self.magic_defense,
            Stat::Speed => self.speed,
            Stat::Accuracy | Stat::Evasion => 0,
        }
    }
}

/// Persistent stage boosts carried by a character between actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatStages {
    pub attack: i32,
    pub defense: i32,
    pub magic_attack: i32,
    pub magic_defense: i32,
    pub accuracy: i32,
    pub evasion: i32,
    pub speed: i32,
}

impl StatStages {
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::MagicAttack => self.magic_attack,
            Stat::MagicDefense => self.magic_defense,
            Stat::Accuracy => self.accuracy,
            Stat::Evasion => self.evasion,
            Stat::Speed => self.speed,
        }
    }

    pub fn get_mut(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Attack => &mut self.attack,
            Stat::Defense => &mut self.defense,
            Stat::MagicAttack => &mut self.magic_attack,
            Stat::MagicDefense => &mut self.magic_defense,
            Stat::Accuracy => &mut self.accuracy,
            Stat::Evasion => &mut self.evasion,
            Stat::Speed => &mut self.speed,
        }
    }
}
