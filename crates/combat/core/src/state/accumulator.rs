//! Counter and multiplier accumulators.
use crate::stats::Ratio;

use super::StateEntry;

/// Integer accumulator stored in a [`super::StateStore`].
pub trait Counter: StateEntry + Clone + Default {
    fn value(&self) -> i32;
    fn value_mut(&mut self) -> &mut i32;
}

/// Ordered chain of rational factors stored in a [`super::StateStore`].
pub trait Multiplier: StateEntry + Clone + Default {
    fn factors(&self) -> &Factors;
    fn factors_mut(&mut self) -> &mut Factors;
}

/// Factors applied left to right, truncating after each step.
///
/// Keeping the chain instead of a folded product preserves the exact
/// rounding of sequential integer scaling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Factors(Vec<Ratio>);

impl Factors {
    pub fn push(&mut self, num: i32, den: i32) {
        debug_assert!(den != 0, "multiplier factor with zero denominator");
        self.0.push(Ratio::new(num, den));
    }

    pub fn as_slice(&self) -> &[Ratio] {
        &self.0
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().all(|r| r.num == r.den)
    }

    /// Any zero factor collapses the chain; also true for a zero denominator.
    pub fn is_neutralized(&self) -> bool {
        self.0.iter().any(|r| r.num == 0 || r.den == 0)
    }

    pub fn apply(&self, base: i64) -> i64 {
        self.0.iter().fold(base, |value, ratio| ratio.apply(value))
    }
}

/// Declares an `i32` newtype counter.
macro_rules! counter {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name(pub i32);

        impl $crate::state::Counter for $name {
            fn value(&self) -> i32 {
                self.0
            }

            fn value_mut(&mut self) -> &mut i32 {
                &mut self.0
            }
        }
    };
}

/// Declares a [`Factors`]-backed multiplier.
macro_rules! multiplier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct $name(pub $crate::state::Factors);

        impl $crate::state::Multiplier for $name {
            fn factors(&self) -> &$crate::state::Factors {
                &self.0
            }

            fn factors_mut(&mut self) -> &mut $crate::state::Factors {
                &mut self.0
            }
        }
    };
}

/// Declares a presence-only marker.
macro_rules! flag {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name;
    };
}

pub(crate) use {counter, flag, multiplier};
