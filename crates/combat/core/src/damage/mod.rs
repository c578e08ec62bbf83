//! Damage resolution: accuracy, the damage formula and HP application.
mod apply;
mod formula;
mod hit;

pub use apply::{DamageSource, deliver, inflict, restore};
pub use formula::{DamageOutcome, DamageReport, apply_variance, base_damage, calculate};
pub use hit::{check_hit, hit_chance};
