//! Action context, effective data and outcome reporting.
mod context;
mod data;
mod error;
mod outcome;
mod priority;

pub use context::{ActionContext, ActionKind};
pub use data::{
    Alignment, BattleData, DataFlags, DataOrigin, Explosion, Phase, Stage, StageLists,
};
pub use error::ActionError;
pub use outcome::{ActionOutcome, Change, ItemLocation};
pub use priority::PriorityList;
