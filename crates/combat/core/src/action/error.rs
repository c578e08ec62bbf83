//! Action resolution errors.
//!
//! Only infrastructure failures are reported here. Effects whose gameplay
//! preconditions do not hold return `Ok(())` without touching anything.

use crate::env::OracleError;
use crate::error::{CombatError, ErrorContext, ErrorSeverity};
use crate::ids::{EntityId, ItemId, SkillId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The acting character is unknown to the roster.
    #[error("user {0} not found")]
    UserNotFound(EntityId),

    /// A character the action refers to is unknown to the roster.
    #[error("target {0} not found")]
    TargetNotFound(EntityId),

    #[error("skill '{0}' not found")]
    SkillNotFound(SkillId),

    #[error("item '{0}' not found")]
    ItemNotFound(ItemId),

    #[error("skill slot {slot} of {user} is empty")]
    EmptySlot { user: EntityId, slot: usize },

    #[error("skill slot {slot} of {user} has no charges left")]
    NoCharges { user: EntityId, slot: usize },

    #[error("{user} does not carry item '{item}'")]
    ItemNotCarried { user: EntityId, item: ItemId },

    /// The item has no definition for the requested use (e.g. throwing a
    /// non-throwable item).
    #[error("item '{0}' cannot be used this way")]
    ItemNotUsable(ItemId),

    /// A chain of nested invocations went deeper than the configured limit.
    #[error("nested invocation depth {depth} exceeds the limit")]
    InvokeDepthExceeded { depth: u32, context: ErrorContext },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CombatError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            UserNotFound(_) | TargetNotFound(_) => ErrorSeverity::Validation,
            SkillNotFound(_) | ItemNotFound(_) => ErrorSeverity::Validation,
            EmptySlot { .. } | ItemNotCarried { .. } | ItemNotUsable(_) => {
                ErrorSeverity::Validation
            }
            NoCharges { .. } => ErrorSeverity::Recoverable,
            InvokeDepthExceeded { .. } => ErrorSeverity::Internal,
            Oracle(err) => err.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            ActionError::InvokeDepthExceeded { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            UserNotFound(_) => "ACTION_USER_NOT_FOUND",
            TargetNotFound(_) => "ACTION_TARGET_NOT_FOUND",
            SkillNotFound(_) => "ACTION_SKILL_NOT_FOUND",
            ItemNotFound(_) => "ACTION_ITEM_NOT_FOUND",
            EmptySlot { .. } => "ACTION_EMPTY_SLOT",
            NoCharges { .. } => "ACTION_NO_CHARGES",
            ItemNotCarried { .. } => "ACTION_ITEM_NOT_CARRIED",
            ItemNotUsable(_) => "ACTION_ITEM_NOT_USABLE",
            InvokeDepthExceeded { .. } => "ACTION_INVOKE_DEPTH_EXCEEDED",
            Oracle(err) => err.error_code(),
        }
    }
}
