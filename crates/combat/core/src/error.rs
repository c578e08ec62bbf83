//! Common error infrastructure for combat-core.
//!
//! Domain errors live next to the code that raises them: [`crate::env::OracleError`]
//! for missing collaborators and [`crate::action::ActionError`] for action
//! resolution. Both implement [`CombatError`] so callers can classify them
//! uniformly.
//!
//! Failed gameplay preconditions (wrong element, nobody to redirect to, no
//! damage dealt yet) are not errors: effect units return `Ok(())` and do
//! nothing. Only infrastructure failures surface through these types.

use crate::ids::{EntityId, SkillId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same request may succeed later.
    Recoverable,

    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: user not found, empty skill slot.
    Validation,

    /// Unexpected inconsistency between collaborators. Indicates a bug.
    Internal,

    /// Missing collaborator; resolution cannot continue at all.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Where in an action an error was raised.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Character performing the action.
    pub user: Option<EntityId>,

    /// Current recipient when the error was raised.
    pub target: Option<EntityId>,

    /// Skill being resolved, when the action came from a skill.
    pub skill: Option<SkillId>,

    /// Action sequence number; correlates log lines with a replay.
    pub nonce: u64,

    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(nonce: u64) -> Self {
        Self {
            user: None,
            target: None,
            skill: None,
            nonce,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_user(mut self, user: EntityId) -> Self {
        self.user = Some(user);
        self
    }

    #[must_use]
    pub const fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn with_skill(mut self, skill: SkillId) -> Self {
        self.skill = Some(skill);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all combat-core errors.
pub trait CombatError: std::fmt::Display + std::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable identifier for metrics and tests.
    fn error_code(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
