//! Service access errors.

use crate::error::{CombatError, ErrorSeverity};

/// A service the action needs was not wired into the [`super::BattleEnv`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("RosterOracle not available")]
    RosterNotAvailable,

    #[error("MapOracle not available")]
    MapNotAvailable,

    #[error("Presenter not available")]
    PresenterNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    #[error("ContentOracle not available")]
    ContentNotAvailable,
}

impl CombatError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        // Resolution cannot proceed without its collaborators.
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            RosterNotAvailable => "ORACLE_ROSTER_NOT_AVAILABLE",
            MapNotAvailable => "ORACLE_MAP_NOT_AVAILABLE",
            PresenterNotAvailable => "ORACLE_PRESENTER_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            ContentNotAvailable => "ORACLE_CONTENT_NOT_AVAILABLE",
        }
    }
}
