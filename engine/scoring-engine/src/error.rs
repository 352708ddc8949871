//! Error types for the scoring engine

use crate::models::Period;
use league_registry::{League, RegistryError, TeamId};
use persistence::PersistenceError;
use thiserror::Error;

/// Result type for scoring engine operations
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Errors that can occur while scoring a period or reading history
#[derive(Error, Debug)]
pub enum ScoringError {
    /// The same identity appeared in both league snapshots
    #[error("Team {team} appears in both league score snapshots")]
    NamespaceCollision { team: TeamId },

    /// A snapshot was handed a team belonging to the other league
    #[error("Team {team} does not belong to the {snapshot} league snapshot")]
    ForeignTeam { team: TeamId, snapshot: League },

    #[error("Invalid score {score} for team {team}")]
    InvalidScore { team: TeamId, score: f64 },

    #[error("Outcome for team {team} belongs to period {found}, not {expected}")]
    PeriodMismatch { team: TeamId, expected: Period, found: Period },

    #[error("Invalid outcome for team {team}: {reason}")]
    InvalidOutcome { team: TeamId, reason: String },

    #[error("Invalid cross pairing: {0}")]
    InvalidPairing(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Store error: {0}")]
    Store(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(String),
}
