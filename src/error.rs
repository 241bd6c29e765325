//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate. Callers that need to branch on a specific failure can
//! `downcast_ref::<RatingError>()` the returned error.

use crate::types::ParticipantId;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("Invalid match: {reason}")]
    InvalidMatch { reason: String },

    #[error("Participant {player} did not take part in this match")]
    NotAParticipant { player: ParticipantId },

    #[error("Unknown participant: {player}")]
    UnknownParticipant { player: ParticipantId },

    #[error("Volatility solver did not converge after {iterations} iterations")]
    NonConvergence { iterations: usize },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl RatingError {
    /// Short machine-readable label, used for metrics and reports
    pub fn kind(&self) -> &'static str {
        match self {
            RatingError::InvalidMatch { .. } => "invalid_match",
            RatingError::NotAParticipant { .. } => "not_a_participant",
            RatingError::UnknownParticipant { .. } => "unknown_participant",
            RatingError::NonConvergence { .. } => "non_convergence",
            RatingError::ConfigurationError { .. } => "configuration",
            RatingError::InternalError { .. } => "internal",
        }
    }
}
