//! Common types used throughout the rating engine

use serde::{Deserialize, Serialize};

/// Stable handle for a participant registered in a [`crate::rating::Roster`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub usize);

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Public-scale Glicko-2 values for a competitor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerRating {
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
}

impl Default for PlayerRating {
    fn default() -> Self {
        Self {
            rating: 1500.0,
            deviation: 350.0,
            volatility: 0.06,
        }
    }
}

impl PlayerRating {
    /// Approximate 95% confidence interval around the rating
    pub fn confidence_interval(&self) -> (f64, f64) {
        (
            self.rating - 1.96 * self.deviation,
            self.rating + 1.96 * self.deviation,
        )
    }
}

/// Rating change information for a participant after one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: ParticipantId,
    pub old_rating: PlayerRating,
    pub new_rating: PlayerRating,
    /// Games counted for this participant in the period (0 means decay only)
    pub games: u32,
}

impl RatingChange {
    /// Signed change of the public rating
    pub fn rating_delta(&self) -> f64 {
        self.new_rating.rating - self.old_rating.rating
    }
}

/// A participant whose update was abandoned, leaving its record untouched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingFailure {
    pub player_id: ParticipantId,
    pub kind: String,
    pub message: String,
}
