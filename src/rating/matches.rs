//! Match outcomes between two participants

use crate::error::{RatingError, Result};
use crate::types::ParticipantId;
use serde::{Deserialize, Serialize};

/// Default weight of a match
pub const FULL_WEIGHT: f64 = 1.0;

/// Immutable outcome of one game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    winner: ParticipantId,
    loser: ParticipantId,
    is_draw: bool,
    weight: f64,
}

impl MatchRecord {
    /// A decisive game with the given weight in (0, 1]
    pub fn new(winner: ParticipantId, loser: ParticipantId, weight: f64) -> Result<Self> {
        Self::build(winner, loser, false, weight)
    }

    /// A drawn game at full weight
    pub fn draw(first: ParticipantId, second: ParticipantId) -> Result<Self> {
        Self::build(first, second, true, FULL_WEIGHT)
    }

    fn build(
        winner: ParticipantId,
        loser: ParticipantId,
        is_draw: bool,
        weight: f64,
    ) -> Result<Self> {
        if winner == loser {
            return Err(RatingError::InvalidMatch {
                reason: format!("{} cannot play against itself", winner),
            }
            .into());
        }
        if !(weight.is_finite() && weight > 0.0 && weight <= 1.0) {
            return Err(RatingError::InvalidMatch {
                reason: format!("Weight must be in (0, 1], got {}", weight),
            }
            .into());
        }

        Ok(Self {
            winner,
            loser,
            is_draw,
            weight,
        })
    }

    pub fn winner(&self) -> ParticipantId {
        self.winner
    }

    pub fn loser(&self) -> ParticipantId {
        self.loser
    }

    pub fn is_draw(&self) -> bool {
        self.is_draw
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn involves(&self, player: ParticipantId) -> bool {
        self.winner == player || self.loser == player
    }

    /// Score of `player` in this game: 1.0 win, 0.0 loss, 0.5 draw
    pub fn score(&self, player: ParticipantId) -> Result<f64> {
        let score = if player == self.winner {
            1.0
        } else if player == self.loser {
            0.0
        } else {
            return Err(RatingError::NotAParticipant { player }.into());
        };

        Ok(if self.is_draw { 0.5 } else { score })
    }

    pub fn opponent(&self, player: ParticipantId) -> Result<ParticipantId> {
        if player == self.winner {
            Ok(self.loser)
        } else if player == self.loser {
            Ok(self.winner)
        } else {
            Err(RatingError::NotAParticipant { player }.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ParticipantId = ParticipantId(0);
    const B: ParticipantId = ParticipantId(1);
    const C: ParticipantId = ParticipantId(2);

    #[test]
    fn test_scores() {
        let game = MatchRecord::new(A, B, FULL_WEIGHT).unwrap();
        assert_eq!(game.score(A).unwrap(), 1.0);
        assert_eq!(game.score(B).unwrap(), 0.0);
        assert!(!game.is_draw());
    }

    #[test]
    fn test_draw_scores() {
        let game = MatchRecord::draw(A, B).unwrap();
        assert_eq!(game.score(A).unwrap(), 0.5);
        assert_eq!(game.score(B).unwrap(), 0.5);
        assert_eq!(game.weight(), 1.0);
    }

    #[test]
    fn test_non_participant() {
        let game = MatchRecord::new(A, B, FULL_WEIGHT).unwrap();

        let err = game.score(C).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RatingError>(),
            Some(&RatingError::NotAParticipant { player: C })
        );
        assert!(game.opponent(C).is_err());
        assert!(!game.involves(C));
    }

    #[test]
    fn test_opponent() {
        let game = MatchRecord::new(A, B, 0.5).unwrap();
        assert_eq!(game.opponent(A).unwrap(), B);
        assert_eq!(game.opponent(B).unwrap(), A);
        assert_eq!(game.weight(), 0.5);
    }

    #[test]
    fn test_invalid_matches() {
        let err = MatchRecord::new(A, A, FULL_WEIGHT).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::InvalidMatch { .. })
        ));
        assert!(MatchRecord::draw(B, B).is_err());
        assert!(MatchRecord::new(A, B, 0.0).is_err());
        assert!(MatchRecord::new(A, B, 1.5).is_err());
        assert!(MatchRecord::new(A, B, f64::NAN).is_err());
    }
}
