//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use glicko_period::config::Glicko2Config;
use glicko_period::{ParticipantId, PeriodAccumulator, PlayerRating, RatingEngine, Roster};

/// A roster, an engine and an open period
pub struct TestLeague {
    pub engine: RatingEngine,
    pub roster: Roster,
    pub period: PeriodAccumulator,
}

impl TestLeague {
    pub fn new() -> Self {
        Self::with_config(Glicko2Config::default())
    }

    pub fn with_config(config: Glicko2Config) -> Self {
        Self {
            engine: RatingEngine::new(config).expect("valid test config"),
            roster: Roster::new(),
            period: PeriodAccumulator::new(),
        }
    }

    /// Register a player with volatility 0.06
    pub fn player(&mut self, name: &str, rating: f64, deviation: f64) -> ParticipantId {
        self.player_with_volatility(name, rating, deviation, 0.06)
    }

    pub fn player_with_volatility(
        &mut self,
        name: &str,
        rating: f64,
        deviation: f64,
        volatility: f64,
    ) -> ParticipantId {
        let config = *self.engine.config();
        self.roster
            .register_rated(
                name,
                PlayerRating {
                    rating,
                    deviation,
                    volatility,
                },
                &config,
            )
            .expect("valid test player")
    }

    pub fn rating(&self, id: ParticipantId) -> PlayerRating {
        self.roster.get(id).expect("registered player").player_rating(false)
    }

    pub fn rate(&mut self) -> glicko_period::rating::PeriodReport {
        self.engine
            .rate_period(&mut self.roster, &self.period)
            .expect("period rates")
    }
}

/// Glickman's worked example: a 1500/200 player beats 1400/30 and loses to
/// 1550/100 and 1700/300.
pub fn glickman_example() -> (TestLeague, ParticipantId) {
    let mut league = TestLeague::new();
    let player = league.player("player", 1500.0, 200.0);
    let first = league.player("first", 1400.0, 30.0);
    let second = league.player("second", 1550.0, 100.0);
    let third = league.player("third", 1700.0, 300.0);

    league.period.add_win(player, first).unwrap();
    league.period.add_win(second, player).unwrap();
    league.period.add_win(third, player).unwrap();

    (league, player)
}
