//! Per-competitor rating state
//!
//! A [`RatingRecord`] holds the public rating, deviation and volatility of one
//! competitor. Every value lives in a [`Staged`] cell, so the engine can write
//! working values mid-pass without disturbing what other participants read,
//! and previews can stage results without committing them.

use crate::config::Glicko2Config;
use crate::error::{RatingError, Result};
use crate::rating::glicko2::Glicko2State;
use crate::rating::scale::Glicko2Scale;
use crate::rating::staged::Staged;
use crate::types::PlayerRating;

#[derive(Debug, Clone)]
pub struct RatingRecord {
    rating: Staged<f64>,
    deviation: Staged<f64>,
    volatility: Staged<f64>,
    results: Staged<u32>,
    has_working: bool,
    scale: Glicko2Scale,
}

impl RatingRecord {
    /// Create a record with the configured defaults
    pub fn new(config: &Glicko2Config) -> Self {
        Self::from_parts(
            PlayerRating {
                rating: config.default_rating,
                deviation: config.default_deviation,
                volatility: config.default_volatility,
            },
            config.scale,
        )
    }

    /// Create a record with explicit initial values
    pub fn with_rating(initial: PlayerRating, scale: Glicko2Scale) -> Result<Self> {
        if !initial.rating.is_finite() {
            return Err(RatingError::ConfigurationError {
                message: format!("Rating must be finite, got {}", initial.rating),
            }
            .into());
        }
        if !(initial.deviation.is_finite() && initial.deviation >= 0.0) {
            return Err(RatingError::ConfigurationError {
                message: format!("Deviation must be non-negative, got {}", initial.deviation),
            }
            .into());
        }
        if !(initial.volatility.is_finite() && initial.volatility > 0.0) {
            return Err(RatingError::ConfigurationError {
                message: format!("Volatility must be positive, got {}", initial.volatility),
            }
            .into());
        }

        Ok(Self::from_parts(initial, scale))
    }

    fn from_parts(initial: PlayerRating, scale: Glicko2Scale) -> Self {
        Self {
            rating: Staged::new(initial.rating),
            deviation: Staged::new(initial.deviation),
            volatility: Staged::new(initial.volatility),
            results: Staged::new(0),
            has_working: false,
            scale,
        }
    }

    pub fn scale(&self) -> Glicko2Scale {
        self.scale
    }

    pub fn rating(&self, temporary: bool) -> f64 {
        self.rating.get(temporary)
    }

    pub fn set_rating(&mut self, rating: f64, temporary: bool) {
        self.rating.set(rating, temporary);
    }

    pub fn deviation(&self, temporary: bool) -> f64 {
        self.deviation.get(temporary)
    }

    pub fn set_deviation(&mut self, deviation: f64, temporary: bool) {
        debug_assert!(deviation >= 0.0, "deviation must be non-negative");
        self.deviation.set(deviation, temporary);
    }

    pub fn volatility(&self, temporary: bool) -> f64 {
        self.volatility.get(temporary)
    }

    pub fn set_volatility(&mut self, volatility: f64, temporary: bool) {
        debug_assert!(volatility > 0.0, "volatility must be positive");
        self.volatility.set(volatility, temporary);
    }

    /// Number of games counted into this record so far
    pub fn results(&self, temporary: bool) -> u32 {
        self.results.get(temporary)
    }

    pub fn set_results(&mut self, results: u32, temporary: bool) {
        self.results.set(results, temporary);
    }

    pub fn player_rating(&self, temporary: bool) -> PlayerRating {
        PlayerRating {
            rating: self.rating(temporary),
            deviation: self.deviation(temporary),
            volatility: self.volatility(temporary),
        }
    }

    /// Committed values on the internal Glicko-2 scale
    pub fn internal_state(&self) -> Glicko2State {
        Glicko2State {
            mu: self.scale.to_internal_rating(self.rating(false)),
            phi: self.scale.to_internal_deviation(self.deviation(false)),
            sigma: self.volatility(false),
        }
    }

    /// Store internal-scale results in the scratch slots
    pub fn set_working(&mut self, state: Glicko2State, games: u32) {
        self.rating.set_scratch(state.mu);
        self.deviation.set_scratch(state.phi);
        self.volatility.set_scratch(state.sigma);
        self.results.set_scratch(games);
        self.has_working = true;
    }

    pub fn working(&self) -> Option<Glicko2State> {
        self.has_working.then(|| Glicko2State {
            mu: self.rating.scratch(),
            phi: self.deviation.scratch(),
            sigma: self.volatility.scratch(),
        })
    }

    /// Convert the working values to public scale, commit them through the
    /// setters (staging only when `temporary`), and clear the scratch slots.
    pub fn finalise_rating(&mut self, temporary: bool) -> Result<()> {
        if !self.has_working {
            return Err(RatingError::InternalError {
                message: "No working values to finalise".to_string(),
            }
            .into());
        }

        let mu = self.rating.take_scratch();
        let phi = self.deviation.take_scratch();
        let sigma = self.volatility.take_scratch();
        let games = self.results.take_scratch();
        self.has_working = false;

        self.set_rating(self.scale.to_public_rating(mu), temporary);
        self.set_deviation(self.scale.to_public_deviation(phi), temporary);
        self.set_volatility(sigma, temporary);
        // Counted from the committed total so repeated previews don't accumulate
        self.set_results(self.results(false) + games, temporary);

        Ok(())
    }

    /// Promote every staged value to committed. Returns whether anything was staged.
    pub fn commit_staged(&mut self) -> bool {
        let rating = self.rating.commit();
        let deviation = self.deviation.commit();
        let volatility = self.volatility.commit();
        let results = self.results.commit();
        rating || deviation || volatility || results
    }

    pub fn discard_staged(&mut self) {
        self.rating.discard();
        self.deviation.discard();
        self.volatility.discard();
        self.results.discard();
    }

    pub fn has_staged(&self) -> bool {
        self.rating.is_staged()
            || self.deviation.is_staged()
            || self.volatility.is_staged()
            || self.results.is_staged()
    }
}
