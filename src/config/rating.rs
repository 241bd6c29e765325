//! Glicko-2 rating system configuration

use crate::error::{RatingError, Result};
use crate::rating::scale::Glicko2Scale;
use serde::{Deserialize, Serialize};

/// Tuning knobs for the Glicko-2 engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Glicko2Config {
    /// Initial rating for new participants (public scale)
    pub default_rating: f64,
    /// Initial deviation for new participants (public scale)
    pub default_deviation: f64,
    /// Initial volatility for new participants
    pub default_volatility: f64,
    /// System constant bounding how fast volatility may change
    pub tau: f64,
    /// Bracket width at which the volatility solver stops
    pub convergence_tolerance: f64,
    /// Upper bound on volatility solver iterations per participant
    pub max_iterations: usize,
    /// Public <-> internal scale constants
    pub scale: Glicko2Scale,
}

impl Default for Glicko2Config {
    fn default() -> Self {
        Self {
            default_rating: 1500.0,
            default_deviation: 350.0,
            default_volatility: 0.06,
            tau: 0.5,
            convergence_tolerance: 0.000_001,
            max_iterations: 1000,
            scale: Glicko2Scale::default(),
        }
    }
}

impl Glicko2Config {
    /// Volatility reacts slowly to surprising results
    pub fn conservative() -> Self {
        Self {
            tau: 0.3,
            ..Self::default()
        }
    }

    /// Volatility reacts quickly to surprising results
    pub fn aggressive() -> Self {
        Self {
            tau: 1.2,
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| -> anyhow::Error {
            RatingError::ConfigurationError {
                message: message.to_string(),
            }
            .into()
        };

        if !self.default_rating.is_finite() {
            return Err(invalid("Default rating must be finite"));
        }
        if !(self.default_deviation.is_finite() && self.default_deviation > 0.0) {
            return Err(invalid("Default deviation must be positive"));
        }
        if !(self.default_volatility.is_finite() && self.default_volatility > 0.0) {
            return Err(invalid("Default volatility must be positive"));
        }
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return Err(invalid("Tau must be positive"));
        }
        if !(self.convergence_tolerance.is_finite() && self.convergence_tolerance > 0.0) {
            return Err(invalid("Convergence tolerance must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(invalid("Max iterations must be greater than 0"));
        }
        if !self.scale.offset.is_finite() {
            return Err(invalid("Scale offset must be finite"));
        }
        if !(self.scale.factor.is_finite() && self.scale.factor > 0.0) {
            return Err(invalid("Scale factor must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Glicko2Config::default();
        assert_eq!(config.default_rating, 1500.0);
        assert_eq!(config.default_deviation, 350.0);
        assert_eq!(config.default_volatility, 0.06);
        assert_eq!(config.scale.factor, 173.7178);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Glicko2Config::default();
        config.tau = 0.0;
        assert!(config.validate().is_err());

        config = Glicko2Config::default();
        config.convergence_tolerance = -1.0;
        assert!(config.validate().is_err());

        config = Glicko2Config::default();
        config.max_iterations = 0;
        assert!(config.validate().is_err());

        config = Glicko2Config::default();
        config.default_volatility = 0.0;
        assert!(config.validate().is_err());

        config = Glicko2Config::default();
        config.scale.factor = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_config_presets() {
        let conservative = Glicko2Config::conservative();
        let aggressive = Glicko2Config::aggressive();
        let default = Glicko2Config::default();

        assert!(conservative.tau < default.tau);
        assert!(aggressive.tau > default.tau);
        assert!(conservative.validate().is_ok());
        assert!(aggressive.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Glicko2Config = toml::from_str("tau = 0.8").unwrap();
        assert_eq!(config.tau, 0.8);
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.scale, Glicko2Scale::default());
    }
}
