//! Conversion between the public Glicko scale and the internal Glicko-2 scale

use serde::{Deserialize, Serialize};

/// Rating offset of the public scale
pub const DEFAULT_SCALE_OFFSET: f64 = 1500.0;

/// Ratio between public and internal scale (400 / ln 10)
pub const DEFAULT_SCALE_FACTOR: f64 = 173.7178;

/// Affine transform used for ratings and pure scaling used for deviations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glicko2Scale {
    pub offset: f64,
    pub factor: f64,
}

impl Default for Glicko2Scale {
    fn default() -> Self {
        Self {
            offset: DEFAULT_SCALE_OFFSET,
            factor: DEFAULT_SCALE_FACTOR,
        }
    }
}

impl Glicko2Scale {
    pub fn new(offset: f64, factor: f64) -> Self {
        Self { offset, factor }
    }

    pub fn to_internal_rating(&self, rating: f64) -> f64 {
        (rating - self.offset) / self.factor
    }

    pub fn to_public_rating(&self, mu: f64) -> f64 {
        mu * self.factor + self.offset
    }

    pub fn to_internal_deviation(&self, deviation: f64) -> f64 {
        deviation / self.factor
    }

    pub fn to_public_deviation(&self, phi: f64) -> f64 {
        phi * self.factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_scale() {
        let scale = Glicko2Scale::default();
        assert_eq!(scale.to_internal_rating(1500.0), 0.0);
        assert_eq!(scale.to_internal_deviation(350.0), 350.0 / 173.7178);
        assert!((scale.to_internal_rating(1400.0) + 0.5756).abs() < 1e-4);
    }

    #[test]
    fn test_custom_scale() {
        let scale = Glicko2Scale::new(1000.0, 100.0);
        assert_eq!(scale.to_internal_rating(1200.0), 2.0);
        assert_eq!(scale.to_public_rating(-1.5), 850.0);
        assert_eq!(scale.to_public_deviation(0.5), 50.0);
    }

    proptest! {
        #[test]
        fn rating_round_trip(rating in 0.0f64..4000.0) {
            let scale = Glicko2Scale::default();
            let back = scale.to_public_rating(scale.to_internal_rating(rating));
            prop_assert!((back - rating).abs() <= 1e-9);
        }

        #[test]
        fn deviation_round_trip(deviation in 0.0f64..1000.0) {
            let scale = Glicko2Scale::default();
            let back = scale.to_public_deviation(scale.to_internal_deviation(deviation));
            prop_assert!((back - deviation).abs() <= 1e-9);
        }
    }
}
