//! Glicko-2 update for a single participant over one rating period
//!
//! All quantities here are on the internal Glicko-2 scale. See Glickman,
//! "Example of the Glicko-2 system", steps 3 through 8.

use crate::config::Glicko2Config;
use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::warn;

/// Rating, deviation and volatility on the internal scale
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Glicko2State {
    pub mu: f64,
    pub phi: f64,
    pub sigma: f64,
}

/// One game as seen from the participant being rated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOutcome {
    pub opponent_mu: f64,
    pub opponent_phi: f64,
    /// 1.0 win, 0.5 draw, 0.0 loss
    pub score: f64,
    pub weight: f64,
}

/// Result of rating one participant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodUpdate {
    pub state: Glicko2State,
    /// Volatility solver iterations spent (0 for decay)
    pub iterations: usize,
}

/// Trait for computing a participant's new state from one period of games
pub trait RatingCalculator: Send + Sync {
    /// Rate `prior` against `games`, listed in the order they were recorded.
    /// An empty slice means the participant only decays.
    fn rate(&self, prior: Glicko2State, games: &[GameOutcome]) -> Result<PeriodUpdate>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Weight applied to an opponent's result based on their deviation
pub fn g(phi: f64) -> f64 {
    1.0 / (1.0 + 3.0 * phi * phi / (PI * PI)).sqrt()
}

/// Expected score of a player rated `mu` against an opponent
pub fn expected_score(mu: f64, opponent_mu: f64, opponent_phi: f64) -> f64 {
    1.0 / (1.0 + (-g(opponent_phi) * (mu - opponent_mu)).exp())
}

/// Deviation after a period without games
pub fn decayed_deviation(phi: f64, sigma: f64) -> f64 {
    (phi * phi + sigma * sigma).sqrt()
}

/// Estimated variance `v` and the weighted score surplus `S` from a period of
/// games. Each game's terms are multiplied by its weight.
pub fn variance_and_surplus(mu: f64, games: &[GameOutcome]) -> (f64, f64) {
    let mut v_inv = 0.0;
    let mut surplus = 0.0;
    for game in games {
        let g_phi = g(game.opponent_phi);
        let e = expected_score(mu, game.opponent_mu, game.opponent_phi);
        v_inv += game.weight * g_phi * g_phi * e * (1.0 - e);
        surplus += game.weight * g_phi * (game.score - e);
    }
    (1.0 / v_inv, surplus)
}

/// Converged volatility and the iterations it took
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilitySolution {
    pub sigma: f64,
    pub iterations: usize,
}

/// The function whose root is `ln(sigma'^2)`
#[derive(Debug, Clone, Copy)]
struct VolatilityObjective {
    a: f64,
    phi2: f64,
    v: f64,
    delta2: f64,
    tau: f64,
}

impl VolatilityObjective {
    fn new(phi: f64, sigma: f64, v: f64, delta: f64, tau: f64) -> Self {
        Self {
            a: (sigma * sigma).ln(),
            phi2: phi * phi,
            v,
            delta2: delta * delta,
            tau,
        }
    }

    fn eval(&self, x: f64) -> f64 {
        let ex = x.exp();
        let denom = self.phi2 + self.v + ex;
        ex * (self.delta2 - self.phi2 - self.v - ex) / (2.0 * denom * denom)
            - (x - self.a) / (self.tau * self.tau)
    }

    /// Upper end of the initial bracket `[a, upper]` and the growth steps it took.
    /// `f(a)` and `f(upper)` have opposite signs (or one is zero).
    fn bracket(&self, max_iterations: usize) -> Result<(f64, usize)> {
        let excess = self.delta2 - self.phi2 - self.v;
        if excess > 0.0 {
            return Ok((excess.ln(), 0));
        }

        // f(a) <= 0 here; walk left until f turns non-negative
        let mut iterations = 0;
        let mut k = 1.0;
        loop {
            let candidate = self.a - k * self.tau;
            if self.eval(candidate) >= 0.0 {
                return Ok((candidate, iterations));
            }
            iterations += 1;
            if iterations >= max_iterations {
                return Err(RatingError::NonConvergence { iterations }.into());
            }
            k *= 2.0;
        }
    }
}

/// Solve for the new volatility with the Illinois variant of regula falsi.
///
/// The lower bracket grows geometrically when `delta^2 <= phi^2 + v`. Both
/// bracket growth and bracket tightening count towards `max_iterations`.
pub fn solve_volatility(
    phi: f64,
    sigma: f64,
    v: f64,
    delta: f64,
    tau: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Result<VolatilitySolution> {
    debug_assert!(phi >= 0.0 && v > 0.0 && sigma > 0.0);

    let objective = VolatilityObjective::new(phi, sigma, v, delta, tau);
    let (mut upper, mut iterations) = objective.bracket(max_iterations)?;
    let mut lower = objective.a;

    let mut f_lower = objective.eval(lower);
    let mut f_upper = objective.eval(upper);
    while (upper - lower).abs() > tolerance {
        if iterations >= max_iterations {
            return Err(RatingError::NonConvergence { iterations }.into());
        }
        iterations += 1;

        let c = lower + (lower - upper) * f_lower / (f_upper - f_lower);
        let f_c = objective.eval(c);
        if f_c * f_upper <= 0.0 {
            lower = upper;
            f_lower = f_upper;
        } else {
            f_lower /= 2.0;
        }
        upper = c;
        f_upper = f_c;
    }

    Ok(VolatilitySolution {
        sigma: (lower / 2.0).exp(),
        iterations,
    })
}

/// Standard Glicko-2 calculator
#[derive(Debug, Clone, Copy)]
pub struct Glicko2Calculator {
    tau: f64,
    tolerance: f64,
    max_iterations: usize,
}

impl Glicko2Calculator {
    pub fn new(config: &Glicko2Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tau: config.tau,
            tolerance: config.convergence_tolerance,
            max_iterations: config.max_iterations,
        })
    }

    fn decay(prior: Glicko2State) -> PeriodUpdate {
        PeriodUpdate {
            state: Glicko2State {
                phi: decayed_deviation(prior.phi, prior.sigma),
                ..prior
            },
            iterations: 0,
        }
    }
}

impl RatingCalculator for Glicko2Calculator {
    fn rate(&self, prior: Glicko2State, games: &[GameOutcome]) -> Result<PeriodUpdate> {
        if games.is_empty() {
            return Ok(Self::decay(prior));
        }

        let (v, surplus) = variance_and_surplus(prior.mu, games);
        if !(v.is_finite() && v > 0.0) {
            warn!(
                "Games carry no information (v = {}), applying decay only",
                v
            );
            return Ok(Self::decay(prior));
        }
        let delta = v * surplus;

        let solution = solve_volatility(
            prior.phi,
            prior.sigma,
            v,
            delta,
            self.tau,
            self.tolerance,
            self.max_iterations,
        )?;

        let phi_star = decayed_deviation(prior.phi, solution.sigma);
        debug_assert!(phi_star > 0.0);
        let phi = 1.0 / (1.0 / (phi_star * phi_star) + 1.0 / v).sqrt();
        let mu = prior.mu + phi * phi * surplus;

        Ok(PeriodUpdate {
            state: Glicko2State {
                mu,
                phi,
                sigma: solution.sigma,
            },
            iterations: solution.iterations,
        })
    }

    fn name(&self) -> &'static str {
        "glicko2"
    }
}
