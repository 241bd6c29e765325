//! Rating period processing
//!
//! The engine takes a snapshot of a closed [`PeriodAccumulator`], computes
//! every participant's new state from the committed pre-period values of
//! everyone involved, and only then writes results back through each
//! record's staged finalize step.

use crate::config::Glicko2Config;
use crate::error::{RatingError, Result};
use crate::metrics::MetricsCollector;
use crate::period::{PeriodAccumulator, PeriodId, PeriodSnapshot};
use crate::rating::glicko2::{
    expected_score, GameOutcome, Glicko2Calculator, Glicko2State, PeriodUpdate, RatingCalculator,
};
use crate::rating::record::RatingRecord;
use crate::rating::roster::Roster;
use crate::types::{ParticipantId, RatingChange, RatingFailure};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Outcome of rating one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReport {
    pub period_id: PeriodId,
    pub rated_at: DateTime<Utc>,
    /// Whether results were only staged
    pub temporary: bool,
    pub changes: Vec<RatingChange>,
    pub failures: Vec<RatingFailure>,
}

impl PeriodReport {
    pub fn change_for(&self, player: ParticipantId) -> Option<&RatingChange> {
        self.changes.iter().find(|c| c.player_id == player)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct RatingEngine {
    config: Glicko2Config,
    calculator: Box<dyn RatingCalculator>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl std::fmt::Debug for RatingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatingEngine")
            .field("config", &self.config)
            .field("calculator", &self.calculator.name())
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl RatingEngine {
    /// Create an engine using the standard Glicko-2 calculator
    pub fn new(config: Glicko2Config) -> Result<Self> {
        let calculator = Glicko2Calculator::new(&config)?;
        Self::with_calculator(config, Box::new(calculator))
    }

    /// Create an engine with a custom per-participant calculator
    pub fn with_calculator(
        config: Glicko2Config,
        calculator: Box<dyn RatingCalculator>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            calculator,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &Glicko2Config {
        &self.config
    }

    /// A fresh record with the engine-wide defaults
    pub fn new_record(&self) -> RatingRecord {
        RatingRecord::new(&self.config)
    }

    /// Probability that `player` beats `opponent`, from committed values
    pub fn expected_score(&self, player: &RatingRecord, opponent: &RatingRecord) -> f64 {
        let player = player.internal_state();
        let opponent = opponent.internal_state();
        expected_score(player.mu, opponent.mu, opponent.phi)
    }

    /// Rate a closed period and commit the results
    pub fn rate_period(
        &self,
        roster: &mut Roster,
        period: &PeriodAccumulator,
    ) -> Result<PeriodReport> {
        let snapshot = period.snapshot()?;
        self.rate_snapshot(roster, &snapshot, false)
    }

    /// Rate a period but only stage the results
    pub fn preview_period(
        &self,
        roster: &mut Roster,
        period: &PeriodAccumulator,
    ) -> Result<PeriodReport> {
        let snapshot = period.snapshot()?;
        self.rate_snapshot(roster, &snapshot, true)
    }

    /// Commit every staged preview in the roster. Returns how many records changed.
    pub fn commit_preview(&self, roster: &mut Roster) -> Result<usize> {
        let mut committed = 0;
        for id in roster.ids().collect::<Vec<_>>() {
            if roster.get_mut(id)?.commit_staged() {
                committed += 1;
            }
        }
        info!("Committed staged ratings for {} participants", committed);
        Ok(committed)
    }

    /// Drop every staged preview in the roster
    pub fn discard_preview(&self, roster: &mut Roster) -> Result<()> {
        for id in roster.ids().collect::<Vec<_>>() {
            roster.get_mut(id)?.discard_staged();
        }
        Ok(())
    }

    /// Rate every participant in `snapshot`.
    ///
    /// Fails without touching any record when the snapshot references a
    /// participant missing from the roster. Per-participant failures are
    /// reported in [`PeriodReport::failures`] and leave that record untouched.
    pub fn rate_snapshot(
        &self,
        roster: &mut Roster,
        snapshot: &PeriodSnapshot,
        temporary: bool,
    ) -> Result<PeriodReport> {
        let started = Instant::now();

        if let Some(missing) = snapshot
            .participants
            .iter()
            .find(|id| !roster.contains(**id))
        {
            return Err(RatingError::UnknownParticipant { player: *missing }.into());
        }

        let priors: Vec<Glicko2State> = roster
            .ids()
            .map(|id| roster.get(id).map(RatingRecord::internal_state))
            .collect::<Result<_>>()?;

        let games = collect_games(snapshot, &priors)?;
        let participants: Vec<ParticipantId> = snapshot.participants.iter().copied().collect();

        let updates: Vec<(ParticipantId, Result<(u32, PeriodUpdate)>)> = participants
            .par_iter()
            .map(|&id| {
                let played = games.get(&id).map(Vec::as_slice).unwrap_or(&[]);
                let result = game_count(played.len()).and_then(|count| {
                    let update = self.calculator.rate(priors[id.0], played)?;
                    Ok((count, update))
                });
                (id, result)
            })
            .collect();

        let mut changes = Vec::with_capacity(updates.len());
        let mut failures = Vec::new();
        for (id, result) in updates {
            match result {
                Ok((played, update)) => {
                    let record = roster.get_mut(id)?;
                    let old_rating = record.player_rating(false);
                    record.set_working(update.state, played);
                    record.finalise_rating(temporary)?;
                    let new_rating = record.player_rating(temporary);

                    debug!(
                        "{} rated over {} games: {:.2} -> {:.2} (RD {:.2} -> {:.2})",
                        id,
                        played,
                        old_rating.rating,
                        new_rating.rating,
                        old_rating.deviation,
                        new_rating.deviation
                    );
                    if let Some(metrics) = &self.metrics {
                        if played == 0 {
                            metrics.record_decayed();
                        } else {
                            metrics.record_rated(update.iterations);
                        }
                    }

                    changes.push(RatingChange {
                        player_id: id,
                        old_rating,
                        new_rating,
                        games: played,
                    });
                }
                Err(e) => {
                    let kind = e
                        .downcast_ref::<RatingError>()
                        .map(RatingError::kind)
                        .unwrap_or("internal");
                    error!("Rating update failed for {}: {}", id, e);
                    if let Some(metrics) = &self.metrics {
                        metrics.record_failure(kind);
                    }

                    failures.push(RatingFailure {
                        player_id: id,
                        kind: kind.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let elapsed = started.elapsed();
        info!(
            "Period {} rated: {} results, {} participants updated, {} failed in {:?}{}",
            snapshot.period_id,
            snapshot.results.len(),
            changes.len(),
            failures.len(),
            elapsed,
            if temporary { " (preview)" } else { "" }
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_period(temporary, snapshot.results.len(), elapsed);
        }

        Ok(PeriodReport {
            period_id: snapshot.period_id,
            rated_at: Utc::now(),
            temporary,
            changes,
            failures,
        })
    }
}

/// Number of games a participant played, as stored in its result counter
fn game_count(games: usize) -> Result<u32> {
    u32::try_from(games).map_err(|_| {
        RatingError::InternalError {
            message: format!("{} games do not fit the result counter", games),
        }
        .into()
    })
}

/// Group the snapshot's matches per participant, in recording order, using
/// the opponents' committed pre-period values.
fn collect_games(
    snapshot: &PeriodSnapshot,
    priors: &[Glicko2State],
) -> Result<BTreeMap<ParticipantId, Vec<GameOutcome>>> {
    let mut games: BTreeMap<ParticipantId, Vec<GameOutcome>> = BTreeMap::new();

    for record in &snapshot.results {
        for player in [record.winner(), record.loser()] {
            let opponent = record.opponent(player)?;
            let prior = priors
                .get(opponent.0)
                .ok_or(RatingError::UnknownParticipant { player: opponent })?;

            games.entry(player).or_default().push(GameOutcome {
                opponent_mu: prior.mu,
                opponent_phi: prior.phi,
                score: record.score(player)?,
                weight: record.weight(),
            });
        }
    }

    Ok(games)
}
