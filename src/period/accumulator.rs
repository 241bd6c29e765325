//! Thread-safe collection of match outcomes for one rating period
//!
//! Producers record results concurrently while the period is open. Every
//! operation, including reads, goes through one mutex so the participant
//! sets and the result list are always observed together.

use crate::error::{RatingError, Result};
use crate::rating::matches::{MatchRecord, FULL_WEIGHT};
use crate::types::ParticipantId;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

/// Unique identifier for rating periods
pub type PeriodId = Uuid;

#[derive(Debug, Default)]
struct PeriodState {
    results: Vec<MatchRecord>,
    declared: BTreeSet<ParticipantId>,
    active: BTreeSet<ParticipantId>,
}

impl PeriodState {
    fn reconcile(&mut self) {
        let missing: Vec<ParticipantId> =
            self.active.difference(&self.declared).copied().collect();
        self.declared.extend(missing);
    }
}

/// Consistent copy of a period taken under the lock
#[derive(Debug, Clone)]
pub struct PeriodSnapshot {
    pub period_id: PeriodId,
    pub results: Vec<MatchRecord>,
    /// Declared participants reconciled with everyone who played
    pub participants: BTreeSet<ParticipantId>,
}

impl PeriodSnapshot {
    /// Matches involving `player`, in recording order
    pub fn results_for(
        &self,
        player: ParticipantId,
    ) -> impl Iterator<Item = &MatchRecord> + '_ {
        self.results.iter().filter(move |m| m.involves(player))
    }
}

#[derive(Debug)]
pub struct PeriodAccumulator {
    period_id: PeriodId,
    opened_at: DateTime<Utc>,
    state: Mutex<PeriodState>,
}

impl Default for PeriodAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PeriodAccumulator {
    pub fn new() -> Self {
        Self {
            period_id: Uuid::new_v4(),
            opened_at: Utc::now(),
            state: Mutex::new(PeriodState::default()),
        }
    }

    pub fn period_id(&self) -> PeriodId {
        self.period_id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    fn lock(&self) -> Result<MutexGuard<'_, PeriodState>> {
        self.state.lock().map_err(|_| {
            RatingError::InternalError {
                message: "Failed to acquire period lock".to_string(),
            }
            .into()
        })
    }

    fn push(&self, record: MatchRecord) -> Result<()> {
        let mut state = self.lock()?;
        state.active.insert(record.winner());
        state.active.insert(record.loser());
        state.results.push(record);
        Ok(())
    }

    /// Record a decisive game
    pub fn add_result(
        &self,
        winner: ParticipantId,
        loser: ParticipantId,
        weight: f64,
    ) -> Result<()> {
        let record = MatchRecord::new(winner, loser, weight)?;
        debug!(
            "Period {}: {} beat {} (weight {})",
            self.period_id, winner, loser, weight
        );
        self.push(record)
    }

    /// Record a decisive game at full weight
    pub fn add_win(&self, winner: ParticipantId, loser: ParticipantId) -> Result<()> {
        self.add_result(winner, loser, FULL_WEIGHT)
    }

    /// Record a drawn game
    pub fn add_draw(&self, first: ParticipantId, second: ParticipantId) -> Result<()> {
        let record = MatchRecord::draw(first, second)?;
        debug!("Period {}: {} drew with {}", self.period_id, first, second);
        self.push(record)
    }

    /// Declare a participant so it is rated (decayed) even without games
    pub fn add_participant(&self, player: ParticipantId) -> Result<()> {
        self.lock()?.declared.insert(player);
        Ok(())
    }

    /// Matches involving `player`, in recording order
    pub fn results_for(&self, player: ParticipantId) -> Result<Vec<MatchRecord>> {
        let state = self.lock()?;
        Ok(state
            .results
            .iter()
            .filter(|m| m.involves(player))
            .copied()
            .collect())
    }

    /// Declared participants, reconciled with everyone who appears in a match
    pub fn participants(&self) -> Result<BTreeSet<ParticipantId>> {
        let mut state = self.lock()?;
        state.reconcile();
        Ok(state.declared.clone())
    }

    pub fn result_count(&self) -> Result<usize> {
        Ok(self.lock()?.results.len())
    }

    pub fn active_participant_count(&self) -> Result<usize> {
        Ok(self.lock()?.active.len())
    }

    /// Drop recorded results and the active set; declared participants stay
    pub fn clear(&self) -> Result<()> {
        let mut state = self.lock()?;
        state.results.clear();
        state.active.clear();
        Ok(())
    }

    pub fn snapshot(&self) -> Result<PeriodSnapshot> {
        let mut state = self.lock()?;
        state.reconcile();
        Ok(PeriodSnapshot {
            period_id: self.period_id,
            results: state.results.clone(),
            participants: state.declared.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ParticipantId = ParticipantId(0);
    const B: ParticipantId = ParticipantId(1);
    const C: ParticipantId = ParticipantId(2);
    const D: ParticipantId = ParticipantId(3);

    #[test]
    fn test_add_result_tracks_active_participants() {
        let period = PeriodAccumulator::new();
        period.add_result(A, B, 1.0).unwrap();
        period.add_draw(B, C).unwrap();

        assert_eq!(period.result_count().unwrap(), 2);
        assert_eq!(period.active_participant_count().unwrap(), 3);
    }

    #[test]
    fn test_invalid_results_are_not_recorded() {
        let period = PeriodAccumulator::new();
        assert!(period.add_result(A, A, 1.0).is_err());
        assert!(period.add_draw(B, B).is_err());
        assert!(period.add_result(A, B, 2.0).is_err());

        assert_eq!(period.result_count().unwrap(), 0);
        assert_eq!(period.active_participant_count().unwrap(), 0);
    }

    #[test]
    fn test_results_for_keeps_insertion_order() {
        let period = PeriodAccumulator::new();
        period.add_win(A, B).unwrap();
        period.add_win(C, D).unwrap();
        period.add_win(B, A).unwrap();
        period.add_draw(A, C).unwrap();

        let results = period.results_for(A).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].winner(), A);
        assert_eq!(results[1].winner(), B);
        assert!(results[2].is_draw());

        assert!(period.results_for(ParticipantId(9)).unwrap().is_empty());
    }

    #[test]
    fn test_participants_reconciled() {
        let period = PeriodAccumulator::new();
        period.add_participant(D).unwrap();
        period.add_win(A, B).unwrap();

        let participants = period.participants().unwrap();
        assert_eq!(participants, BTreeSet::from([A, B, D]));
        assert_eq!(period.active_participant_count().unwrap(), 2);
    }

    #[test]
    fn test_clear_keeps_declared() {
        let period = PeriodAccumulator::new();
        period.add_participant(C).unwrap();
        period.add_win(A, B).unwrap();
        period.clear().unwrap();

        assert_eq!(period.result_count().unwrap(), 0);
        assert_eq!(period.active_participant_count().unwrap(), 0);
        assert_eq!(period.participants().unwrap(), BTreeSet::from([C]));
    }

    #[test]
    fn test_reconciled_players_survive_clear() {
        let period = PeriodAccumulator::new();
        period.add_win(A, B).unwrap();
        period.participants().unwrap();
        period.clear().unwrap();

        assert_eq!(period.participants().unwrap(), BTreeSet::from([A, B]));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let period = PeriodAccumulator::new();
        period.add_win(A, B).unwrap();
        let snapshot = period.snapshot().unwrap();
        period.add_win(C, D).unwrap();

        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(snapshot.participants, BTreeSet::from([A, B]));
        assert_eq!(snapshot.period_id, period.period_id());
        assert_eq!(snapshot.results_for(B).count(), 1);
    }
}
