//! Participant table
//!
//! Matches and period accumulators refer to competitors by [`ParticipantId`];
//! the roster owns the [`RatingRecord`] behind each handle.

use crate::config::Glicko2Config;
use crate::error::{RatingError, Result};
use crate::rating::record::RatingRecord;
use crate::types::{ParticipantId, PlayerRating};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Roster {
    records: Vec<RatingRecord>,
    names: Vec<String>,
    by_name: HashMap<String, ParticipantId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record and return its handle
    pub fn register(&mut self, name: impl Into<String>, record: RatingRecord) -> ParticipantId {
        let id = ParticipantId(self.records.len());
        let name = name.into();
        // A repeated name keeps resolving to its first registration
        self.by_name.entry(name.clone()).or_insert(id);
        self.records.push(record);
        self.names.push(name);
        id
    }

    /// Register a participant with the configured default values
    pub fn register_default(
        &mut self,
        name: impl Into<String>,
        config: &Glicko2Config,
    ) -> ParticipantId {
        self.register(name, RatingRecord::new(config))
    }

    /// Register a participant with explicit initial values
    pub fn register_rated(
        &mut self,
        name: impl Into<String>,
        initial: PlayerRating,
        config: &Glicko2Config,
    ) -> Result<ParticipantId> {
        let record = RatingRecord::with_rating(initial, config.scale)?;
        Ok(self.register(name, record))
    }

    pub fn get(&self, id: ParticipantId) -> Result<&RatingRecord> {
        self.records
            .get(id.0)
            .ok_or_else(|| RatingError::UnknownParticipant { player: id }.into())
    }

    pub fn get_mut(&mut self, id: ParticipantId) -> Result<&mut RatingRecord> {
        self.records
            .get_mut(id.0)
            .ok_or_else(|| RatingError::UnknownParticipant { player: id }.into())
    }

    pub fn name(&self, id: ParticipantId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    pub fn find(&self, name: &str) -> Option<ParticipantId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        id.0 < self.records.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        (0..self.records.len()).map(ParticipantId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let config = Glicko2Config::default();
        let mut roster = Roster::new();

        let alice = roster.register_default("alice", &config);
        let bob = roster
            .register_rated(
                "bob",
                PlayerRating {
                    rating: 1600.0,
                    deviation: 100.0,
                    volatility: 0.05,
                },
                &config,
            )
            .unwrap();

        assert_ne!(alice, bob);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.find("bob"), Some(bob));
        assert_eq!(roster.name(alice), Some("alice"));
        assert_eq!(roster.get(bob).unwrap().rating(false), 1600.0);
        assert_eq!(roster.ids().collect::<Vec<_>>(), vec![alice, bob]);
    }

    #[test]
    fn test_find_by_name() {
        let config = Glicko2Config::default();
        let mut roster = Roster::new();
        let ids: Vec<ParticipantId> = (0..1000)
            .map(|i| roster.register_default(format!("player-{}", i), &config))
            .collect();

        assert_eq!(roster.find("player-0"), Some(ids[0]));
        assert_eq!(roster.find("player-999"), Some(ids[999]));
        assert_eq!(roster.find("player-1000"), None);

        let again = roster.register_default("player-7", &config);
        assert_eq!(roster.find("player-7"), Some(ids[7]));
        assert_eq!(roster.name(again), Some("player-7"));
    }

    #[test]
    fn test_unknown_participant() {
        let roster = Roster::new();
        let err = roster.get(ParticipantId(3)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RatingError>(),
            Some(&RatingError::UnknownParticipant {
                player: ParticipantId(3)
            })
        );
        assert!(!roster.contains(ParticipantId(0)));
        assert!(roster.is_empty());
    }
}
