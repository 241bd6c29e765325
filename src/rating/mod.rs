//! Glicko-2 rating system
//!
//! This module provides per-competitor rating records, match outcomes,
//! the participant table, and the engine that rates a closed period.

pub mod engine;
pub mod glicko2;
pub mod matches;
pub mod record;
pub mod roster;
pub mod scale;
pub mod staged;

// Re-export commonly used types
pub use engine::{PeriodReport, RatingEngine};
pub use glicko2::{GameOutcome, Glicko2Calculator, Glicko2State, PeriodUpdate, RatingCalculator};
pub use matches::MatchRecord;
pub use record::RatingRecord;
pub use roster::Roster;
pub use scale::Glicko2Scale;
pub use staged::Staged;
