//! glicko-period - batch Glicko-2 rating updates
//!
//! This crate collects match outcomes into rating periods and rates every
//! participant of a closed period with the Glicko-2 system, staging results
//! before they are committed.

pub mod config;
pub mod error;
pub mod metrics;
pub mod period;
pub mod rating;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use period::PeriodAccumulator;
pub use rating::{RatingEngine, RatingRecord, Roster};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
