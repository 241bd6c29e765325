//! Accumulation of match outcomes into rating periods

pub mod accumulator;

pub use accumulator::{PeriodAccumulator, PeriodId, PeriodSnapshot};
