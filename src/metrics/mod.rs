//! Metrics for rating period processing

pub mod collector;

pub use collector::{MetricsCollector, ParticipantMetrics, PeriodMetrics};
