//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for rating periods using
//! Prometheus metrics. Nothing is exposed over the network; callers gather
//! the registry themselves.

use anyhow::Result;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Duration;

/// Main metrics collector for the rating engine
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Period-level metrics
    period_metrics: PeriodMetrics,

    /// Participant-level metrics
    participant_metrics: ParticipantMetrics,
}

/// Period-level metrics
#[derive(Clone)]
pub struct PeriodMetrics {
    /// Rating periods processed, by mode (commit / preview)
    pub periods_rated_total: IntCounterVec,

    /// Wall time spent rating a period
    pub period_duration_seconds: Histogram,

    /// Match results consumed by rated periods
    pub results_consumed_total: IntCounterVec,
}

/// Participant-level metrics
#[derive(Clone)]
pub struct ParticipantMetrics {
    /// Participants processed, by outcome (rated / decayed / failed)
    pub participants_total: IntCounterVec,

    /// Volatility solver iterations per rated participant
    pub solver_iterations: Histogram,

    /// Rating errors by kind
    pub rating_errors_total: IntCounterVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let period_metrics = PeriodMetrics::new(&registry)?;
        let participant_metrics = ParticipantMetrics::new(&registry)?;

        Ok(Self {
            registry,
            period_metrics,
            participant_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn period(&self) -> &PeriodMetrics {
        &self.period_metrics
    }

    pub fn participant(&self) -> &ParticipantMetrics {
        &self.participant_metrics
    }

    /// Record a completed period
    pub fn record_period(&self, temporary: bool, results: usize, duration: Duration) {
        let mode = if temporary { "preview" } else { "commit" };

        self.period_metrics
            .periods_rated_total
            .with_label_values(&[mode])
            .inc();

        self.period_metrics
            .results_consumed_total
            .with_label_values(&[mode])
            .inc_by(results as u64);

        self.period_metrics
            .period_duration_seconds
            .observe(duration.as_secs_f64());
    }

    /// Record a participant that played at least one game
    pub fn record_rated(&self, iterations: usize) {
        self.participant_metrics
            .participants_total
            .with_label_values(&["rated"])
            .inc();

        self.participant_metrics
            .solver_iterations
            .observe(iterations as f64);
    }

    /// Record a participant that only decayed
    pub fn record_decayed(&self) {
        self.participant_metrics
            .participants_total
            .with_label_values(&["decayed"])
            .inc();
    }

    /// Record a participant whose update failed
    pub fn record_failure(&self, kind: &str) {
        self.participant_metrics
            .participants_total
            .with_label_values(&["failed"])
            .inc();

        self.participant_metrics
            .rating_errors_total
            .with_label_values(&[kind])
            .inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_metrics(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        encoder
            .encode_to_string(&metric_families)
            .map_err(|e| anyhow::anyhow!("Failed to encode metrics: {}", e))
    }
}

impl PeriodMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let periods_rated_total = IntCounterVec::new(
            Opts::new("glicko_periods_rated_total", "Total rating periods processed"),
            &["mode"],
        )?;
        registry.register(Box::new(periods_rated_total.clone()))?;

        let period_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "glicko_period_duration_seconds",
                "Time spent rating one period",
            )
            .buckets(vec![0.0001, 0.001, 0.01, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(period_duration_seconds.clone()))?;

        let results_consumed_total = IntCounterVec::new(
            Opts::new(
                "glicko_results_consumed_total",
                "Total match results consumed by rated periods",
            ),
            &["mode"],
        )?;
        registry.register(Box::new(results_consumed_total.clone()))?;

        Ok(Self {
            periods_rated_total,
            period_duration_seconds,
            results_consumed_total,
        })
    }
}

impl ParticipantMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let participants_total = IntCounterVec::new(
            Opts::new(
                "glicko_participants_total",
                "Total participants processed by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(participants_total.clone()))?;

        let solver_iterations = Histogram::with_opts(
            HistogramOpts::new(
                "glicko_solver_iterations",
                "Volatility solver iterations per rated participant",
            )
            .buckets(vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0]),
        )?;
        registry.register(Box::new(solver_iterations.clone()))?;

        let rating_errors_total = IntCounterVec::new(
            Opts::new("glicko_rating_errors_total", "Total rating errors by kind"),
            &["kind"],
        )?;
        registry.register(Box::new(rating_errors_total.clone()))?;

        Ok(Self {
            participants_total,
            solver_iterations,
            rating_errors_total,
        })
    }
}
