//! Main application configuration
//!
//! This module defines the primary configuration structures for glicko-period,
//! including TOML file and environment variable loading and validation.

use crate::config::rating::Glicko2Config;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: Glicko2Config,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Threads used to rate participants in parallel (0 = one per core)
    pub worker_threads: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "glicko-period".to_string(),
            log_level: "info".to_string(),
            worker_threads: 0,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", name, value))
}

impl AppConfig {
    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Override values from environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(threads) = env::var("WORKER_THREADS") {
            self.service.worker_threads = parse_var("WORKER_THREADS", &threads)?;
        }

        // Rating settings
        if let Ok(tau) = env::var("GLICKO_TAU") {
            self.rating.tau = parse_var("GLICKO_TAU", &tau)?;
        }
        if let Ok(tolerance) = env::var("GLICKO_CONVERGENCE_TOLERANCE") {
            self.rating.convergence_tolerance =
                parse_var("GLICKO_CONVERGENCE_TOLERANCE", &tolerance)?;
        }
        if let Ok(iterations) = env::var("GLICKO_MAX_ITERATIONS") {
            self.rating.max_iterations = parse_var("GLICKO_MAX_ITERATIONS", &iterations)?;
        }
        if let Ok(rating) = env::var("GLICKO_DEFAULT_RATING") {
            self.rating.default_rating = parse_var("GLICKO_DEFAULT_RATING", &rating)?;
        }
        if let Ok(deviation) = env::var("GLICKO_DEFAULT_DEVIATION") {
            self.rating.default_deviation = parse_var("GLICKO_DEFAULT_DEVIATION", &deviation)?;
        }
        if let Ok(volatility) = env::var("GLICKO_DEFAULT_VOLATILITY") {
            self.rating.default_volatility = parse_var("GLICKO_DEFAULT_VOLATILITY", &volatility)?;
        }
        if let Ok(offset) = env::var("GLICKO_SCALE_OFFSET") {
            self.rating.scale.offset = parse_var("GLICKO_SCALE_OFFSET", &offset)?;
        }
        if let Ok(factor) = env::var("GLICKO_SCALE_FACTOR") {
            self.rating.scale.factor = parse_var("GLICKO_SCALE_FACTOR", &factor)?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.rating.validate()
}
