//! Configuration management for glicko-period
//!
//! This module handles configuration loading from files and environment
//! variables, validation, and default values.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use rating::Glicko2Config;
