//! Command line and HTTP front end of the neighborhood scoring core.
//!
//! Loads a city dataset once at startup, then answers scoring and
//! isochrone requests against it.

pub mod config;
pub mod http;

pub use config::{AnalysisDefaults, Config, ConfigError, ServerConfig};

use thiserror::Error;

/// Errors that end the process
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] vicinity_core::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to configure worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
