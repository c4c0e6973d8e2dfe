//! TOML configuration of the server and its analysis defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use vicinity_core::{AnalysisParameters, Category, DatasetConfig, TransportMode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub analysis: AnalysisDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for one analysis request, including queueing
    pub request_timeout_secs: u64,
    /// Analyses allowed to run at the same time
    pub concurrency_limit: usize,
    /// Size of the rayon pool, defaults to one thread per core
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 120,
            concurrency_limit: 4,
            worker_threads: None,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parameters used when a request leaves them out
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    pub categories: Vec<Category>,
    pub mode: TransportMode,
    pub max_time_minutes: f64,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            categories: vec![Category::Supermarket, Category::Pharmacy],
            mode: TransportMode::Walking,
            max_time_minutes: 15.0,
        }
    }
}

impl AnalysisDefaults {
    /// Fills the gaps of a request with the configured defaults
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive or non-finite travel time
    pub fn resolve(
        &self,
        categories: Option<Vec<Category>>,
        mode: Option<TransportMode>,
        max_time_minutes: Option<f64>,
    ) -> Result<AnalysisParameters, vicinity_core::Error> {
        let minutes = max_time_minutes.unwrap_or(self.max_time_minutes);
        let max_time = Duration::try_from_secs_f64(minutes * 60.0).map_err(|_| {
            vicinity_core::Error::InvalidParameters(format!(
                "Maximum travel time must be a positive number of minutes, got {minutes}"
            ))
        })?;

        AnalysisParameters::new(
            categories.unwrap_or_else(|| self.categories.clone()),
            mode.unwrap_or(self.mode),
            max_time,
        )
    }
}

impl Config {
    /// Reads and validates a config file. Relative dataset paths are
    /// resolved against the directory of the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text)?;

        if let Some(base) = path.parent() {
            config.dataset = config.dataset.relative_to(base);
        }
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.server.concurrency_limit == 0 {
            return Err(ConfigError::Invalid(
                "server.concurrency_limit must be positive".to_string(),
            ));
        }
        if self.server.worker_threads == Some(0) {
            return Err(ConfigError::Invalid(
                "server.worker_threads must be positive".to_string(),
            ));
        }

        self.analysis
            .resolve(None, None, None)
            .map_err(|err| ConfigError::Invalid(format!("analysis: {err}")))?;
        Ok(())
    }
}
