//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `PARITY_*` environment variables;
//! command-line flags in turn override the environment.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::backend::{DEFAULT_MODEL_NAME, DEFAULT_SERVED_URL, DEFAULT_TIMEOUT_SECS, ServedConfig};
use crate::embedding::RerankerConfig;

/// Harness configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Rerank endpoint of the served backend.
    pub served_url: String,

    /// Model name sent to the served backend when a fixture names none.
    pub model_name: String,

    /// HTTP timeout for served-backend calls. Default: 10 seconds.
    pub timeout: Duration,

    /// Directory scanned for `test_*.json` fixtures. Default: `./fixtures`.
    pub fixtures_dir: PathBuf,

    /// Directory result and comparison files are written to. Default: `./results`.
    pub results_dir: PathBuf,

    /// Reference reranker model directory. `None` runs the stub scorer.
    pub reranker_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            served_url: DEFAULT_SERVED_URL.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fixtures_dir: PathBuf::from("fixtures"),
            results_dir: PathBuf::from("results"),
            reranker_path: None,
        }
    }
}

impl Config {
    pub const ENV_SERVED_URL: &'static str = "PARITY_SERVED_URL";
    pub const ENV_MODEL_NAME: &'static str = "PARITY_MODEL_NAME";
    pub const ENV_TIMEOUT_SECS: &'static str = "PARITY_TIMEOUT_SECS";
    pub const ENV_FIXTURES_DIR: &'static str = "PARITY_FIXTURES_DIR";
    pub const ENV_RESULTS_DIR: &'static str = "PARITY_RESULTS_DIR";
    pub const ENV_RERANKER_PATH: &'static str = RerankerConfig::ENV_RERANKER_PATH;

    /// All variables read by [`Config::from_env`].
    pub const ENV_VARS: [&'static str; 6] = [
        Self::ENV_SERVED_URL,
        Self::ENV_MODEL_NAME,
        Self::ENV_TIMEOUT_SECS,
        Self::ENV_FIXTURES_DIR,
        Self::ENV_RESULTS_DIR,
        Self::ENV_RERANKER_PATH,
    ];

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let served_url = Self::parse_string_from_env(Self::ENV_SERVED_URL, defaults.served_url);
        let model_name = Self::parse_string_from_env(Self::ENV_MODEL_NAME, defaults.model_name);
        let timeout = Self::parse_timeout_from_env(defaults.timeout)?;
        let fixtures_dir = Self::parse_path_from_env(Self::ENV_FIXTURES_DIR, defaults.fixtures_dir);
        let results_dir = Self::parse_path_from_env(Self::ENV_RESULTS_DIR, defaults.results_dir);
        let reranker_path = RerankerConfig::from_env().model_path;

        Ok(Self {
            served_url,
            model_name,
            timeout,
            fixtures_dir,
            results_dir,
            reranker_path,
        })
    }

    /// Validates URLs and paths (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.served_url.starts_with("http://") || self.served_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl {
                value: self.served_url.clone(),
            });
        }

        if self.model_name.trim().is_empty() {
            return Err(ConfigError::EmptyModelName);
        }

        if self.results_dir.exists() && !self.results_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.results_dir.clone(),
            });
        }

        if let Some(ref path) = self.reranker_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    pub fn served_config(&self) -> ServedConfig {
        ServedConfig::new(&self.served_url)
            .with_model(&self.model_name)
            .with_timeout(self.timeout)
    }

    pub fn reranker_config(&self) -> RerankerConfig {
        match &self.reranker_path {
            Some(path) => RerankerConfig::new(path.clone()),
            None => RerankerConfig::stub(),
        }
    }

    /// Path of the result file written for `backend`.
    pub fn backend_results_path(&self, backend: &str) -> PathBuf {
        self.results_dir.join(format!("{backend}_results.json"))
    }

    pub fn comparison_path(&self) -> PathBuf {
        self.results_dir.join("comparison_results.json")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.results_dir.join("summary.json")
    }

    fn parse_timeout_from_env(default: Duration) -> Result<Duration, ConfigError> {
        match env::var(Self::ENV_TIMEOUT_SECS) {
            Ok(value) => {
                let secs: u64 = value
                    .trim()
                    .parse()
                    .map_err(|e| ConfigError::TimeoutParseError {
                        value: value.clone(),
                        source: e,
                    })?;

                if secs == 0 {
                    return Err(ConfigError::InvalidTimeout { value });
                }

                Ok(Duration::from_secs(secs))
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }
}
