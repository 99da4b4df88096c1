//! Environment-backed configuration for the batch runner.
//!
//! Most settings have defaults. Override with `KEEL_*` environment variables. Gate thresholds
//! are configured separately through [`GateConfig`](crate::gate::GateConfig).

pub mod error;


pub use error::ConfigError;

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

/// Batch runner configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `KEEL_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON Lines file of candidates. Default: stdin.
    pub input_path: Option<PathBuf>,

    /// Where verdicts are written, one JSON object per line. Default: stdout.
    pub output_path: Option<PathBuf>,

    /// Duplicate index snapshot loaded before and saved after a run.
    pub snapshot_path: Option<PathBuf>,

    /// Evaluation worker count. Default: available parallelism.
    pub workers: usize,
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: None,
            output_path: None,
            snapshot_path: None,
            workers: default_workers(),
        }
    }
}

impl Config {
    const ENV_INPUT_PATH: &'static str = "KEEL_INPUT_PATH";
    const ENV_OUTPUT_PATH: &'static str = "KEEL_OUTPUT_PATH";
    const ENV_INDEX_SNAPSHOT: &'static str = "KEEL_INDEX_SNAPSHOT";
    const ENV_WORKERS: &'static str = "KEEL_WORKERS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            input_path: parse_optional_path_from_env(Self::ENV_INPUT_PATH),
            output_path: parse_optional_path_from_env(Self::ENV_OUTPUT_PATH),
            snapshot_path: parse_optional_path_from_env(Self::ENV_INDEX_SNAPSHOT),
            workers: parse_from_env(Self::ENV_WORKERS, defaults.workers)?,
        })
    }

    /// Validates paths and basic invariants (does not create files).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Zero {
                name: Self::ENV_WORKERS,
            });
        }

        if let Some(ref path) = self.input_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if let Some(ref path) = self.snapshot_path
            && path.exists()
            && !path.is_file()
        {
            return Err(ConfigError::NotAFile { path: path.clone() });
        }

        Ok(())
    }
}

/// Reads `name` and parses it, returning `default` when unset or blank.
pub(crate) fn parse_from_env<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    name,
                    value: value.clone(),
                    reason: e.to_string(),
                })
        }
        _ => Ok(default),
    }
}

fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
    env::var(var_name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
