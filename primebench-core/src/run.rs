//! Run Parameters and Results
//!
//! `RunConfig` is built once from raw command-line values and never changes
//! afterwards. `RunResult` is derived after the boss process exits and its
//! output file has been counted.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Worker count used when `--worker-count` is not given
pub const DEFAULT_WORKER_COUNT: i64 = 4;

/// Smallest accepted upper bound
pub const MIN_MAX_PRIME: u64 = 2;

/// Invalid run parameters, caught before anything is built or launched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required value for --max-prime")]
    MissingMaxPrime,

    #[error("invalid value {value} for --{field}: {reason}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        reason: &'static str,
    },

    #[error("invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },

    #[error("invalid arguments: {0}")]
    Arguments(String),

    #[error("invalid configuration file {path}: {message}")]
    File { path: String, message: String },
}

impl ConfigError {
    /// Name of the offending field, when the error concerns a single one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::MissingMaxPrime => Some("max-prime"),
            ConfigError::OutOfRange { field, .. } | ConfigError::Invalid { field, .. } => {
                Some(*field)
            }
            ConfigError::Arguments(_) | ConfigError::File { .. } => None,
        }
    }
}

/// Validated parameters for one boss run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Upper bound handed to the boss (always >= 2)
    pub max_prime: u64,
    /// Number of workers the boss should spawn (always >= 1)
    pub worker_count: u32,
}

impl RunConfig {
    /// Validate raw values.
    ///
    /// Values arrive signed so that `0` and negative input is rejected here
    /// with the field named, instead of wrapping or being lost in parsing.
    pub fn new(max_prime: Option<i64>, worker_count: i64) -> Result<Self, ConfigError> {
        let raw_max = max_prime.ok_or(ConfigError::MissingMaxPrime)?;
        if raw_max < MIN_MAX_PRIME as i64 {
            return Err(ConfigError::OutOfRange {
                field: "max-prime",
                value: raw_max,
                reason: "must be at least 2",
            });
        }

        if worker_count < 1 {
            return Err(ConfigError::OutOfRange {
                field: "worker-count",
                value: worker_count,
                reason: "must be at least 1",
            });
        }
        let worker_count = u32::try_from(worker_count).map_err(|_| ConfigError::OutOfRange {
            field: "worker-count",
            value: worker_count,
            reason: "too many workers",
        })?;

        Ok(Self {
            max_prime: raw_max as u64,
            worker_count,
        })
    }

    /// Positional arguments for the boss: worker count, then maximum value
    pub fn boss_args(&self) -> Vec<String> {
        vec![self.worker_count.to_string(), self.max_prime.to_string()]
    }
}

/// Measured outcome of a successful boss run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Wall-clock seconds between launch and exit
    pub elapsed_secs: f64,
    /// Number of lines in the output file
    pub result_count: u64,
}

impl RunResult {
    /// Build a result from a measured duration
    pub fn new(elapsed: Duration, result_count: u64) -> Self {
        Self {
            elapsed_secs: elapsed.as_secs_f64(),
            result_count,
        }
    }

    /// Results per second, or `None` when the run was too fast to measure
    pub fn throughput(&self) -> Option<f64> {
        if self.elapsed_secs > 0.0 && self.elapsed_secs.is_finite() {
            Some(self.result_count as f64 / self.elapsed_secs)
        } else {
            None
        }
    }
}
