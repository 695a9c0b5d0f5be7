//! Error Taxonomy
//!
//! One error type per pipeline stage. Everything except [`CleanupError`] is
//! fatal and ends the run; the wrapping [`HarnessError`] names the stage in
//! its message and picks the process exit status.

use primebench_core::{ConfigError, LaunchError, ProcessExit};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The build command could not produce a boss binary
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("could not run build command {}: {source}", .command.display())]
    Spawn {
        command: PathBuf,
        #[source]
        source: LaunchError,
    },

    #[error("build command {} finished with {exit}", .command.display())]
    Failed { command: PathBuf, exit: ProcessExit },
}

/// The boss process did not complete successfully
#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not run boss {}: {source}", .binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: LaunchError,
    },

    #[error("boss {} finished with {exit}", .binary.display())]
    Failed { binary: PathBuf, exit: ProcessExit },

    #[error("boss {} did not finish within {after:?} and was terminated", .binary.display())]
    TimedOut { binary: PathBuf, after: Duration },
}

/// The boss exited cleanly but its results file cannot be read
#[derive(Debug, Error)]
pub enum ResultReadError {
    #[error("results file {} does not exist", .path.display())]
    Missing { path: PathBuf },

    #[error("results file {} is unreadable: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The scratch directory could not be removed; reported, never fatal
#[derive(Debug, Error)]
#[error("failed to remove scratch directory {}: {source}", .path.display())]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Which stage a fatal error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Config,
    Build,
    Run,
    ResultRead,
    Output,
}

/// Fatal harness error
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("build failed: {0}")]
    Build(#[from] BuildError),

    #[error("boss process failed: {0}")]
    Run(#[from] RunError),

    #[error("could not read results: {0}")]
    ResultRead(#[from] ResultReadError),

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl HarnessError {
    /// Stage the error originated from
    pub fn kind(&self) -> FailureKind {
        match self {
            HarnessError::Config(_) => FailureKind::Config,
            HarnessError::Build(_) => FailureKind::Build,
            HarnessError::Run(_) => FailureKind::Run,
            HarnessError::ResultRead(_) => FailureKind::ResultRead,
            HarnessError::Output(_) => FailureKind::Output,
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            FailureKind::Output => 1,
            FailureKind::Config => 2,
            FailureKind::Build => 3,
            FailureKind::Run => 4,
            FailureKind::ResultRead => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_stage() {
        let config = HarnessError::from(ConfigError::MissingMaxPrime);
        assert!(config.to_string().starts_with("configuration error:"));

        let build = HarnessError::from(BuildError::Failed {
            command: PathBuf::from("make"),
            exit: ProcessExit::with_code(2),
        });
        assert_eq!(
            build.to_string(),
            "build failed: build command make finished with exit code 2"
        );

        let run = HarnessError::from(RunError::Failed {
            binary: PathBuf::from("./build/boss"),
            exit: ProcessExit::with_code(1),
        });
        assert!(run.to_string().starts_with("boss process failed:"));

        let read = HarnessError::from(ResultReadError::Missing {
            path: PathBuf::from("primes.txt"),
        });
        assert_eq!(
            read.to_string(),
            "could not read results: results file primes.txt does not exist"
        );
    }

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let errors = [
            HarnessError::from(ConfigError::MissingMaxPrime),
            HarnessError::from(BuildError::Failed {
                command: PathBuf::from("make"),
                exit: ProcessExit::with_code(1),
            }),
            HarnessError::from(RunError::TimedOut {
                binary: PathBuf::from("boss"),
                after: Duration::from_secs(1),
            }),
            HarnessError::from(ResultReadError::Missing {
                path: PathBuf::from("primes.txt"),
            }),
        ];
        let codes: Vec<u8> = errors.iter().map(HarnessError::exit_code).collect();
        assert_eq!(codes, vec![2, 3, 4, 5]);
    }
}
