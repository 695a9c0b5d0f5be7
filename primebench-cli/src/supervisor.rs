//! Supervisor
//!
//! Runs the two external programs: the build command, then the boss. Only
//! exit statuses are inspected. The boss run is timed with a monotonic clock
//! taken right before launch and right after exit, so build time never leaks
//! into the measurement.

use crate::error::{BuildError, RunError};
use primebench_core::{LaunchError, ProcessLauncher, RunConfig};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Drives external processes through a [`ProcessLauncher`]
pub struct Supervisor<'a> {
    launcher: &'a dyn ProcessLauncher,
    timeout: Option<Duration>,
}

impl<'a> Supervisor<'a> {
    /// Create a supervisor; `timeout` bounds the boss run only
    pub fn new(launcher: &'a dyn ProcessLauncher, timeout: Option<Duration>) -> Self {
        Self { launcher, timeout }
    }

    /// Run the build command with no arguments
    pub fn build(&self, command: &Path) -> Result<(), BuildError> {
        info!(command = %command.display(), "building boss");
        let exit = self
            .launcher
            .launch(command, &[], None)
            .map_err(|source| BuildError::Spawn {
                command: command.to_path_buf(),
                source,
            })?;

        if !exit.success() {
            return Err(BuildError::Failed {
                command: command.to_path_buf(),
                exit,
            });
        }
        Ok(())
    }

    /// Run `boss <worker_count> <max_prime>` and return its wall-clock time
    pub fn run_boss(&self, binary: &Path, config: &RunConfig) -> Result<Duration, RunError> {
        let args = config.boss_args();

        let start = Instant::now();
        let outcome = self.launcher.launch(binary, &args, self.timeout);
        let elapsed = start.elapsed();

        let exit = outcome.map_err(|source| match source {
            LaunchError::TimedOut { after } => RunError::TimedOut {
                binary: binary.to_path_buf(),
                after,
            },
            source => RunError::Spawn {
                binary: binary.to_path_buf(),
                source,
            },
        })?;

        if !exit.success() {
            return Err(RunError::Failed {
                binary: binary.to_path_buf(),
                exit,
            });
        }

        debug!(elapsed_secs = elapsed.as_secs_f64(), "boss finished");
        Ok(elapsed)
    }
}
