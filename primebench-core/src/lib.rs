#![warn(missing_docs)]
//! PrimeBench Core - Run Parameters and Process Launching
//!
//! Provides the pieces every pipeline stage shares:
//! - **Run parameters**: [`RunConfig`] validated once per invocation
//! - **Run results**: [`RunResult`] with a zero-safe throughput
//! - **Process launching**: the [`ProcessLauncher`] seam used for both the
//!   build step and the boss process, with [`SystemLauncher`] as the real
//!   implementation

mod launcher;
mod run;

pub use launcher::{LaunchError, ProcessExit, ProcessLauncher, SystemLauncher};
pub use run::{ConfigError, DEFAULT_WORKER_COUNT, MIN_MAX_PRIME, RunConfig, RunResult};
