#![warn(missing_docs)]
//! # PrimeBench
//!
//! Benchmark harness for a boss/worker prime finder.
//!
//! A run goes through a fixed sequence of stages:
//! - **Configure**: validate `--max-prime` and `--worker-count`
//! - **Build**: run the build command (default `make`); failure is fatal
//! - **Supervise**: run `boss <workers> <max>` and time it
//! - **Read**: count the lines of `primes.txt`
//! - **Report**: print count, elapsed time, and primes per second
//! - **Cleanup**: remove the `data/` scratch directory, even after failures
//!
//! ## Quick Start
//!
//! ```text
//! $ primebench --max-prime 100000 --worker-count 8
//! Building boss with make...
//! Running ./build/boss with 8 workers up to 100000...
//! Cleaning up...
//! Results written to primes.txt
//! Found 9592 prime numbers in 0.84 seconds
//! Avg: 11419.05 primes/second
//! Done.
//! ```
//!
//! ## Testing Against a Stub
//!
//! ```ignore
//! use primebench::{HarnessSettings, Pipeline, RunRequest, SystemLauncher};
//!
//! let launcher = SystemLauncher::new();
//! let mut pipeline = Pipeline::new(&launcher, HarnessSettings::default());
//! let report = pipeline.run(RunRequest::new(1000), &mut std::io::stdout())?;
//! ```

pub use primebench_core::{
    ConfigError, LaunchError, ProcessExit, ProcessLauncher, RunConfig, RunResult, SystemLauncher,
};

pub use primebench_report::{OutputFormat, Report, RunSummary, format_human_output};

pub use primebench_cli::{
    BenchConfig, BuildError, CleanupError, Cli, FailureKind, HarnessError, HarnessSettings,
    Pipeline, ResultReadError, RunError, RunRequest, Stage, run, run_with_cli,
};
