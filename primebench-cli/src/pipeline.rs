//! Run Pipeline
//!
//! Drives one harness run from raw arguments to the printed summary.
//!
//! ## Pipeline Overview
//!
//! ```text
//! RunRequest (raw CLI values)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  configure  │  Validate into RunConfig
//! └──────┬──────┘
//!        ▼
//! ┌─────────────┐
//! │    build    │  Run the build command (optional)
//! └──────┬──────┘
//!        ▼
//! ┌─────────────┐
//! │  supervise  │  Run and time `boss <workers> <max>`
//! └──────┬──────┘
//!        ▼
//! ┌─────────────┐
//! │    read     │  Count lines in the results file
//! └──────┬──────┘
//!        ▼
//! ┌─────────────┐
//! │   report    │  Derive count, elapsed time, throughput
//! └──────┬──────┘
//!        ▼
//! ┌─────────────┐
//! │   cleanup   │  Remove the scratch directory, then print the summary
//! └─────────────┘
//! ```
//!
//! Any failure after configuration moves the pipeline to
//! [`Stage::Failed`] and still runs cleanup before returning the error.

use crate::cleanup::remove_scratch_dir;
use crate::error::{FailureKind, HarnessError};
use crate::metadata::build_report_meta;
use crate::results::{count_results, discard_stale_results};
use crate::supervisor::Supervisor;
use primebench_core::{DEFAULT_WORKER_COUNT, ProcessLauncher, RunConfig, RunResult};
use primebench_report::{OutputFormat, Report, render};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Everything the pipeline needs besides the run parameters
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessSettings {
    /// Build command, or `None` to skip the build
    pub build_command: Option<PathBuf>,
    /// Boss binary to launch
    pub boss_binary: PathBuf,
    /// Results file the boss writes
    pub output_file: PathBuf,
    /// Scratch directory the boss populates
    pub scratch_dir: PathBuf,
    /// Upper bound on the boss run; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Summary format
    pub format: OutputFormat,
    /// Write the summary here instead of the console
    pub report_path: Option<PathBuf>,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            build_command: Some(PathBuf::from("make")),
            boss_binary: PathBuf::from("./build/boss"),
            output_file: PathBuf::from("primes.txt"),
            scratch_dir: PathBuf::from("data"),
            timeout: None,
            format: OutputFormat::Human,
            report_path: None,
        }
    }
}

/// Raw run parameters, not yet validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRequest {
    pub max_prime: Option<i64>,
    pub worker_count: i64,
}

impl RunRequest {
    /// Request with the default worker count
    pub fn new(max_prime: i64) -> Self {
        Self {
            max_prime: Some(max_prime),
            worker_count: DEFAULT_WORKER_COUNT,
        }
    }
}

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unvalidated,
    Configured,
    Built,
    Supervised,
    ResultsRead,
    Reported,
    CleanedUp,
    Failed(FailureKind),
}

/// One harness run
pub struct Pipeline<'a> {
    launcher: &'a dyn ProcessLauncher,
    settings: HarnessSettings,
    stage: Stage,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline that launches processes through `launcher`
    pub fn new(launcher: &'a dyn ProcessLauncher, settings: HarnessSettings) -> Self {
        Self {
            launcher,
            settings,
            stage: Stage::Unvalidated,
        }
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Settings this pipeline runs with
    pub fn settings(&self) -> &HarnessSettings {
        &self.settings
    }

    /// Run every stage, writing progress and the summary to `out`
    pub fn run<W: Write>(
        &mut self,
        request: RunRequest,
        out: &mut W,
    ) -> Result<Report, HarnessError> {
        self.stage = Stage::Unvalidated;

        // Nothing external happens before the parameters are valid
        let config = match RunConfig::new(request.max_prime, request.worker_count) {
            Ok(config) => config,
            Err(e) => {
                self.stage = Stage::Failed(FailureKind::Config);
                return Err(e.into());
            }
        };
        self.advance(Stage::Configured);

        match self.execute(&config, out) {
            Ok(report) => Ok(report),
            Err(err) => {
                let cleaned = self.stage == Stage::CleanedUp;
                self.stage = Stage::Failed(err.kind());
                if !cleaned {
                    // The original error wins over a failing console
                    let _ = self.cleanup(out);
                }
                Err(err)
            }
        }
    }

    fn execute<W: Write>(
        &mut self,
        config: &RunConfig,
        out: &mut W,
    ) -> Result<Report, HarnessError> {
        let supervisor = Supervisor::new(self.launcher, self.settings.timeout);

        if let Some(command) = &self.settings.build_command {
            self.notice(
                out,
                format_args!("Building boss with {}...", command.display()),
            )?;
            supervisor.build(command)?;
        }
        self.advance(Stage::Built);

        discard_stale_results(&self.settings.output_file);
        self.notice(
            out,
            format_args!(
                "Running {} with {} workers up to {}...",
                self.settings.boss_binary.display(),
                config.worker_count,
                config.max_prime
            ),
        )?;
        let elapsed = supervisor.run_boss(&self.settings.boss_binary, config)?;
        self.advance(Stage::Supervised);

        let result_count = count_results(&self.settings.output_file)?;
        self.advance(Stage::ResultsRead);

        let result = RunResult::new(elapsed, result_count);
        let report = Report::new(
            build_report_meta(),
            *config,
            &self.settings.output_file,
            &result,
        );
        self.advance(Stage::Reported);

        self.cleanup(out)?;
        self.advance(Stage::CleanedUp);

        self.emit(&report, out)?;
        Ok(report)
    }

    /// Remove the scratch directory; failures are reported, not returned
    fn cleanup<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        self.notice(out, format_args!("Cleaning up..."))?;
        if let Err(e) = remove_scratch_dir(&self.settings.scratch_dir) {
            warn!(error = %e, "cleanup failed");
            eprintln!("Warning: {}", e);
        }
        Ok(())
    }

    fn emit<W: Write>(&self, report: &Report, out: &mut W) -> std::io::Result<()> {
        let rendered = render(report, self.settings.format).map_err(std::io::Error::other)?;
        match &self.settings.report_path {
            Some(path) => {
                std::fs::write(path, rendered)?;
                writeln!(out, "Report written to: {}", path.display())?;
            }
            None => out.write_all(rendered.as_bytes())?,
        }
        out.flush()
    }

    /// Progress line; goes to stderr when stdout carries the JSON document
    fn notice<W: Write>(&self, out: &mut W, line: std::fmt::Arguments<'_>) -> std::io::Result<()> {
        if self.settings.format == OutputFormat::Json && self.settings.report_path.is_none() {
            eprintln!("{}", line);
            Ok(())
        } else {
            writeln!(out, "{}", line)
        }
    }

    fn advance(&mut self, next: Stage) {
        info!(from = ?self.stage, to = ?next, "stage transition");
        self.stage = next;
    }
}
