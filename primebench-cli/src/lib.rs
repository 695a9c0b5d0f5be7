#![warn(missing_docs)]
//! PrimeBench CLI Library
//!
//! Builds the boss/worker prime finder, runs it with the requested worker
//! count and upper bound, times the run, counts the primes it wrote, and
//! prints throughput.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> std::process::ExitCode {
//!     primebench_cli::run()
//! }
//! ```

mod cleanup;
mod config;
mod error;
mod metadata;
mod pipeline;
mod results;
mod supervisor;

pub use cleanup::remove_scratch_dir;
pub use config::*;
pub use error::{BuildError, CleanupError, FailureKind, HarnessError, ResultReadError, RunError};
pub use pipeline::{HarnessSettings, Pipeline, RunRequest, Stage};
pub use results::count_results;
pub use supervisor::Supervisor;

use clap::Parser;
use clap::error::ErrorKind;
use primebench_core::{ConfigError, DEFAULT_WORKER_COUNT, ProcessLauncher, SystemLauncher};
use primebench_report::{OutputFormat, Report};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

/// PrimeBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "primebench")]
#[command(version, about = "Calculate prime numbers up to a maximum value and report throughput")]
pub struct Cli {
    /// The maximum prime number to calculate
    #[arg(long, allow_negative_numbers = true)]
    pub max_prime: Option<i64>,

    /// The number of worker processes to spawn
    #[arg(long, default_value_t = DEFAULT_WORKER_COUNT, allow_negative_numbers = true)]
    pub worker_count: i64,

    /// Configuration file (default: discover primebench.toml upwards)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Boss binary to run
    #[arg(long)]
    pub boss: Option<PathBuf>,

    /// Build command, run without arguments
    #[arg(long)]
    pub build_command: Option<PathBuf>,

    /// Skip the build step and use an existing boss binary
    #[arg(long)]
    pub skip_build: bool,

    /// Terminate the boss after this long (e.g., "30s", "5m")
    #[arg(long)]
    pub timeout: Option<String>,

    /// Output format: human, json
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse arguments, turning parse failures into configuration errors.
    ///
    /// `--help` and `--version` print and exit the process.
    pub fn resolve<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => Ok(cli),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => Err(argument_error(&e)),
        }
    }

    /// Raw run parameters, validated by the pipeline
    pub fn request(&self) -> RunRequest {
        RunRequest {
            max_prime: self.max_prime,
            worker_count: self.worker_count,
        }
    }
}

/// First line of clap's rendered message, without the `error: ` prefix
fn argument_error(e: &clap::Error) -> ConfigError {
    let rendered = e.render().to_string();
    let message = rendered
        .lines()
        .next()
        .map(|line| line.trim_start_matches("error: ").trim().to_string())
        .filter(|line| !line.is_empty())
        .unwrap_or_else(|| e.kind().to_string());
    ConfigError::Arguments(message)
}

/// Run the PrimeBench CLI against the real process launcher.
/// This is the main entry point for the `primebench` binary.
pub fn run() -> ExitCode {
    let cli = match Cli::resolve(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => return exit_with(&HarnessError::Config(e)),
    };

    init_logging(cli.verbose);

    let launcher = SystemLauncher::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run_with_cli(&cli, &launcher, &mut out) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => exit_with(&e),
    }
}

/// Run the pipeline with pre-parsed arguments and an injected launcher
pub fn run_with_cli<W: Write>(
    cli: &Cli,
    launcher: &dyn ProcessLauncher,
    out: &mut W,
) -> Result<Report, HarnessError> {
    let config = load_config(cli)?;
    let settings = resolve_settings(cli, &config)?;
    let mut pipeline = Pipeline::new(launcher, settings);
    pipeline.run(cli.request(), out)
}

fn exit_with(err: &HarnessError) -> ExitCode {
    eprintln!("Error: {}", err);
    ExitCode::from(err.exit_code())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "primebench=debug"
    } else {
        "primebench=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the explicit `--config` file, else a discovered one, else defaults.
///
/// An explicit file that fails to load is an error; a discovered one only
/// produces a warning.
fn load_config(cli: &Cli) -> Result<BenchConfig, ConfigError> {
    if let Some(path) = &cli.config {
        return BenchConfig::load(path).map_err(|e| ConfigError::File {
            path: path.display().to_string(),
            message: e.to_string(),
        });
    }

    let Some(path) = BenchConfig::discover() else {
        return Ok(BenchConfig::default());
    };
    match BenchConfig::load(&path) {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
            eprintln!("Warning: failed to load {}: {}", path.display(), e);
            Ok(BenchConfig::default())
        }
    }
}

/// Layer CLI flags over the file configuration
pub fn resolve_settings(cli: &Cli, config: &BenchConfig) -> Result<HarnessSettings, ConfigError> {
    let build_command = if cli.skip_build || config.build.skip {
        None
    } else {
        Some(
            cli.build_command
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.build.command)),
        )
    };

    let timeout = cli
        .timeout
        .as_deref()
        .or(config.boss.timeout.as_deref())
        .map(|raw| {
            BenchConfig::parse_duration(raw).map_err(|e| ConfigError::Invalid {
                field: "timeout",
                message: e.to_string(),
            })
        })
        .transpose()?;

    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(|message| ConfigError::Invalid {
            field: "format",
            message,
        })?;

    Ok(HarnessSettings {
        build_command,
        boss_binary: cli
            .boss
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.boss.binary)),
        output_file: PathBuf::from(&config.paths.output_file),
        scratch_dir: PathBuf::from(&config.paths.scratch_dir),
        timeout,
        format,
        report_path: cli.output.clone(),
    })
}
