//! Configuration loading from primebench.toml
//!
//! Harness settings can be kept in a `primebench.toml` file next to the boss
//! sources. The file is discovered by walking up from the current directory;
//! command-line flags override anything it sets.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the configuration file looked up during discovery
pub const CONFIG_FILE_NAME: &str = "primebench.toml";

/// PrimeBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BenchConfig {
    /// Build step configuration
    #[serde(default)]
    pub build: BuildConfig,
    /// Boss process configuration
    #[serde(default)]
    pub boss: BossConfig,
    /// Files shared with the boss process
    #[serde(default)]
    pub paths: PathsConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Build step configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Program run without arguments to produce the boss binary
    #[serde(default = "default_build_command")]
    pub command: String,
    /// Skip the build step entirely
    #[serde(default)]
    pub skip: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: default_build_command(),
            skip: false,
        }
    }
}

fn default_build_command() -> String {
    "make".to_string()
}

/// Boss process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossConfig {
    /// Path of the boss binary produced by the build
    #[serde(default = "default_boss_binary")]
    pub binary: String,
    /// Give up on the boss after this long (e.g., "30s", "5m"); unset waits forever
    #[serde(default)]
    pub timeout: Option<String>,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            binary: default_boss_binary(),
            timeout: None,
        }
    }
}

fn default_boss_binary() -> String {
    "./build/boss".to_string()
}

/// Files shared with the boss process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Results file written by the boss, one prime per line
    #[serde(default = "default_output_file")]
    pub output_file: String,
    /// Scratch directory populated by the boss, removed after the run
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_file: default_output_file(),
            scratch_dir: default_scratch_dir(),
        }
    }
}

fn default_output_file() -> String {
    "primes.txt".to_string()
}
fn default_scratch_dir() -> String {
    "data".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl BenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Find `primebench.toml` by walking up from the current directory
    pub fn discover() -> Option<PathBuf> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(&dir)
    }

    /// Find `primebench.toml` by walking up from `start`
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m")
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(anyhow::anyhow!("Duration must be positive: {}", s));
        }

        let seconds_per_unit = match unit_part.to_lowercase().as_str() {
            "ms" => 0.001,
            "s" | "" => 1.0,
            "m" | "min" => 60.0,
            "h" => 3600.0,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Duration::try_from_secs_f64(value * seconds_per_unit)
            .map_err(|_| anyhow::anyhow!("Duration too large: {}", s))
    }
}
