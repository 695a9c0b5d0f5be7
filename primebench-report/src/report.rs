//! Report Data Structures

use chrono::{DateTime, Utc};
use primebench_core::{RunConfig, RunResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete report for one harness run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub config: RunConfig,
    /// Where the boss wrote its results
    pub output_file: String,
    pub summary: RunSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub system: SystemInfo,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpu_cores: u32,
}

/// Derived metrics of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub result_count: u64,
    pub elapsed_secs: f64,
    /// Results per second; `None` when elapsed time was zero
    pub throughput: Option<f64>,
}

impl From<&RunResult> for RunSummary {
    fn from(result: &RunResult) -> Self {
        Self {
            result_count: result.result_count,
            elapsed_secs: result.elapsed_secs,
            throughput: result.throughput(),
        }
    }
}

impl Report {
    /// Assemble a report from a measured run
    pub fn new(meta: ReportMeta, config: RunConfig, output_file: &Path, result: &RunResult) -> Self {
        Self {
            meta,
            config,
            output_file: output_file.display().to_string(),
            summary: RunSummary::from(result),
        }
    }
}
