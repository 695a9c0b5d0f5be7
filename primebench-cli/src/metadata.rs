//! System Metadata Collection
//!
//! Stamps each report with the tool version, a UTC timestamp, and the
//! platform the run happened on.

use chrono::Utc;
use primebench_report::{ReportMeta, SystemInfo};

/// Build report metadata for a run finishing now
pub fn build_report_meta() -> ReportMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu_cores: num_cpus(),
    };

    ReportMeta {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system,
    }
}

/// Get number of available CPU cores
fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}
