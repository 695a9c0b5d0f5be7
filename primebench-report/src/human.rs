//! Human Output
//!
//! The console summary printed after a run, in fixed order:
//!
//! ```text
//! Results written to primes.txt
//! Found 15 prime numbers in 1.50 seconds
//! Avg: 10.00 primes/second
//! Done.
//! ```

use crate::report::{Report, RunSummary};

/// Shown in place of a rate when elapsed time was zero
const UNDEFINED_THROUGHPUT: &str = "n/a";

/// Format a report for terminal display
pub fn format_human_output(report: &Report) -> String {
    let summary = &report.summary;
    let mut output = String::new();

    output.push_str(&format!("Results written to {}\n", report.output_file));
    output.push_str(&format!(
        "Found {} prime numbers in {:.2} seconds\n",
        summary.result_count, summary.elapsed_secs
    ));
    output.push_str(&format_throughput_line(summary));
    output.push('\n');
    output.push_str("Done.\n");

    output
}

/// The `Avg:` line, with a sentinel instead of a division by zero
pub fn format_throughput_line(summary: &RunSummary) -> String {
    match summary.throughput {
        Some(rate) => format!("Avg: {:.2} primes/second", rate),
        None => format!("Avg: {} primes/second", UNDEFINED_THROUGHPUT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportMeta, SystemInfo};
    use primebench_core::{RunConfig, RunResult};
    use std::path::Path;

    fn report(result_count: u64, elapsed_secs: f64) -> Report {
        let meta = ReportMeta {
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
            system: SystemInfo {
                os: "linux".to_string(),
                arch: "x86_64".to_string(),
                cpu_cores: 1,
            },
        };
        let result = RunResult {
            elapsed_secs,
            result_count,
        };
        Report::new(
            meta,
            RunConfig::new(Some(50), 2).unwrap(),
            Path::new("primes.txt"),
            &result,
        )
    }

    #[test]
    fn test_line_order() {
        let output = format_human_output(&report(100, 2.0));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Results written to primes.txt",
                "Found 100 prime numbers in 2.00 seconds",
                "Avg: 50.00 primes/second",
                "Done.",
            ]
        );
    }

    #[test]
    fn test_zero_elapsed_uses_sentinel() {
        let output = format_human_output(&report(100, 0.0));
        assert!(output.contains("Found 100 prime numbers in 0.00 seconds"));
        assert!(output.contains("Avg: n/a primes/second"));
        assert!(!output.contains("inf"));
    }

    #[test]
    fn test_rounding() {
        let summary = report(15, 1.5).summary;
        assert_eq!(format_throughput_line(&summary), "Avg: 10.00 primes/second");

        let summary = report(2, 3.0).summary;
        assert_eq!(format_throughput_line(&summary), "Avg: 0.67 primes/second");
    }
}
