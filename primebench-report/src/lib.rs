#![warn(missing_docs)]
//! PrimeBench Report - Reporting
//!
//! Renders a finished run in one of two formats:
//! - Human (the fixed console summary)
//! - JSON (machine-readable)

mod human;
mod json;
mod report;

pub use human::{format_human_output, format_throughput_line};
pub use json::generate_json_report;
pub use report::{Report, ReportMeta, RunSummary, SystemInfo};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Render a report in the requested format
pub fn render(report: &Report, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Human => Ok(format_human_output(report)),
        OutputFormat::Json => generate_json_report(report).map(|mut json| {
            json.push('\n');
            json
        }),
    }
}
