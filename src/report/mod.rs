//! Report generation

pub mod generator;

use crate::models::ConversionReport;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Json,
}

pub fn generate_report(report: &ConversionReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Markdown => Ok(generator::generate_markdown_report(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}
