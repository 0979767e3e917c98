//! Output formatters for lint reports

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::engine::LintReport;

/// Output formatter trait
pub trait ReportFormatter: Send + Sync {
    /// Format an entire report against the source it was produced from
    fn format(&self, report: &LintReport, source: &str) -> String;
}
