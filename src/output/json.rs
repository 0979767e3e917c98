//! JSON output formatter

use super::ReportFormatter;
use crate::engine::LintReport;
use crate::span::line_col;
use serde::Serialize;

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    violations: Vec<JsonViolation<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonViolation<'a> {
    rule: &'a str,
    severity: String,
    message: &'a str,
    line: usize,
    column: usize,
    start: usize,
    end: usize,
    fixable: bool,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    errors: usize,
    warnings: usize,
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &LintReport, source: &str) -> String {
        let violations = report
            .violations
            .iter()
            .map(|v| {
                let (line, column) = line_col(source, v.span.start);
                JsonViolation {
                    rule: &v.rule,
                    severity: v.severity.to_string(),
                    message: &v.message,
                    line,
                    column,
                    start: v.span.start,
                    end: v.span.end,
                    fixable: v.has_fix(),
                }
            })
            .collect();
        let output = JsonOutput {
            violations,
            summary: JsonSummary {
                total: report.violations.len(),
                errors: report.error_count(),
                warnings: report.warning_count(),
            },
        };
        let result = if self.pretty {
            serde_json::to_string_pretty(&output)
        } else {
            serde_json::to_string(&output)
        };
        // Serialization of plain strings and counters cannot fail
        result.unwrap_or_else(|_| String::from("{}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;
    use crate::violation::{Severity, Violation};

    #[test]
    fn test_json_shape() {
        let report = LintReport {
            violations: vec![Violation::new(
                "no-important",
                Severity::Error,
                "avoid '!important' on 'color'",
                Span::new(15, 25),
            )],
        };
        let out = JsonFormatter::new().format(&report, "a { color: red !important; }");
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["violations"][0]["rule"], "no-important");
        assert_eq!(parsed["violations"][0]["severity"], "error");
        assert_eq!(parsed["violations"][0]["line"], 1);
        assert_eq!(parsed["violations"][0]["fixable"], false);
        assert_eq!(parsed["summary"]["errors"], 1);
        assert_eq!(parsed["summary"]["total"], 1);
    }

    #[test]
    fn test_empty_report() {
        let out = JsonFormatter::new().format(&LintReport::default(), "");
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["summary"]["total"], 0);
        assert_eq!(parsed["violations"].as_array().unwrap().len(), 0);
    }
}
