//! Human-readable text output formatter

use super::ReportFormatter;
use crate::engine::LintReport;
use crate::span::line_col;
use crate::violation::{Severity, Violation};
use colored::*;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show summary counts at the end
    pub show_summary: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_summary: true,
        }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn severity_str(&self, severity: Severity) -> ColoredString {
        let s = format!("{}", severity);
        if !self.colored {
            return s.normal();
        }
        match severity {
            Severity::Error => s.red().bold(),
            Severity::Warning => s.yellow().bold(),
        }
    }

    fn format_violation(&self, violation: &Violation, source: &str) -> String {
        let (line, column) = line_col(source, violation.span.start);
        let fixable = if violation.has_fix() { " (fixable)" } else { "" };
        format!(
            "{}:{}: {} {} [{}]{}",
            line,
            column,
            self.severity_str(violation.severity),
            violation.message,
            violation.rule,
            fixable
        )
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &LintReport, source: &str) -> String {
        let mut output = String::new();
        for violation in &report.violations {
            output.push_str(&self.format_violation(violation, source));
            output.push('\n');
        }
        if self.show_summary {
            if report.is_clean() {
                output.push_str("no problems found\n");
            } else {
                output.push_str(&format!(
                    "{} problem(s): {} error(s), {} warning(s)\n",
                    report.violations.len(),
                    report.error_count(),
                    report.warning_count()
                ));
            }
        }
        output
    }
}
