//! Violation and fix value records

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a violation: advisory or blocking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory finding
    #[default]
    Warning,
    /// Blocking finding; drives a non-zero exit status
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(()),
        }
    }
}

/// A single literal text replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    /// Region to replace; an empty span is an insertion
    pub span: Span,
    pub replacement: String,
}

impl Edit {
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    /// An insertion at the given offset
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(Span::empty(at), text)
    }
}

/// A set of text replacements that together resolve one violation.
///
/// Edits are kept sorted by span start and must not overlap each other;
/// the constructor enforces both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    edits: Vec<Edit>,
}

impl Fix {
    pub fn new(mut edits: Vec<Edit>) -> Self {
        edits.sort_by_key(|e| (e.span.start, e.span.end));
        debug_assert!(
            edits.windows(2).all(|w| !w[0].span.overlaps(&w[1].span)),
            "edits within one fix must not overlap"
        );
        Self { edits }
    }

    pub fn single(span: Span, replacement: impl Into<String>) -> Self {
        Self::new(vec![Edit::new(span, replacement)])
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// A single rule failure tied to a source span. Immutable value record.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Name of the rule that produced this finding
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    /// Safe text replacements that resolve the finding, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Violation {
    pub fn new(rule: &str, severity: Severity, message: impl Into<String>, span: Span) -> Self {
        Self {
            rule: rule.to_string(),
            severity,
            message: message.into(),
            span,
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn has_fix(&self) -> bool {
        self.fix.as_ref().is_some_and(|f| !f.is_empty())
    }
}
