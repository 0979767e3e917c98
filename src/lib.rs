//! Guidelint - style guide linter for HTML and CSS
//!
//! A fast, fix-capable linter that enforces code-guide conventions on
//! HTML and CSS sources: lowercase tags and attributes, double-quoted
//! attribute values, shallow selectors, shorthand hex colors and the
//! rest of the usual front-end style canon.
//!
//! # Architecture
//!
//! ```text
//! source -> syntax -> adapter -> Linter -> LintReport
//!                                   \-> fixer -> patched source
//! ```
//!
//! The tokenizers in [`syntax`] are lenient and never fail; the
//! [`adapter`] normalizes their raw trees into the closed [`document`]
//! node model that rules see. The [`engine::Linter`] walks the tree in
//! document order, dispatches to registered rules and collects an
//! ordered, deduplicated report. In fix mode the [`fixer`] applies
//! non-overlapping text edits and the patched text is re-linted to
//! verify the fixes held.
//!
//! # Example
//!
//! ```
//! use guidelint::{Config, Language, Linter};
//!
//! let linter = Linter::with_default_rules(Config::default()).unwrap();
//! let report = linter.check("<DIV class=btn>x</DIV>", Language::Html).unwrap();
//! assert!(!report.is_clean());
//!
//! let fixed = linter.fix_all("<DIV class=btn>x</DIV>", Language::Html).unwrap();
//! assert_eq!(fixed.text, r#"<div class="btn">x</div>"#);
//! ```

pub mod adapter;
pub mod aggregator;
pub mod config;
pub mod document;
pub mod engine;
pub mod fixer;
pub mod output;
pub mod rule;
pub mod rules;
pub mod span;
pub mod syntax;
pub mod violation;

// Re-export main types
pub use adapter::AdapterError;
pub use config::{Config, QuoteStyle};
pub use document::{Document, Language, Node};
pub use engine::{FixReport, LintReport, Linter};
pub use fixer::FixOutcome;
pub use output::{JsonFormatter, ReportFormatter, TextFormatter};
pub use rule::{Registry, Rule, RuleContext, RuleError};
pub use span::Span;
pub use violation::{Edit, Fix, Severity, Violation};
