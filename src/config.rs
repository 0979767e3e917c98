//! Engine configuration
//!
//! The core accepts an already-parsed structure; reading it from a config
//! file on disk is the caller's responsibility.

use crate::violation::Severity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Quote style enforced on HTML attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Double,
    Single,
}

impl QuoteStyle {
    pub fn quote_char(&self) -> char {
        match self {
            QuoteStyle::Double => '"',
            QuoteStyle::Single => '\'',
        }
    }
}

/// Linter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rules to run; `None` runs every registered rule
    pub enabled_rules: Option<BTreeSet<String>>,

    /// Per-rule severity overrides (rule name -> severity)
    pub severity_overrides: HashMap<String, Severity>,

    /// Maximum compound selectors per complex CSS selector
    pub max_selector_depth: usize,

    /// Spaces per indentation level
    pub indent_width: usize,

    /// Quote style for HTML attribute values
    pub quote_style: QuoteStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled_rules: None,
            severity_overrides: HashMap::new(),
            max_selector_depth: 3,
            indent_width: 2,
            quote_style: QuoteStyle::Double,
        }
    }
}

impl Config {
    /// Whether the named rule should run
    pub fn is_rule_enabled(&self, name: &str) -> bool {
        self.enabled_rules
            .as_ref()
            .is_none_or(|set| set.contains(name))
    }

    /// Effective severity for a rule, honoring overrides
    pub fn severity_for(&self, name: &str, default: Severity) -> Severity {
        self.severity_overrides
            .get(name)
            .copied()
            .unwrap_or(default)
    }

    /// Restrict the run to the given rules
    pub fn with_only(mut self, rules: &[&str]) -> Self {
        self.enabled_rules = Some(rules.iter().map(|r| r.to_string()).collect());
        self
    }
}
