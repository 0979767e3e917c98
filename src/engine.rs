//! Core lint engine
//!
//! Ties the pipeline together: parse -> normalize -> traverse ->
//! aggregate, and optionally -> fix -> re-verify. Traversal is a single
//! depth-first pre-order pass in document order, so violation ordering is
//! reproducible across runs on identical input. The engine never mutates
//! the tree.

use crate::adapter::{self, AdapterError};
use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::document::{Document, Element, Language, Node};
use crate::fixer;
use crate::rule::{DuplicateRuleError, NodeKind, Registry, RuleContext};
use crate::rules;
use crate::violation::{Severity, Violation};
use rayon::prelude::*;

/// Result of linting one document.
#[derive(Debug, Default)]
pub struct LintReport {
    /// Ordered violations (span start ascending, registry order tie-break)
    pub violations: Vec<Violation>,
}

impl LintReport {
    pub fn error_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.violations.iter().filter(|v| !v.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.is_error())
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Exit status for the surrounding CLI: 0 for clean or warnings only,
    /// 1 for any error-severity violation. (2 is reserved for internal
    /// failures and decided by the caller.)
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            1
        } else {
            0
        }
    }

    /// Violations produced by the named rule
    pub fn by_rule(&self, rule: &str) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.rule == rule).collect()
    }
}

/// Result of a fix run: the patched text, what was applied, and the
/// verification re-lint of the patched text.
#[derive(Debug)]
pub struct FixReport {
    pub text: String,
    pub applied: usize,
    pub deferred: usize,
    /// Report from re-linting the patched text
    pub verified: LintReport,
}

/// The lint engine: a rule registry plus configuration. Stateless between
/// invocations; one instance can lint any number of documents, in
/// parallel if desired.
pub struct Linter {
    registry: Registry,
    config: Config,
}

impl Linter {
    pub fn new(registry: Registry, config: Config) -> Self {
        Self { registry, config }
    }

    /// Engine with the full built-in rule set.
    pub fn with_default_rules(config: Config) -> Result<Self, DuplicateRuleError> {
        Ok(Self::new(rules::default_registry()?, config))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lint one document (report-only mode).
    pub fn check(&self, source: &str, language: Language) -> Result<LintReport, AdapterError> {
        let raw = match language {
            Language::Html => crate::syntax::html::parse(source),
            Language::Css => crate::syntax::css::parse(source),
        };
        let document = adapter::normalize(raw, language)?;
        log::debug!(
            "linting {} document: {} nodes, {} rules",
            language,
            document.node_count(),
            self.registry.len()
        );

        let mut aggregator = Aggregator::new();
        let mut ancestors: Vec<&Element> = Vec::new();
        for node in &document.nodes {
            self.visit(node, &document, source, &mut ancestors, &mut aggregator);
        }
        Ok(LintReport {
            violations: aggregator.report(),
        })
    }

    /// Lint independent documents in parallel. The registry is shared
    /// read-only; each document gets its own aggregator.
    pub fn check_many(
        &self,
        inputs: &[(String, Language)],
    ) -> Vec<Result<LintReport, AdapterError>> {
        inputs
            .par_iter()
            .map(|(source, language)| self.check(source, *language))
            .collect()
    }

    /// One fix pass: lint, apply non-overlapping fixes, re-lint the
    /// patched text to verify.
    pub fn fix(&self, source: &str, language: Language) -> Result<FixReport, AdapterError> {
        let report = self.check(source, language)?;
        let outcome = fixer::apply(source, &report.violations, &self.registry);
        let verified = self.check(&outcome.text, language)?;
        Ok(FixReport {
            text: outcome.text,
            applied: outcome.applied,
            deferred: outcome.deferred,
            verified,
        })
    }

    /// Fix passes until convergence: overlapping fixes deferred in one
    /// pass are retried in the next. Bounded, since overlap chains are
    /// short in practice.
    pub fn fix_all(&self, source: &str, language: Language) -> Result<FixReport, AdapterError> {
        const MAX_PASSES: usize = 8;

        let mut text = source.to_string();
        let mut applied_total = 0;
        let mut last = self.fix(&text, language)?;
        applied_total += last.applied;
        text = last.text.clone();
        for _ in 1..MAX_PASSES {
            if last.applied == 0 || last.deferred == 0 {
                break;
            }
            last = self.fix(&text, language)?;
            applied_total += last.applied;
            text = last.text.clone();
        }
        Ok(FixReport {
            text,
            applied: applied_total,
            deferred: last.deferred,
            verified: last.verified,
        })
    }

    fn visit<'a>(
        &self,
        node: &'a Node,
        document: &'a Document,
        source: &'a str,
        ancestors: &mut Vec<&'a Element>,
        aggregator: &mut Aggregator,
    ) {
        let kind = NodeKind::of(node);
        {
            let ctx = RuleContext {
                source,
                language: document.language,
                config: &self.config,
                ancestors: ancestors.as_slice(),
                has_doctype: document.has_doctype,
            };
            for (priority, rule) in self.registry.rules_for(kind) {
                if !self.config.is_rule_enabled(rule.name()) {
                    continue;
                }
                match rule.evaluate(node, &ctx) {
                    Ok(violations) => {
                        for mut violation in violations {
                            violation.severity = self
                                .config
                                .severity_for(&violation.rule, violation.severity);
                            aggregator.push(priority, violation);
                        }
                    }
                    Err(error) => {
                        // One bad rule must not abort the run: surface the
                        // failure as a visible finding and keep going.
                        log::warn!("{}", error);
                        aggregator.push(
                            priority,
                            Violation::new(
                                rule.name(),
                                Severity::Error,
                                format!("rule evaluation failed: {}", error.message),
                                node.span(),
                            ),
                        );
                    }
                }
            }
        }
        if let Node::Element(element) = node {
            ancestors.push(element);
            for child in &element.children {
                self.visit(child, document, source, ancestors, aggregator);
            }
            ancestors.pop();
        }
    }
}
