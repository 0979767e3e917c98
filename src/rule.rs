//! Rule contract and registry

use crate::config::Config;
use crate::document::{Element, Language, Node};
use crate::violation::{Severity, Violation};
use std::collections::HashMap;
use thiserror::Error;

/// The node variants a rule can declare interest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element = 0,
    Declaration = 1,
    Comment = 2,
    Text = 3,
}

impl NodeKind {
    pub fn of(node: &Node) -> NodeKind {
        match node {
            Node::Element(_) => NodeKind::Element,
            Node::Declaration(_) => NodeKind::Declaration,
            Node::Comment(_) => NodeKind::Comment,
            Node::Text(_) => NodeKind::Text,
        }
    }
}

/// A small set of node kinds, used for dispatch filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeKindSet(u8);

impl NodeKindSet {
    pub const EMPTY: NodeKindSet = NodeKindSet(0);

    pub const fn of(kinds: &[NodeKind]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < kinds.len() {
            bits |= 1 << kinds[i] as u8;
            i += 1;
        }
        NodeKindSet(bits)
    }

    pub const fn contains(&self, kind: NodeKind) -> bool {
        self.0 & (1 << kind as u8) != 0
    }
}

/// Read-only context handed to a rule along with the node under
/// inspection. Everything here is either document-global metadata or the
/// node's ancestor chain; rules never see sibling subtrees.
pub struct RuleContext<'a> {
    /// Full source text (for span slicing and line-shape checks)
    pub source: &'a str,
    pub language: Language,
    pub config: &'a Config,
    /// Ancestor elements from the root down to the node's parent
    pub ancestors: &'a [&'a Element],
    /// Whether the document opened with a doctype (HTML only)
    pub has_doctype: bool,
}

impl RuleContext<'_> {
    /// Nesting depth of the current node (0 for top-level nodes)
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }
}

/// Failure inside a rule implementation. Recovered by the engine: the
/// rule's remaining findings for the node are skipped and a synthetic
/// error-severity violation is emitted in their place.
#[derive(Debug, Clone, Error)]
#[error("rule '{rule}' failed to evaluate: {message}")]
pub struct RuleError {
    pub rule: String,
    pub message: String,
}

impl RuleError {
    pub fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// A named, stateless style rule: a predicate plus an optional fixer,
/// independent of every other rule.
pub trait Rule: Send + Sync {
    /// Unique rule name (e.g. "tag-case")
    fn name(&self) -> &'static str;

    /// Default severity; may be overridden per-rule in [`Config`]
    fn severity(&self) -> Severity {
        Severity::Warning
    }

    /// Node variants this rule wants to inspect
    fn interested_in(&self) -> NodeKindSet;

    /// Evaluate one node. Must be a pure function of the node and the
    /// provided context, so every rule is testable in isolation.
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError>;
}

/// Registering a rule under a name that is already taken.
#[derive(Debug, Clone, Error)]
#[error("rule '{0}' is already registered")]
pub struct DuplicateRuleError(pub String);

/// Ordered set of active rules. Insertion order doubles as priority:
/// it breaks ties between violations at the same span and picks the
/// winner among overlapping fixes.
#[derive(Default)]
pub struct Registry {
    rules: Vec<Box<dyn Rule>>,
    names: HashMap<&'static str, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule. Fails if the name is already taken.
    pub fn register(&mut self, rule: Box<dyn Rule>) -> Result<(), DuplicateRuleError> {
        let name = rule.name();
        if self.names.contains_key(name) {
            return Err(DuplicateRuleError(name.to_string()));
        }
        self.names.insert(name, self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Insertion-order priority of a rule (lower wins)
    pub fn priority(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.priority(name).map(|i| self.rules[i].as_ref())
    }

    /// All rules with their priorities, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &dyn Rule)> {
        self.rules.iter().enumerate().map(|(i, r)| (i, r.as_ref()))
    }

    /// Rules interested in the given node kind, in insertion order
    pub fn rules_for(&self, kind: NodeKind) -> impl Iterator<Item = (usize, &dyn Rule)> {
        self.iter().filter(move |(_, r)| r.interested_in().contains(kind))
    }
}
