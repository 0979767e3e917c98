//! Violation collection, deduplication and deterministic ordering

use crate::span::Span;
use crate::violation::Violation;
use std::collections::HashSet;

/// Collects the violations produced during one traversal.
///
/// Ordering of the final report: primary key is span start offset,
/// tie-break is the producing rule's registry priority. Duplicates —
/// identical (rule, span, message) triples — are dropped on arrival,
/// which guards against a misbehaving rule firing twice for one node.
#[derive(Default)]
pub struct Aggregator {
    entries: Vec<(usize, Violation)>,
    seen: HashSet<(String, Span, String)>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation with the registry priority of its rule.
    pub fn push(&mut self, priority: usize, violation: Violation) {
        let key = (
            violation.rule.clone(),
            violation.span,
            violation.message.clone(),
        );
        if !self.seen.insert(key) {
            return;
        }
        self.entries.push((priority, violation));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any collected violation is error severity.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|(_, v)| v.is_error())
    }

    /// Consume the aggregator and return the ordered violation sequence.
    pub fn report(mut self) -> Vec<Violation> {
        self.entries
            .sort_by_key(|(priority, v)| (v.span.start, *priority));
        self.entries.into_iter().map(|(_, v)| v).collect()
    }
}
