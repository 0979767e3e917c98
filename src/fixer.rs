//! Fix application
//!
//! Applies the text replacements carried by fix-bearing violations to an
//! immutable source buffer. Overlapping fixes are never merged: the fix
//! from the highest-priority rule (registry insertion order) wins, and
//! the losers are deferred to a later pass. Accepted edits are applied in
//! descending span-start order so earlier offsets stay valid.

use crate::rule::Registry;
use crate::violation::{Edit, Violation};

/// Result of one fix pass.
#[derive(Debug, Clone)]
pub struct FixOutcome {
    /// Patched source text
    pub text: String,
    /// Fix-bearing violations whose edits were applied
    pub applied: usize,
    /// Fix-bearing violations deferred because of an overlap
    pub deferred: usize,
}

impl FixOutcome {
    /// Whether any edits changed the text
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// Apply the fixes carried by `violations` to `source`.
///
/// `applied + deferred` always equals the number of fix-bearing
/// violations; no two applied fixes' spans overlap.
pub fn apply(source: &str, violations: &[Violation], registry: &Registry) -> FixOutcome {
    // Candidates in priority order: registry insertion order first, then
    // span start, then report order for rules the registry doesn't know.
    let mut candidates: Vec<(usize, usize, &Violation)> = violations
        .iter()
        .enumerate()
        .filter(|(_, v)| v.has_fix())
        .map(|(i, v)| (registry.priority(&v.rule).unwrap_or(usize::MAX), i, v))
        .collect();
    candidates.sort_by_key(|(priority, i, v)| (*priority, v.span.start, *i));

    let mut accepted: Vec<&Edit> = Vec::new();
    let mut applied = 0;
    let mut deferred = 0;
    for (_, _, violation) in &candidates {
        let Some(fix) = violation.fix.as_ref() else {
            continue;
        };
        let conflicts = fix
            .edits()
            .iter()
            .any(|edit| accepted.iter().any(|a| a.span.overlaps(&edit.span)));
        if conflicts {
            log::debug!(
                "deferring fix from '{}' at {}..{}: overlaps an accepted fix",
                violation.rule,
                violation.span.start,
                violation.span.end
            );
            deferred += 1;
        } else {
            accepted.extend(fix.edits());
            applied += 1;
        }
    }

    // Descending offset application over a fresh buffer; the original
    // source is never mutated in place.
    accepted.sort_by(|a, b| (b.span.start, b.span.end).cmp(&(a.span.start, a.span.end)));
    let mut text = source.to_string();
    for edit in &accepted {
        text.replace_range(edit.span.start..edit.span.end, &edit.replacement);
    }

    FixOutcome {
        text,
        applied,
        deferred,
    }
}
