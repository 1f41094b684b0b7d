//! Route matching logic.
//!
//! # Responsibilities
//! - Compare a normalized segment list against one route pattern
//! - Bind capture segments to their path values
//!
//! # Design Decisions
//! - Segment counts must be equal; no prefix or variadic matching
//! - Literal comparison is exact and case-sensitive
//! - First literal mismatch short-circuits the whole pattern
//! - Captures never bind an empty value

use crate::routing::pattern::{RoutePattern, Segment};

/// Result of comparing a path against a single pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome<'p, 's> {
    /// The pattern does not describe this path.
    NoMatch,
    /// Every segment matched and the pattern has no captures.
    MatchNoParams,
    /// Every segment matched; `(name, value)` bindings in URL order.
    MatchWithParams(Vec<(&'p str, &'s str)>),
}

impl MatchOutcome<'_, '_> {
    pub fn is_match(&self) -> bool {
        !matches!(self, MatchOutcome::NoMatch)
    }
}

/// Match `segments` (as produced by [`normalize`](crate::routing::normalize()))
/// against `pattern`.
pub fn match_segments<'p, 's>(segments: &[&'s str], pattern: &'p RoutePattern) -> MatchOutcome<'p, 's> {
    let expected = pattern.segments();
    if segments.len() != expected.len() {
        return MatchOutcome::NoMatch;
    }

    let mut bindings = Vec::new();
    for (segment, value) in expected.iter().zip(segments) {
        match segment {
            Segment::Capture(name) => {
                if value.is_empty() {
                    return MatchOutcome::NoMatch;
                }
                bindings.push((name.as_str(), *value));
            }
            Segment::Literal(literal) => {
                if literal != value {
                    return MatchOutcome::NoMatch;
                }
            }
        }
    }

    if bindings.is_empty() {
        MatchOutcome::MatchNoParams
    } else {
        MatchOutcome::MatchWithParams(bindings)
    }
}
