//! Route pattern parsing.
//!
//! # Responsibilities
//! - Canonicalize the pattern string (single leading `/`)
//! - Split it into literal and capture segments
//! - Reject patterns that cannot bind parameters unambiguously
//!
//! # Design Decisions
//! - Parsed once at registration, immutable afterwards
//! - Empty tokens are dropped, mirroring path normalization
//! - `:` is the only sigil; there are no wildcards or optional segments

use std::fmt;

use crate::routing::error::RoutingError;

/// Prefix marking a segment as a named capture.
pub const CAPTURE_SIGIL: char = ':';

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// Binds any single path segment under the given name.
    Capture(String),
}

impl Segment {
    fn parse(token: &str, pattern: &str) -> Result<Self, RoutingError> {
        match token.strip_prefix(CAPTURE_SIGIL) {
            Some("") => Err(RoutingError::UnnamedParam {
                pattern: pattern.to_string(),
            }),
            Some(name) => Ok(Segment::Capture(name.to_string())),
            None => Ok(Segment::Literal(token.to_string())),
        }
    }
}

/// A parsed route pattern such as `/article/:slug`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern, prepending `/` when it is missing.
    pub fn parse(pattern: &str) -> Result<Self, RoutingError> {
        let source = if pattern.starts_with('/') {
            pattern.to_string()
        } else {
            format!("/{}", pattern)
        };

        let segments = source
            .split('/')
            .filter(|token| !token.is_empty())
            .map(|token| Segment::parse(token, &source))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen: Vec<&str> = Vec::new();
        for segment in &segments {
            if let Segment::Capture(name) = segment {
                if seen.contains(&name.as_str()) {
                    return Err(RoutingError::DuplicateParam {
                        pattern: source.clone(),
                        name: name.clone(),
                    });
                }
                seen.push(name);
            }
        }

        Ok(Self { source, segments })
    }

    /// The canonical pattern string, always starting with `/`.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of capture segments.
    pub fn capture_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Capture(_)))
            .count()
    }

    /// Capture names in declaration order.
    pub fn capture_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Capture(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
