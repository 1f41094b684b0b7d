//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (path, mount prefix)
//!     → normalize.rs (strip mount prefix, split, drop empty segments)
//!     → matcher.rs (compare segments against each rule's pattern)
//!     → router.rs (first match wins, else default target)
//!     → Return: ResolvedRoute { target, params } or NoDefaultTarget
//!
//! Route registration (at startup / reload):
//!     pattern string
//!     → pattern.rs (canonicalize, parse, reject unnamed/duplicate captures)
//!     → appended to the Router's ordered rule list
//! ```
//!
//! # Design Decisions
//! - Routes compiled at registration, immutable while routing
//! - No regex, no wildcards: literal and `:name` segments only
//! - Deterministic: same input always resolves to the same route
//! - First match wins (ordered by registration)

pub mod error;
pub mod matcher;
pub mod normalize;
pub mod params;
pub mod pattern;
pub mod router;

pub use error::RoutingError;
pub use matcher::{match_segments, MatchOutcome};
pub use normalize::normalize;
pub use params::{Param, Params};
pub use pattern::{RoutePattern, Segment};
pub use router::{ResolvedRoute, RouteSource, RouteTarget, Router, Rule};
