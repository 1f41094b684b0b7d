//! Routing error definitions.

use thiserror::Error;

/// Errors surfaced by the routing engine.
///
/// Matching itself never fails; every variant here is a configuration
/// problem, caught either at registration or when no route can be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// A capture segment consisted of the sigil alone (`/user/:`).
    #[error("pattern `{pattern}` contains a parameter without a name")]
    UnnamedParam { pattern: String },

    /// The same capture name appears more than once in a pattern.
    #[error("pattern `{pattern}` binds parameter `{name}` more than once")]
    DuplicateParam { pattern: String, name: String },

    /// No rule matched and no default target was registered.
    #[error("no rule matched `{path}` and no default target is registered")]
    NoDefaultTarget { path: String },
}
