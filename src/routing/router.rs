//! Route lookup and resolution.
//!
//! # Responsibilities
//! - Store rules in registration order
//! - Hold the default and error targets
//! - Resolve a request path to a target and its positional parameters
//!
//! # Design Decisions
//! - First match wins; registration order is priority order
//! - Immutable while routing (`&self`), so it can be shared behind an `Arc`
//! - Re-registering an identical pattern replaces its target in place
//! - Falling back to the default target is not an error; having no default is

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RoutingConfig;
use crate::routing::error::RoutingError;
use crate::routing::matcher::{match_segments, MatchOutcome};
use crate::routing::normalize::normalize;
use crate::routing::params::Params;
use crate::routing::pattern::RoutePattern;

/// Identifies a handler: a controller name and one of its actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteTarget {
    pub controller: String,
    pub action: String,
}

impl RouteTarget {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.controller, self.action)
    }
}

/// A pattern paired with the target it routes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: RoutePattern,
    pub target: RouteTarget,
}

/// How a [`ResolvedRoute`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteSource {
    /// The rule at `index` (registration order) matched.
    Rule { index: usize },
    /// No rule matched; the default target was used.
    Fallback,
}

impl RouteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteSource::Rule { .. } => "rule",
            RouteSource::Fallback => "fallback",
        }
    }
}

/// The outcome of a single routing decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    pub target: RouteTarget,
    pub params: Params,
    pub source: RouteSource,
}

/// Ordered rule table with default and error targets.
///
/// ```
/// use rule_router::routing::{Router, RouteTarget};
///
/// let mut router = Router::new();
/// router.add_rule("/article/:slug", RouteTarget::new("Article", "show")).unwrap();
/// router.set_default_target(RouteTarget::new("Home", "index"));
///
/// let route = router.resolve("/article/my-post", "").unwrap();
/// assert_eq!(route.target, RouteTarget::new("Article", "show"));
/// assert_eq!(route.params.values().collect::<Vec<_>>(), vec!["my-post"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Router {
    rules: Vec<Rule>,
    default_target: Option<RouteTarget>,
    error_target: Option<RouteTarget>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a router from its configuration, registering rules in order.
    pub fn from_config(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let mut router = Router::new();
        for rule in &config.rules {
            router.add_rule(&rule.pattern, rule.target())?;
        }
        if let Some(target) = &config.default {
            router.set_default_target(target.clone());
        }
        if let Some(target) = &config.error {
            router.set_error_target(target.clone());
        }
        Ok(router)
    }

    /// Register a rule. Patterns are canonicalized to start with `/`.
    ///
    /// A pattern equal to one already registered keeps that rule's position
    /// and replaces its target.
    pub fn add_rule(&mut self, pattern: &str, target: RouteTarget) -> Result<(), RoutingError> {
        let pattern = RoutePattern::parse(pattern)?;

        match self.rules.iter_mut().find(|rule| rule.pattern == pattern) {
            Some(existing) => {
                tracing::debug!(
                    pattern = %pattern,
                    previous = %existing.target,
                    route = %target,
                    "Replacing target of existing rule"
                );
                existing.target = target;
            }
            None => {
                tracing::debug!(pattern = %pattern, route = %target, "Rule registered");
                self.rules.push(Rule { pattern, target });
            }
        }
        Ok(())
    }

    pub fn set_default_target(&mut self, target: RouteTarget) {
        self.default_target = Some(target);
    }

    /// Register the target a dispatcher should fall back to when dispatching
    /// fails. The router itself never resolves to it.
    pub fn set_error_target(&mut self, target: RouteTarget) {
        self.error_target = Some(target);
    }

    pub fn default_target(&self) -> Option<&RouteTarget> {
        self.default_target.as_ref()
    }

    pub fn error_target(&self) -> Option<&RouteTarget> {
        self.error_target.as_ref()
    }

    /// Registered rules in priority order.
    pub fn rules(&self) -> impl ExactSizeIterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Evaluate the rules only; `None` when nothing matches.
    pub fn find(&self, path: &str, mount_prefix: &str) -> Option<ResolvedRoute> {
        let segments = normalize(path, mount_prefix);

        self.rules.iter().enumerate().find_map(|(index, rule)| {
            let params = match match_segments(&segments, &rule.pattern) {
                MatchOutcome::NoMatch => return None,
                MatchOutcome::MatchNoParams => Params::new(),
                MatchOutcome::MatchWithParams(bindings) => bindings.into_iter().collect(),
            };
            Some(ResolvedRoute {
                target: rule.target.clone(),
                params,
                source: RouteSource::Rule { index },
            })
        })
    }

    /// Resolve `path` to a target, falling back to the default target.
    pub fn resolve(&self, path: &str, mount_prefix: &str) -> Result<ResolvedRoute, RoutingError> {
        if let Some(route) = self.find(path, mount_prefix) {
            tracing::trace!(path, route = %route.target, params = route.params.len(), "Rule matched");
            return Ok(route);
        }

        match &self.default_target {
            Some(target) => {
                tracing::trace!(path, route = %target, "No rule matched, using default target");
                Ok(ResolvedRoute {
                    target: target.clone(),
                    params: Params::new(),
                    source: RouteSource::Fallback,
                })
            }
            None => Err(RoutingError::NoDefaultTarget {
                path: path.to_string(),
            }),
        }
    }
}
