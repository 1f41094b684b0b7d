//! Handler capability and registry.
//!
//! # Responsibilities
//! - Define what a route target runs (`Handler`)
//! - Map route targets to handlers
//! - Check, before serving, that every routable target has a handler
//!
//! # Design Decisions
//! - Registry is built once and validated eagerly (fail fast at startup)
//! - Handlers are shared as `Arc<dyn Handler>` so a registry clones cheaply
//! - Any `Fn(&Params) -> Result<Reply, HandlerError>` is a handler

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::routing::{Params, RouteTarget, Router};

/// Response produced by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8".to_string(),
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// Errors raised by a handler while running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler received the wrong number of parameters.
    #[error("expected {expected} parameters, got {found}")]
    Arity { expected: usize, found: usize },

    /// The handler failed.
    #[error("{0}")]
    Failed(String),
}

/// Code run for a route target.
pub trait Handler: Send + Sync {
    /// Run with the parameters bound by the route, in URL order.
    /// Receives an empty list when the route bound nothing.
    fn invoke(&self, params: &Params) -> Result<Reply, HandlerError>;

    /// Fixed parameter count, if the handler has one.
    fn arity(&self) -> Option<usize> {
        None
    }
}

impl<F> Handler for F
where
    F: Fn(&Params) -> Result<Reply, HandlerError> + Send + Sync,
{
    fn invoke(&self, params: &Params) -> Result<Reply, HandlerError> {
        self(params)
    }
}

/// Wraps a handler with a declared arity.
pub struct WithArity<H> {
    inner: H,
    arity: usize,
}

impl<H: Handler> WithArity<H> {
    pub fn new(inner: H, arity: usize) -> Self {
        Self { inner, arity }
    }
}

impl<H: Handler> Handler for WithArity<H> {
    fn invoke(&self, params: &Params) -> Result<Reply, HandlerError> {
        self.inner.invoke(params)
    }

    fn arity(&self) -> Option<usize> {
        Some(self.arity)
    }
}

/// Where a target is referenced from in a router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRole {
    Rule(String),
    Default,
    Error,
}

impl fmt::Display for TargetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRole::Rule(pattern) => write!(f, "rule `{}`", pattern),
            TargetRole::Default => f.write_str("default target"),
            TargetRole::Error => f.write_str("error target"),
        }
    }
}

/// Problems found when checking a registry against a router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no handler registered for {target} ({role})")]
    MissingHandler { target: RouteTarget, role: TargetRole },

    #[error("handler {target} expects {expected} parameters but {role} binds {found}")]
    ArityMismatch {
        target: RouteTarget,
        role: TargetRole,
        expected: usize,
        found: usize,
    },
}

/// Lookup table from route target to handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<RouteTarget, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `target`, replacing any previous one.
    pub fn register<H: Handler + 'static>(&mut self, target: RouteTarget, handler: H) -> &mut Self {
        self.register_arc(target, Arc::new(handler))
    }

    pub fn register_arc(&mut self, target: RouteTarget, handler: Arc<dyn Handler>) -> &mut Self {
        if self.handlers.insert(target.clone(), handler).is_some() {
            tracing::debug!(route = %target, "Handler replaced");
        }
        self
    }

    /// Add every handler of `other`, replacing on conflict.
    pub fn extend(&mut self, other: HandlerRegistry) {
        self.handlers.extend(other.handlers);
    }

    pub fn get(&self, target: &RouteTarget) -> Option<Arc<dyn Handler>> {
        self.handlers.get(target).cloned()
    }

    pub fn contains(&self, target: &RouteTarget) -> bool {
        self.handlers.contains_key(target)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Check that every target `router` can produce has a handler whose
    /// arity (when declared) fits. Returns every problem found.
    pub fn validate(&self, router: &Router) -> Result<(), Vec<RegistryError>> {
        let mut errors = Vec::new();

        let rules = router
            .rules()
            .map(|rule| (&rule.target, TargetRole::Rule(rule.pattern.to_string()), rule.pattern.capture_count()));
        let fixed = router
            .default_target()
            .map(|t| (t, TargetRole::Default, 0))
            .into_iter()
            .chain(router.error_target().map(|t| (t, TargetRole::Error, 0)));

        for (target, role, found) in rules.chain(fixed) {
            match self.handlers.get(target) {
                None => errors.push(RegistryError::MissingHandler {
                    target: target.clone(),
                    role,
                }),
                Some(handler) => {
                    if let Some(expected) = handler.arity() {
                        if expected != found {
                            errors.push(RegistryError::ArityMismatch {
                                target: target.clone(),
                                role,
                                expected,
                                found,
                            });
                        }
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut targets: Vec<_> = self.handlers.keys().collect();
        targets.sort();
        f.debug_struct("HandlerRegistry")
            .field("targets", &targets)
            .finish()
    }
}
