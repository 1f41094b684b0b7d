//! Request dispatch.
//!
//! # Responsibilities
//! - Resolve the request path through the router
//! - Look up and invoke the handler for the resolved target
//! - Fall back to the error target when lookup or invocation fails
//!
//! # Design Decisions
//! - Handler coverage is checked when the dispatcher is built, not per request
//! - One attempt per request; resolution is deterministic, retrying is pointless
//! - The error target is tried once; its own failure surfaces the original error

use std::sync::Arc;

use thiserror::Error;

use crate::dispatch::handler::{Handler, HandlerError, HandlerRegistry, RegistryError, Reply};
use crate::observability::metrics;
use crate::routing::{Params, RouteSource, RouteTarget, Router, RoutingError};

/// Errors produced while dispatching a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The router could not produce a target at all.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// The resolved target has no handler.
    #[error("no handler registered for {target}")]
    HandlerNotFound { target: RouteTarget },

    /// The handler ran and failed.
    #[error("handler {target} failed: {source}")]
    Handler {
        target: RouteTarget,
        #[source]
        source: HandlerError,
    },
}

/// A router paired with the handlers for every target it can produce.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    router: Router,
    handlers: HandlerRegistry,
}

impl Dispatcher {
    /// Build a dispatcher, failing if any routable target lacks a handler.
    pub fn new(router: Router, handlers: HandlerRegistry) -> Result<Self, Vec<RegistryError>> {
        handlers.validate(&router)?;
        tracing::debug!(
            rules = router.rules().len(),
            handlers = handlers.len(),
            "Dispatcher ready"
        );
        Ok(Self { router, handlers })
    }

    /// Build a dispatcher without checking handler coverage.
    pub fn new_unchecked(router: Router, handlers: HandlerRegistry) -> Self {
        Self { router, handlers }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Resolve `path` and run the matching handler.
    pub fn dispatch(&self, path: &str, mount_prefix: &str) -> Result<Reply, DispatchError> {
        let route = match self.router.resolve(path, mount_prefix) {
            Ok(route) => route,
            Err(e) => {
                tracing::error!(path, error = %e, "Routing failed");
                return Err(e.into());
            }
        };
        metrics::record_resolution(route.source, &route.target);

        if let RouteSource::Rule { index } = route.source {
            tracing::debug!(
                path,
                rule = index,
                controller = %route.target.controller,
                action = %route.target.action,
                params = ?route.params,
                "Route resolved"
            );
        } else {
            tracing::debug!(
                path,
                controller = %route.target.controller,
                action = %route.target.action,
                "No rule matched, using default target"
            );
        }

        match self.invoke(&route.target, &route.params) {
            Ok(reply) => Ok(reply),
            Err(err) => self.recover(path, err),
        }
    }

    fn invoke(&self, target: &RouteTarget, params: &Params) -> Result<Reply, DispatchError> {
        let handler = self
            .handlers
            .get(target)
            .ok_or_else(|| DispatchError::HandlerNotFound {
                target: target.clone(),
            })?;

        call(handler, params).map_err(|source| DispatchError::Handler {
            target: target.clone(),
            source,
        })
    }

    fn recover(&self, path: &str, err: DispatchError) -> Result<Reply, DispatchError> {
        let Some(error_target) = self.router.error_target() else {
            tracing::warn!(path, error = %err, "Dispatch failed, no error target registered");
            return Err(err);
        };

        tracing::warn!(
            path,
            error = %err,
            controller = %error_target.controller,
            action = %error_target.action,
            "Dispatch failed, invoking error target"
        );

        match self.invoke(error_target, &Params::new()) {
            Ok(reply) => Ok(reply),
            Err(fallback_err) => {
                tracing::error!(path, error = %fallback_err, "Error target failed");
                Err(err)
            }
        }
    }
}

fn call(handler: Arc<dyn Handler>, params: &Params) -> Result<Reply, HandlerError> {
    if let Some(expected) = handler.arity() {
        if expected != params.len() {
            return Err(HandlerError::Arity {
                expected,
                found: params.len(),
            });
        }
    }
    handler.invoke(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::handler::WithArity;
    use crate::dispatch::template::TemplateHandler;

    fn blog_router() -> Router {
        let mut router = Router::new();
        router.add_rule("/", RouteTarget::new("Home", "index")).unwrap();
        router
            .add_rule("/article/:slug", RouteTarget::new("Article", "show"))
            .unwrap();
        router.set_default_target(RouteTarget::new("Home", "index"));
        router
    }

    fn blog_handlers() -> HandlerRegistry {
        let mut handlers = HandlerRegistry::new();
        handlers
            .register(RouteTarget::new("Home", "index"), TemplateHandler::new(200, "home").unwrap())
            .register(
                RouteTarget::new("Article", "show"),
                TemplateHandler::new(200, "article {{ slug }}").unwrap().with_arity(1),
            );
        handlers
    }

    fn failing(_: &Params) -> Result<Reply, HandlerError> {
        Err(HandlerError::Failed("boom".into()))
    }

    #[test]
    fn test_dispatch_with_params() {
        let dispatcher = Dispatcher::new(blog_router(), blog_handlers()).unwrap();
        let reply = dispatcher.dispatch("/article/my-post", "").unwrap();
        assert_eq!(reply.body, "article my-post");
    }

    #[test]
    fn test_dispatch_fallback() {
        let dispatcher = Dispatcher::new(blog_router(), blog_handlers()).unwrap();
        let reply = dispatcher.dispatch("/unknown/path", "").unwrap();
        assert_eq!(reply.body, "home");
    }

    #[test]
    fn test_missing_handler_rejected_at_build() {
        let mut handlers = HandlerRegistry::new();
        handlers.register(RouteTarget::new("Home", "index"), TemplateHandler::new(200, "home").unwrap());
        let errors = Dispatcher::new(blog_router(), handlers).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_no_default_target() {
        let dispatcher = Dispatcher::new(Router::new(), HandlerRegistry::new()).unwrap();
        assert_eq!(
            dispatcher.dispatch("/", ""),
            Err(DispatchError::Routing(RoutingError::NoDefaultTarget { path: "/".into() }))
        );
    }

    #[test]
    fn test_handler_not_found_without_error_target() {
        let dispatcher = Dispatcher::new_unchecked(blog_router(), HandlerRegistry::new());
        assert_eq!(
            dispatcher.dispatch("/", ""),
            Err(DispatchError::HandlerNotFound {
                target: RouteTarget::new("Home", "index")
            })
        );
    }

    #[test]
    fn test_error_target_recovers_failure() {
        let mut router = blog_router();
        router.set_error_target(RouteTarget::new("Error", "show"));
        let mut handlers = blog_handlers();
        handlers
            .register(RouteTarget::new("Article", "show"), WithArity::new(failing, 1))
            .register(RouteTarget::new("Error", "show"), TemplateHandler::new(500, "oops").unwrap());

        let dispatcher = Dispatcher::new(router, handlers).unwrap();
        let reply = dispatcher.dispatch("/article/x", "").unwrap();
        assert_eq!(reply.status, 500);
        assert_eq!(reply.body, "oops");
    }

    #[test]
    fn test_failing_error_target_surfaces_original() {
        let mut router = blog_router();
        router.set_error_target(RouteTarget::new("Error", "show"));
        let mut handlers = blog_handlers();
        handlers
            .register(RouteTarget::new("Home", "index"), failing)
            .register(RouteTarget::new("Error", "show"), failing);

        let dispatcher = Dispatcher::new(router, handlers).unwrap();
        assert_eq!(
            dispatcher.dispatch("/", ""),
            Err(DispatchError::Handler {
                target: RouteTarget::new("Home", "index"),
                source: HandlerError::Failed("boom".into()),
            })
        );
    }

    #[test]
    fn test_arity_checked_on_invoke() {
        let mut handlers = blog_handlers();
        handlers.register(
            RouteTarget::new("Article", "show"),
            WithArity::new(
                |p: &Params| -> Result<Reply, HandlerError> { Ok(Reply::ok(p.len().to_string())) },
                2,
            ),
        );
        let dispatcher = Dispatcher::new_unchecked(blog_router(), handlers);
        assert_eq!(
            dispatcher.dispatch("/article/x", ""),
            Err(DispatchError::Handler {
                target: RouteTarget::new("Article", "show"),
                source: HandlerError::Arity { expected: 2, found: 1 },
            })
        );
    }
}
