//! Pattern-based request routing.
//!
//! Resolves request paths against an ordered table of `/literal/:capture`
//! patterns and dispatches to the controller/action registered for the first
//! matching rule, falling back to a default target.

pub mod admin;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use dispatch::{Dispatcher, Handler, HandlerRegistry, Reply};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{ResolvedRoute, RouteTarget, Router};
