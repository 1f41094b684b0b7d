//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → dispatcher.rs (router.resolve → ResolvedRoute)
//!     → handler.rs (registry lookup by controller/action)
//!     → Handler::invoke(params)
//!     → Reply, or error target's Reply on failure
//!
//! Startup / reload:
//!     Router + HandlerRegistry
//!     → registry.validate(router) (every target covered, arities fit)
//!     → Dispatcher (immutable, shared via ArcSwap)
//! ```

pub mod dispatcher;
pub mod handler;
pub mod template;

pub use dispatcher::{DispatchError, Dispatcher};
pub use handler::{Handler, HandlerError, HandlerRegistry, RegistryError, Reply, TargetRole, WithArity};
pub use template::{TemplateError, TemplateHandler};
