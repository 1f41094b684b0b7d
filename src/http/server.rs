//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all dispatch handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener, serve the admin API when enabled
//! - Apply configuration reloads by swapping the dispatcher atomically

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::RouterConfig;
use crate::dispatch::{Dispatcher, HandlerRegistry, RegistryError, TemplateError};
use crate::http::request::{request_id, request_id_header, MakeRequestUuid};
use crate::observability::metrics;
use crate::routing::{Router as RuleRouter, RoutingError};

/// Errors raised while building the service from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid routing table: {0}")]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("handler registry incomplete: {}", join(.0))]
    Handlers(Vec<RegistryError>),
}

fn join(errors: &[RegistryError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Everything a request needs, swapped as a unit on reload.
#[derive(Debug)]
pub struct ServiceState {
    pub dispatcher: Dispatcher,
    pub config: RouterConfig,
}

impl ServiceState {
    /// Build the dispatcher for `config`. `extra` handlers are registered
    /// first; handlers defined in the config take precedence.
    pub fn build(config: RouterConfig, extra: &HandlerRegistry) -> Result<Self, ServerError> {
        let router = RuleRouter::from_config(&config.routing)?;
        let mut handlers = extra.clone();
        handlers.extend(HandlerRegistry::from_config(&config.handlers)?);
        let dispatcher = Dispatcher::new(router, handlers).map_err(ServerError::Handlers)?;
        Ok(Self { dispatcher, config })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<ServiceState>>,
}

impl AppState {
    pub fn new(state: ServiceState) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(state)),
        }
    }
}

/// HTTP server for the router.
pub struct HttpServer {
    router: Router,
    state: AppState,
    extra_handlers: HandlerRegistry,
}

impl HttpServer {
    /// Create a server whose handlers all come from the configuration.
    pub fn new(config: RouterConfig) -> Result<Self, ServerError> {
        Self::with_handlers(config, HandlerRegistry::new())
    }

    /// Create a server with additional handlers registered in code.
    pub fn with_handlers(config: RouterConfig, handlers: HandlerRegistry) -> Result<Self, ServerError> {
        let request_secs = config.timeouts.request_secs;
        let state = AppState::new(ServiceState::build(config, &handlers)?);
        let router = Self::build_router(request_secs, state.clone());
        Ok(Self {
            router,
            state,
            extra_handlers: handlers,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(request_secs: u64, state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request_id_header()))
            .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Run the server until `shutdown` fires, applying `config_updates` as
    /// they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let admin = {
            let current = self.state.inner.load_full();
            if current.config.admin.enabled {
                let admin_listener = TcpListener::bind(&current.config.admin.bind_address).await?;
                tracing::info!(address = %admin_listener.local_addr()?, "Admin API starting");
                let admin_app = setup_admin_router(self.state.clone());
                let mut admin_shutdown = shutdown.resubscribe();
                Some(tokio::spawn(async move {
                    let served = axum::serve(admin_listener, admin_app)
                        .with_graceful_shutdown(async move {
                            let _ = admin_shutdown.recv().await;
                        })
                        .await;
                    if let Err(e) = served {
                        tracing::error!(error = %e, "Admin API stopped with error");
                    }
                }))
            } else {
                None
            }
        };

        let reload_state = self.state.clone();
        let extra = self.extra_handlers.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match ServiceState::build(config, &extra) {
                    Ok(next) => {
                        tracing::info!(
                            rules = next.dispatcher.router().rules().len(),
                            "Routing table reloaded"
                        );
                        reload_state.inner.store(Arc::new(next));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected configuration reload, keeping current routes");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        if let Some(admin) = admin {
            let _ = admin.await;
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: resolve the path and run the target's handler.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let span = tracing::debug_span!(
        "dispatch",
        request_id = %request_id(&request),
        method = %request.method(),
        path = %request.uri().path(),
    );
    let _entered = span.enter();

    let current = state.inner.load();
    let path = request.uri().path();
    let response = match current
        .dispatcher
        .dispatch(path, &current.config.listener.mount_prefix)
    {
        Ok(reply) => reply.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Dispatch failed");
            e.into_response()
        }
    };

    metrics::record_request(response.status().as_u16(), start);
    response
}
