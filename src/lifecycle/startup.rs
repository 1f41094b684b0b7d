//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and metrics
//! - Build the dispatcher and bind the listener
//! - Start the config watcher and signal handler
//!
//! # Design Decisions
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)

use std::error::Error;
use std::path::Path;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::{load_config, ConfigWatcher, RouterConfig};
use crate::http::HttpServer;
use crate::lifecycle::{shutdown::Shutdown, signals::spawn_signal_handler};
use crate::observability::{logging, metrics};

/// Run the service from a config file until a stop signal arrives.
pub async fn run_from_file(path: &Path, watch: bool) -> Result<(), Box<dyn Error>> {
    let config = load_config(path)?;
    logging::init(&config.observability)?;
    tracing::info!(path = ?path, "Configuration loaded");

    if !watch {
        let (_tx, rx) = mpsc::unbounded_channel();
        return serve(config, rx).await;
    }

    let (watcher, rx) = ConfigWatcher::new(path);
    let _watcher = watcher.run()?;
    serve(config, rx).await
}

/// Serve `config`, applying updates from `config_updates`.
pub async fn serve(
    config: RouterConfig,
    config_updates: mpsc::UnboundedReceiver<RouterConfig>,
) -> Result<(), Box<dyn Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        mount_prefix = %config.listener.mount_prefix,
        rules = config.routing.rules.len(),
        handlers = config.handlers.len(),
        "Starting rule-router v{}",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    spawn_signal_handler(shutdown);

    server.run(listener, config_updates, server_shutdown).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}
