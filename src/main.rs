//! rule-router
//!
//! Serves a table of URL patterns, each bound to a controller/action handler.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────────────────────────────────────────────────┐
//!     ────────────────────┼─▶ http server ──▶ dispatcher ──▶ routing engine      │
//!                         │                       │          normalize → match   │
//!                         │                       ▼                              │
//!     Client Response     │                handler registry                      │
//!     ◀───────────────────┼── response ◀── Handler::invoke(params)               │
//!                         │                                                      │
//!                         │  config (TOML, hot reload) · observability · admin   │
//!                         └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use rule_router::lifecycle::startup;

#[derive(Parser)]
#[command(name = "rule-router")]
#[command(about = "Pattern-based request router", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "router.toml")]
    config: PathBuf,

    /// Reload routes when the configuration file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    startup::run_from_file(&args.config, args.watch).await
}
