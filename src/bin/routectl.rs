use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

use rule_router::config::load_config;
use rule_router::dispatch::{Dispatcher, HandlerRegistry};
use rule_router::routing::Router;

#[derive(Parser)]
#[command(name = "routectl")]
#[command(about = "Inspect and test rule-router routing tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a path against a config file
    Resolve {
        path: String,
        #[arg(short, long, default_value = "router.toml")]
        config: PathBuf,
        /// Override the configured mount prefix
        #[arg(short, long)]
        mount: Option<String>,
    },
    /// Validate a config file, including handler coverage
    Check {
        #[arg(short, long, default_value = "router.toml")]
        config: PathBuf,
    },
    /// Show the live routing table of a running server
    Routes {
        #[arg(short, long, default_value = "http://localhost:8081")]
        url: String,
        #[arg(short, long, default_value = "admin-secret-key")]
        key: String,
    },
    /// Check a running server's status
    Status {
        #[arg(short, long, default_value = "http://localhost:8081")]
        url: String,
        #[arg(short, long, default_value = "admin-secret-key")]
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve { path, config, mount } => {
            let config = load_config(&config)?;
            let router = Router::from_config(&config.routing)?;
            let mount = mount.unwrap_or(config.listener.mount_prefix);
            let route = router.resolve(&path, &mount)?;
            println!("{}", serde_json::to_string_pretty(&route)?);
        }
        Commands::Check { config: path } => {
            let config = load_config(&path)?;
            let router = Router::from_config(&config.routing)?;
            let handlers = HandlerRegistry::from_config(&config.handlers)?;
            match Dispatcher::new(router, handlers) {
                Ok(dispatcher) => {
                    let summary = json!({
                        "config": path.display().to_string(),
                        "rules": dispatcher.router().rules().len(),
                        "handlers": dispatcher.handlers().len(),
                        "valid": true,
                    });
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                }
                Err(errors) => {
                    for error in &errors {
                        eprintln!("error: {}", error);
                    }
                    std::process::exit(1);
                }
            }
        }
        Commands::Routes { url, key } => {
            admin_get(&url, &key, "/admin/routes").await?;
        }
        Commands::Status { url, key } => {
            admin_get(&url, &key, "/admin/status").await?;
        }
    }

    Ok(())
}

async fn admin_get(url: &str, key: &str, endpoint: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);

    let res = reqwest::Client::new()
        .get(format!("{}{}", url, endpoint))
        .headers(headers)
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
