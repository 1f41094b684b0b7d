//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::RouteTarget;

/// Root configuration for the router service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address, mount prefix).
    pub listener: ListenerConfig,

    /// Rules plus default and error targets.
    pub routing: RoutingConfig,

    /// Handlers answering for route targets.
    pub handlers: Vec<HandlerConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path the application is mounted under (e.g., "/app").
    /// Stripped from request paths before matching.
    pub mount_prefix: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            mount_prefix: String::new(),
        }
    }
}

/// Routing table configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RoutingConfig {
    /// Target used when no rule matches.
    pub default: Option<RouteTarget>,

    /// Target a dispatcher falls back to when dispatching fails.
    pub error: Option<RouteTarget>,

    /// Rules in priority order (first match wins).
    pub rules: Vec<RuleConfig>,
}

/// A single routing rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Pattern such as "/article/:slug".
    pub pattern: String,

    /// Controller name of the target.
    pub controller: String,

    /// Action name of the target.
    pub action: String,
}

impl RuleConfig {
    pub fn target(&self) -> RouteTarget {
        RouteTarget::new(&self.controller, &self.action)
    }
}

/// A handler answering with a templated response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandlerConfig {
    pub controller: String,

    pub action: String,

    /// Response status code (default: 200).
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response content type.
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// Body template (minijinja); captures by name, or positionally via `params[i]`.
    #[serde(default)]
    pub body: String,

    /// Number of parameters the handler expects, if fixed.
    #[serde(default)]
    pub arity: Option<usize>,
}

impl HandlerConfig {
    pub fn target(&self) -> RouteTarget {
        RouteTarget::new(&self.controller, &self.action)
    }
}

fn default_status() -> u16 {
    200
}

fn default_content_type() -> String {
    "text/plain; charset=utf-8".to_string()
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty output for development, JSON for production.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config: RouterConfig = toml::from_str(
            r#"
            [routing]
            default = { controller = "Home", action = "index" }
            "#,
        )
        .unwrap();

        assert_eq!(config.routing.default, Some(RouteTarget::new("Home", "index")));
        assert!(config.routing.rules.is_empty());
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_full_config() {
        let config: RouterConfig = toml::from_str(
            r#"
            [listener]
            mount_prefix = "/app"

            [routing]
            default = { controller = "Home", action = "index" }
            error = { controller = "Error", action = "show" }

            [[routing.rules]]
            pattern = "/article/:slug"
            controller = "Article"
            action = "show"

            [[handlers]]
            controller = "Article"
            action = "show"
            body = "article {{ slug }}"
            arity = 1

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.mount_prefix, "/app");
        assert_eq!(config.routing.rules[0].target(), RouteTarget::new("Article", "show"));
        assert_eq!(config.handlers[0].status, 200);
        assert_eq!(config.handlers[0].arity, Some(1));
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
