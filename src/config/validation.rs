//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every rule pattern to catch malformed captures early
//! - Require a default target so routing can always produce a route
//! - Validate value ranges (timeouts > 0, addresses parse, status codes)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Handler coverage is checked when the dispatcher is built, since handlers
//!   may also be registered in code

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::{RoutePattern, RouteTarget, RoutingError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("rule {index}: {source}")]
    InvalidPattern {
        index: usize,
        #[source]
        source: RoutingError,
    },

    #[error("routing.default must be set")]
    MissingDefault,

    #[error("{field}: `{value}` is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("listener.mount_prefix `{0}` must be empty or start with `/`")]
    InvalidMountPrefix(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("handler {target}: status {status} is out of range")]
    InvalidStatus { target: RouteTarget, status: u16 },

    #[error("handler {0} is defined more than once")]
    DuplicateHandler(RouteTarget),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, rule) in config.routing.rules.iter().enumerate() {
        if let Err(source) = RoutePattern::parse(&rule.pattern) {
            errors.push(ValidationError::InvalidPattern { index, source });
        }
    }

    if config.routing.default.is_none() {
        errors.push(ValidationError::MissingDefault);
    }

    let prefix = &config.listener.mount_prefix;
    if !prefix.is_empty() && !prefix.starts_with('/') {
        errors.push(ValidationError::InvalidMountPrefix(prefix.clone()));
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.admin.enabled {
        check_address(&mut errors, "admin.bind_address", &config.admin.bind_address);
    }
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let mut seen = HashSet::new();
    for handler in &config.handlers {
        let target = handler.target();
        if !(100..=999).contains(&handler.status) {
            errors.push(ValidationError::InvalidStatus {
                target: target.clone(),
                status: handler.status,
            });
        }
        if !seen.insert(target.clone()) {
            errors.push(ValidationError::DuplicateHandler(target));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{HandlerConfig, RuleConfig};

    fn valid_config() -> RouterConfig {
        let mut config = RouterConfig::default();
        config.routing.default = Some(RouteTarget::new("Home", "index"));
        config
    }

    fn handler(controller: &str, status: u16) -> HandlerConfig {
        HandlerConfig {
            controller: controller.into(),
            action: "index".into(),
            status,
            content_type: "text/plain".into(),
            body: String::new(),
            arity: None,
        }
    }

    #[test]
    fn test_default_config_needs_default_target() {
        assert_eq!(
            validate_config(&RouterConfig::default()),
            Err(vec![ValidationError::MissingDefault])
        );
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid_config();
        config.routing.rules.push(RuleConfig {
            pattern: "/a/:".into(),
            controller: "A".into(),
            action: "b".into(),
        });
        config.listener.bind_address = "not-an-address".into();
        config.listener.mount_prefix = "app".into();
        config.timeouts.request_secs = 0;
        config.handlers = vec![handler("Home", 42), handler("Home", 200)];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::DuplicateHandler(RouteTarget::new("Home", "index"))));
    }

    #[test]
    fn test_disabled_sections_not_checked() {
        let mut config = valid_config();
        config.admin.bind_address = "bogus".into();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());
    }
}
