//! Configuration-defined handlers.
//!
//! Bodies are `minijinja` templates compiled when the registry is built, so a
//! broken template fails startup (or the reload) rather than a request.
//! Named captures are exposed under their own names and the positional
//! sequence under `params`:
//!
//! ```text
//! body = "post {{ postId }} by {{ params[0] }}"
//! ```

use std::collections::BTreeMap;

use minijinja::{Environment, Value};
use thiserror::Error;

use crate::config::HandlerConfig;
use crate::dispatch::handler::{Handler, HandlerError, HandlerRegistry, Reply};
use crate::routing::{Params, RouteTarget};

/// Context key holding the parameter values in URL order.
pub const POSITIONAL_KEY: &str = "params";

const BODY: &str = "body";

/// A handler body that failed to compile.
#[derive(Debug, Error)]
#[error("invalid body template for {target}: {source}")]
pub struct TemplateError {
    pub target: RouteTarget,
    #[source]
    pub source: minijinja::Error,
}

/// Replies with a fixed status and a body rendered from a template.
#[derive(Debug, Clone)]
pub struct TemplateHandler {
    status: u16,
    content_type: String,
    env: Environment<'static>,
    arity: Option<usize>,
}

impl TemplateHandler {
    /// Compile `body` into a handler replying with `status`.
    pub fn new(status: u16, body: impl Into<String>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template_owned(BODY, body.into())?;
        Ok(Self {
            status,
            content_type: "text/plain; charset=utf-8".to_string(),
            env,
            arity: None,
        })
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    fn render(&self, params: &Params) -> Result<String, minijinja::Error> {
        let mut context: BTreeMap<&str, Value> = params
            .iter()
            .map(|(name, value)| (name, Value::from(value)))
            .collect();
        // The positional sequence shadows a capture literally named `params`.
        context.insert(POSITIONAL_KEY, Value::from(params.values().map(str::to_owned).collect::<Vec<_>>()));

        self.env.get_template(BODY)?.render(context)
    }
}

impl TryFrom<&HandlerConfig> for TemplateHandler {
    type Error = TemplateError;

    fn try_from(config: &HandlerConfig) -> Result<Self, Self::Error> {
        let handler = TemplateHandler::new(config.status, config.body.clone())
            .map_err(|source| TemplateError {
                target: config.target(),
                source,
            })?
            .with_content_type(&config.content_type);

        Ok(match config.arity {
            Some(arity) => handler.with_arity(arity),
            None => handler,
        })
    }
}

impl Handler for TemplateHandler {
    fn invoke(&self, params: &Params) -> Result<Reply, HandlerError> {
        let body = self
            .render(params)
            .map_err(|e| HandlerError::Failed(e.to_string()))?;
        Ok(Reply::new(self.status, body).with_content_type(&self.content_type))
    }

    fn arity(&self) -> Option<usize> {
        self.arity
    }
}

impl HandlerRegistry {
    /// Build a registry holding one [`TemplateHandler`] per entry.
    ///
    /// Fails on the first body that does not compile.
    pub fn from_config(handlers: &[HandlerConfig]) -> Result<Self, TemplateError> {
        let mut registry = HandlerRegistry::new();
        for config in handlers {
            registry.register(config.target(), TemplateHandler::try_from(config)?);
        }
        Ok(registry)
    }
}
