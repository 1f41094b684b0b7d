use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::routing::{ResolvedRoute, RouteTarget};

#[derive(Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub rules: usize,
    pub handlers: usize,
}

#[derive(Serialize, Deserialize)]
pub struct RuleSummary {
    pub index: usize,
    pub pattern: String,
    pub controller: String,
    pub action: String,
    pub params: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct RouteTable {
    pub mount_prefix: String,
    pub default: Option<RouteTarget>,
    pub error: Option<RouteTarget>,
    pub rules: Vec<RuleSummary>,
}

#[derive(Deserialize)]
pub struct ResolveQuery {
    pub path: String,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let inner = state.inner.load();
    let status = Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        rules: inner.dispatcher.router().rules().len(),
        handlers: inner.dispatcher.handlers().len(),
    });
    status
}

pub async fn get_routes(State(state): State<AppState>) -> Json<RouteTable> {
    let inner = state.inner.load();
    let router = inner.dispatcher.router();

    let rules = router
        .rules()
        .enumerate()
        .map(|(index, rule)| RuleSummary {
            index,
            pattern: rule.pattern.to_string(),
            controller: rule.target.controller.clone(),
            action: rule.target.action.clone(),
            params: rule.pattern.capture_names().map(str::to_string).collect(),
        })
        .collect();

    Json(RouteTable {
        mount_prefix: inner.config.listener.mount_prefix.clone(),
        default: router.default_target().cloned(),
        error: router.error_target().cloned(),
        rules,
    })
}

/// Resolve a path against the live table without running any handler.
pub async fn get_resolve(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolvedRoute>, (StatusCode, String)> {
    let inner = state.inner.load();
    inner
        .dispatcher
        .router()
        .resolve(&query.path, &inner.config.listener.mount_prefix)
        .map(Json)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}
