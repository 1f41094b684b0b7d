//! Response construction.
//!
//! # Responsibilities
//! - Turn handler replies into HTTP responses
//! - Map dispatch failures to status codes
//!
//! # Design Decisions
//! - Handler-chosen status and content type are honored; invalid values fall
//!   back to 500 and `text/plain`
//! - Failure bodies are generic; details go to the log, not the client

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::dispatch::{DispatchError, Reply};

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        if let Ok(value) = HeaderValue::from_str(&self.content_type) {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
        response
    }
}

impl DispatchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::HandlerNotFound { .. } => StatusCode::NOT_FOUND,
            DispatchError::Routing(_) | DispatchError::Handler { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = status.canonical_reason().unwrap_or("Error");
        (status, body).into_response()
    }
}
