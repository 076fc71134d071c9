//! Response envelopes for every failure mode.
//!
//! Domain failures are mapped explicitly per operation (`create`, `update`,
//! fetch/delete); anything that escapes those mappings funnels through
//! [`ApiError`], the terminal step of the pipeline: it logs server-side and
//! answers `{success:false, message, stack, timestamp}` with the stack
//! detail suppressed in production.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::json;

use userhub_core::DomainError;

use crate::config::Environment;

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn json_error_with_detail(
    status: StatusCode,
    message: &'static str,
    detail: impl Into<String>,
) -> Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "message": message,
            "error": detail.into(),
        })),
    )
        .into_response()
}

/// Failure mapping for `POST /api/users`.
pub fn create_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Conflict(_) => json_error(StatusCode::BAD_REQUEST, "Email already exists"),
        other => json_error_with_detail(
            StatusCode::BAD_REQUEST,
            "Validation Error",
            other.to_string(),
        ),
    }
}

/// Failure mapping for `PUT /api/users/:id`.
pub fn update_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "User not found"),
        DomainError::Conflict(_) => json_error(StatusCode::BAD_REQUEST, "Email already exists"),
        other => {
            json_error_with_detail(StatusCode::BAD_REQUEST, "Update failed", other.to_string())
        }
    }
}

/// Failure mapping for list/get/delete.
pub fn fetch_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "User not found"),
        other => json_error_with_detail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server Error",
            other.to_string(),
        ),
    }
}

/// Terminal safety net for failures no handler mapped explicitly
/// (malformed request bodies, in practice).
///
/// Carries the deployment mode of the router that produced it, so the
/// `stack` gating follows the injected config rather than process state.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    environment: Environment,
    source: anyhow::Error,
}

impl ApiError {
    pub fn from_rejection(environment: Environment, rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            environment,
            source: rejection.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.status == StatusCode::OK {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            self.status
        };

        tracing::error!(status = %status, error = ?self.source, "unhandled request failure");

        let stack = if self.environment.is_production() {
            serde_json::Value::Null
        } else {
            serde_json::Value::String(format!("{:?}", self.source))
        };

        (
            status,
            axum::Json(json!({
                "success": false,
                "message": self.source.to_string(),
                "stack": stack,
                "timestamp": Utc::now().to_rfc3339(),
            })),
        )
            .into_response()
    }
}
