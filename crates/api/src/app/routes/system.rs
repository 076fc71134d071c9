//! Health, welcome, and catch-all endpoints.

use axum::{
    extract::Extension,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

use crate::app::AppInfo;

pub async fn health(Extension(info): Extension<AppInfo>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "API is running",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": info.environment.as_str(),
        "database": info.database,
    }))
}

pub async fn welcome() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Welcome to the userhub API",
        "endpoints": {
            "users": "/api/users",
            "health": "/api/health",
        },
    }))
}

pub async fn not_found(method: Method, uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": format!("Route not found: {} {}", method, uri),
        })),
    )
        .into_response()
}
