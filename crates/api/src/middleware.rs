//! Request-pipeline middleware: logging and cross-origin policy.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

/// Log every inbound request (method, path, timestamp) before handling it.
pub async fn request_logger(req: Request, next: Next) -> Response {
    tracing::info!(
        method = %req.method(),
        path = %req.uri(),
        timestamp = %Utc::now().to_rfc3339(),
        "request"
    );
    next.run(req).await
}

#[derive(Clone)]
pub struct CorsState {
    /// The single allowed cross-origin client address.
    pub allowed_origin: String,
}

/// Cross-origin policy: answer preflights and stamp responses for the
/// configured origin. Requests from other origins pass through without CORS
/// headers, which browsers reject.
pub async fn cors(State(state): State<CorsState>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let allowed = origin.as_deref() == Some(state.allowed_origin.as_str());

    if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if allowed {
            allow_origin(resp.headers_mut(), &state.allowed_origin);
            resp.headers_mut().insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("GET,POST,PUT,DELETE,OPTIONS"),
            );
            resp.headers_mut().insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("content-type,authorization"),
            );
        }
        return resp;
    }

    let mut resp = next.run(req).await;
    if allowed {
        allow_origin(resp.headers_mut(), &state.allowed_origin);
    }
    resp
}

fn allow_origin(headers: &mut HeaderMap, origin: &str) {
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}
