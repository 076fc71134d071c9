//! HTTP application wiring (Axum router + middleware stack).
//!
//! Layout:
//! - `routes/`: HTTP routes + handlers (users, system endpoints)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: response envelopes for every failure mode

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use userhub_store::UserStore;

use crate::config::{Config, Environment};
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Static facts reported by the health endpoint.
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub environment: Environment,
    pub database: &'static str,
}

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
///
/// Pipeline order, outermost first: CORS, request logger, routes; the
/// fallback answers unmatched paths and the error envelope in `errors.rs`
/// is the terminal step of every fallible handler.
pub fn build_app(config: &Config, store: Arc<dyn UserStore>) -> Router {
    let info = AppInfo {
        environment: config.environment,
        database: database_kind(config),
    };
    let cors = middleware::CorsState {
        allowed_origin: config.cors_origin.clone(),
    };

    Router::new()
        .route("/", get(routes::system::welcome))
        .route("/api/health", get(routes::system::health))
        .nest("/api/users", routes::users::router())
        .fallback(routes::system::not_found)
        .layer(Extension(store))
        .layer(Extension(info))
        .layer(axum::middleware::from_fn(middleware::request_logger))
        .layer(axum::middleware::from_fn_with_state(cors, middleware::cors))
}

fn database_kind(config: &Config) -> &'static str {
    #[cfg(feature = "postgres")]
    if config.database_url.is_some() {
        return "postgres";
    }
    #[cfg(not(feature = "postgres"))]
    let _ = config;
    "in-memory"
}
