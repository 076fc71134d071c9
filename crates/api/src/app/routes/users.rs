//! CRUD routes for user records.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use userhub_core::UserId;
use userhub_store::UserStore;

use crate::app::dto;
use crate::app::errors::{self, ApiError};
use crate::app::AppInfo;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

pub async fn list_users(
    Extension(store): Extension<Arc<dyn UserStore>>,
) -> Result<Response, ApiError> {
    match store.list().await {
        Ok(users) => {
            let data: Vec<_> = users.iter().map(dto::user_to_json).collect();
            Ok((
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "count": data.len(),
                    "data": data,
                })),
            )
                .into_response())
        }
        Err(err) => Ok(errors::fetch_error_to_response(err)),
    }
}

pub async fn get_user(
    Extension(store): Extension<Arc<dyn UserStore>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    // Malformed ids are indistinguishable from unknown ids to callers.
    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return Ok(errors::json_error(StatusCode::NOT_FOUND, "User not found")),
    };

    match store.get(id).await {
        Ok(user) => Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": dto::user_to_json(&user),
            })),
        )
            .into_response()),
        Err(err) => Ok(errors::fetch_error_to_response(err)),
    }
}

pub async fn create_user(
    Extension(store): Extension<Arc<dyn UserStore>>,
    Extension(info): Extension<AppInfo>,
    payload: Result<Json<dto::CreateUserRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(|r| ApiError::from_rejection(info.environment, r))?;

    match store.create(body.into()).await {
        Ok(user) => Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "User created successfully",
                "data": dto::user_to_json(&user),
            })),
        )
            .into_response()),
        Err(err) => Ok(errors::create_error_to_response(err)),
    }
}

pub async fn update_user(
    Extension(store): Extension<Arc<dyn UserStore>>,
    Extension(info): Extension<AppInfo>,
    Path(id): Path<String>,
    payload: Result<Json<dto::UpdateUserRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(|r| ApiError::from_rejection(info.environment, r))?;

    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return Ok(errors::json_error(StatusCode::NOT_FOUND, "User not found")),
    };

    match store.update(id, body.into()).await {
        Ok(user) => Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "User updated successfully",
                "data": dto::user_to_json(&user),
            })),
        )
            .into_response()),
        Err(err) => Ok(errors::update_error_to_response(err)),
    }
}

pub async fn delete_user(
    Extension(store): Extension<Arc<dyn UserStore>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return Ok(errors::json_error(StatusCode::NOT_FOUND, "User not found")),
    };

    match store.delete(id).await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "User deleted successfully",
            })),
        )
            .into_response()),
        Err(err) => Ok(errors::fetch_error_to_response(err)),
    }
}
