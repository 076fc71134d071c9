//! Typed client for the userhub REST API.
//!
//! Thin wrapper over `reqwest` with a fixed base URL, JSON content type,
//! optional bearer token, a fixed request timeout, development-only
//! request/response logging, and error normalization that attaches a
//! user-facing message alongside the original failure.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const MSG_TIMEOUT: &str = "Request timeout. Please try again.";
const MSG_UNREACHABLE: &str = "Unable to connect to the server. Please check your connection.";

/// Normalized client failure.
///
/// `user_message` is the presentable string; the raw transport failure (if
/// any) rides along as the source so callers can still inspect it.
#[derive(Debug, Error)]
#[error("{user_message}")]
pub struct ApiClientError {
    pub user_message: String,
    /// HTTP status, when the server answered at all.
    pub status: Option<u16>,
    /// The server's (or transport's) own message.
    pub message: String,
    #[source]
    pub source: Option<reqwest::Error>,
}

impl ApiClientError {
    fn from_transport(err: reqwest::Error) -> Self {
        let message = err.to_string();
        let user_message = if err.is_timeout() {
            MSG_TIMEOUT.to_string()
        } else if err.is_connect() {
            MSG_UNREACHABLE.to_string()
        } else {
            let status = err
                .status()
                .map(|s| s.as_u16().to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            format!("Error: {} - {}", status, message)
        };
        Self {
            user_message,
            status: err.status().map(|s| s.as_u16()),
            message,
            source: Some(err),
        }
    }

    fn from_response(status: StatusCode, message: String) -> Self {
        Self {
            user_message: format!("Error: {} - {}", status.as_u16(), message),
            status: Some(status.as_u16()),
            message,
            source: None,
        }
    }

    fn malformed(detail: impl Into<String>) -> Self {
        let message = detail.into();
        Self {
            user_message: format!("Error: Unknown - {}", message),
            status: None,
            message,
            source: None,
        }
    }
}

/// A user record as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: Option<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}

/// Partial update body. An absent field leaves the server value unchanged;
/// `age: Some(None)` serializes as an explicit `null`, clearing the field.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<Option<i64>>,
}

// Success envelopes only; non-2xx responses are mapped to `ApiClientError`
// before parsing, so `success`/`message` need no representation here.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    data: Option<T>,
}

/// HTTP client for the userhub API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    log_exchanges: bool,
}

impl ApiClient {
    /// Build a client against `base_url` (no trailing slash, including the
    /// `/api` prefix).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiClientError::from_transport)?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            token: None,
            log_exchanges: false,
        })
    }

    /// Build from the environment: `USERHUB_API_URL` (default
    /// `http://localhost:5000/api`), `USERHUB_AUTH_TOKEN` for the bearer
    /// token, request/response logging unless `APP_ENV=production`.
    pub fn from_env() -> Result<Self, ApiClientError> {
        let base_url =
            std::env::var("USERHUB_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let mut client = Self::new(base_url)?;
        client.token = std::env::var("USERHUB_AUTH_TOKEN").ok();
        client.log_exchanges = !production;
        Ok(client)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_exchanges = enabled;
        self
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiClientError> {
        let env: Envelope<Vec<User>> = self.request(Method::GET, "/users", None::<&()>).await?;
        let data = env.data.unwrap_or_default();
        if let Some(count) = env.count {
            if count != data.len() {
                return Err(ApiClientError::malformed("count does not match data"));
            }
        }
        Ok(data)
    }

    pub async fn get_user(&self, id: &str) -> Result<User, ApiClientError> {
        let env: Envelope<User> = self
            .request(Method::GET, &format!("/users/{id}"), None::<&()>)
            .await?;
        env.data
            .ok_or_else(|| ApiClientError::malformed("response carried no user record"))
    }

    pub async fn create_user(&self, fields: &CreateUser) -> Result<User, ApiClientError> {
        let env: Envelope<User> = self.request(Method::POST, "/users", Some(fields)).await?;
        env.data
            .ok_or_else(|| ApiClientError::malformed("response carried no user record"))
    }

    pub async fn update_user(&self, id: &str, patch: &UpdateUser) -> Result<User, ApiClientError> {
        let env: Envelope<User> = self
            .request(Method::PUT, &format!("/users/{id}"), Some(patch))
            .await?;
        env.data
            .ok_or_else(|| ApiClientError::malformed("response carried no user record"))
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiClientError> {
        let _: Envelope<serde_json::Value> = self
            .request(Method::DELETE, &format!("/users/{id}"), None::<&()>)
            .await?;
        Ok(())
    }

    pub async fn health(&self) -> Result<serde_json::Value, ApiClientError> {
        let url = format!("{}/health", self.base_url);
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ApiClientError::from_transport)?;
        res.json().await.map_err(ApiClientError::from_transport)
    }

    async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Envelope<T>, ApiClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        if self.log_exchanges {
            tracing::debug!(method = %method, url = %url, "api request");
        }

        let mut req = self.http.request(method, &url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req.send().await.map_err(ApiClientError::from_transport)?;
        let status = res.status();
        if self.log_exchanges {
            tracing::debug!(status = %status, url = %url, "api response");
        }

        if !status.is_success() {
            let message = res
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
                .unwrap_or_else(|| status.to_string());
            return Err(ApiClientError::from_response(status, message));
        }

        res.json::<Envelope<T>>()
            .await
            .map_err(ApiClientError::from_transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_body_distinguishes_null_from_absent_age() {
        let absent = UpdateUser {
            name: Some("Ada".to_string()),
            ..UpdateUser::default()
        };
        assert_eq!(
            serde_json::to_string(&absent).unwrap(),
            r#"{"name":"Ada"}"#
        );

        let cleared = UpdateUser {
            age: Some(None),
            ..UpdateUser::default()
        };
        assert_eq!(serde_json::to_string(&cleared).unwrap(), r#"{"age":null}"#);

        let zeroed = UpdateUser {
            age: Some(Some(0)),
            ..UpdateUser::default()
        };
        assert_eq!(serde_json::to_string(&zeroed).unwrap(), r#"{"age":0}"#);
    }

    #[test]
    fn create_body_omits_missing_age() {
        let fields = CreateUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: None,
        };
        assert_eq!(
            serde_json::to_string(&fields).unwrap(),
            r#"{"name":"Ada","email":"ada@example.com"}"#
        );
    }

    #[test]
    fn response_errors_normalize_to_status_dash_message() {
        let err =
            ApiClientError::from_response(StatusCode::NOT_FOUND, "User not found".to_string());
        assert_eq!(err.user_message, "Error: 404 - User not found");
        assert_eq!(err.status, Some(404));
        assert_eq!(err.message, "User not found");
    }

    #[test]
    fn user_record_parses_from_the_wire_shape() {
        let user: User = serde_json::from_str(
            r#"{"id":"0191f","name":"Ada","email":"ada@example.com","age":null,"createdAt":"2026-08-25T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(user.age, None);
        assert_eq!(user.created_at, "2026-08-25T12:00:00Z");
    }
}
