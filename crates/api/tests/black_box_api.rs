use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use userhub_api::config::{Config, Environment};
use userhub_store::InMemoryUserStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(Environment::Development).await
    }

    async fn spawn_with(environment: Environment) -> Self {
        // Build the same router as prod, but bind to an ephemeral port.
        let config = Config {
            port: 0,
            environment,
            cors_origin: "http://localhost:8080".to_string(),
            database_url: None,
        };
        let app = userhub_api::app::build_app(&config, Arc::new(InMemoryUserStore::new()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_user(
    client: &reqwest::Client,
    base_url: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let res = client
        .post(format!("{}/api/users", base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn create_returns_201_with_fresh_id_and_timestamp() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = create_user(
        &client,
        &srv.base_url,
        json!({ "name": "Ada Lovelace", "email": "Ada@Example.com", "age": 36 }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User created successfully");
    assert!(!body["data"]["id"].as_str().unwrap().is_empty());
    assert!(!body["data"]["createdAt"].as_str().unwrap().is_empty());
    // Email comes back lowercased, name trimmed as-is.
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["age"], 36);
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, _) = create_user(
        &client,
        &srv.base_url,
        json!({ "name": "Ada", "email": "ada@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = create_user(
        &client,
        &srv.base_url,
        json!({ "name": "Grace", "email": "ADA@Example.COM" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn fetching_unknown_or_malformed_ids_returns_404() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for id in ["00000000-0000-0000-0000-000000000000", "not-a-uuid"] {
        let res = client
            .get(format!("{}/api/users/{}", srv.base_url, id))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "User not found");
    }
}

#[tokio::test]
async fn updating_only_age_preserves_name_and_email() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, created) = create_user(
        &client,
        &srv.base_url,
        json!({ "name": "Ada", "email": "ada@example.com", "age": 36 }),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap();

    let res = client
        .put(format!("{}/api/users/{}", srv.base_url, id))
        .json(&json!({ "age": 37 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["data"]["name"], "Ada");
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["age"], 37);
}

#[tokio::test]
async fn zero_age_update_is_distinct_from_omitting_age() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, created) = create_user(
        &client,
        &srv.base_url,
        json!({ "name": "Ada", "email": "ada@example.com", "age": 36 }),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap();

    // Omitting age leaves it unchanged.
    let res = client
        .put(format!("{}/api/users/{}", srv.base_url, id))
        .json(&json!({ "name": "Ada L" }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["age"], 36);

    // An explicit zero is applied.
    let res = client
        .put(format!("{}/api/users/{}", srv.base_url, id))
        .json(&json!({ "age": 0 }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["age"], 0);

    // An explicit null clears the field.
    let res = client
        .put(format!("{}/api/users/{}", srv.base_url, id))
        .json(&json!({ "age": null }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["age"], serde_json::Value::Null);
}

#[tokio::test]
async fn empty_name_update_is_a_validation_error() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, created) = create_user(
        &client,
        &srv.base_url,
        json!({ "name": "Ada", "email": "ada@example.com" }),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap();

    let res = client
        .put(format!("{}/api/users/{}", srv.base_url, id))
        .json(&json!({ "name": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Update failed");
    assert_eq!(body["error"], "Name is required");
}

#[tokio::test]
async fn update_to_taken_email_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_user(&client, &srv.base_url, json!({ "name": "Ada", "email": "ada@example.com" })).await;
    let (_, bea) = create_user(
        &client,
        &srv.base_url,
        json!({ "name": "Bea", "email": "bea@example.com" }),
    )
    .await;
    let id = bea["data"]["id"].as_str().unwrap();

    let res = client
        .put(format!("{}/api/users/{}", srv.base_url, id))
        .json(&json!({ "email": "Ada@Example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn delete_then_fetch_returns_404() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, created) = create_user(
        &client,
        &srv.base_url,
        json!({ "name": "Ada", "email": "ada@example.com" }),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap();

    let res = client
        .delete(format!("{}/api/users/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "User deleted successfully");

    let res = client
        .get(format!("{}/api/users/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_newest_first() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_user(&client, &srv.base_url, json!({ "name": "Ada", "email": "a@example.com" })).await;
    create_user(&client, &srv.base_url, json!({ "name": "Bea", "email": "b@example.com" })).await;

    let res = client
        .get(format!("{}/api/users", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["email"], "b@example.com");
    assert_eq!(body["data"][1]["email"], "a@example.com");
}

#[tokio::test]
async fn out_of_range_age_is_a_validation_error() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = create_user(
        &client,
        &srv.base_url,
        json!({ "name": "Ada", "email": "ada@example.com", "age": 200 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation Error");
    assert_eq!(body["error"], "Age must be realistic");
}

#[tokio::test]
async fn missing_required_fields_are_validation_errors() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) =
        create_user(&client, &srv.base_url, json!({ "email": "ada@example.com" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation Error");
    assert_eq!(body["error"], "Name is required");

    let (status, body) = create_user(&client, &srv.base_url, json!({ "name": "Ada" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email is required");
}

#[tokio::test]
async fn unmatched_routes_get_the_404_envelope() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/nope", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route not found: GET /api/nope");
}

#[tokio::test]
async fn malformed_json_body_gets_the_terminal_envelope() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/users", srv.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(!body["message"].as_str().unwrap().is_empty());
    assert!(!body["timestamp"].as_str().unwrap().is_empty());
    // Development mode carries the failure detail.
    assert!(body["stack"].is_string());
}

#[tokio::test]
async fn production_mode_suppresses_the_stack_detail() {
    let srv = TestServer::spawn_with(Environment::Production).await;
    let client = reqwest::Client::new();

    // The injected config drives the mode, not process-wide state.
    let res = client
        .get(format!("{}/api/health", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["environment"], "production");

    let res = client
        .post(format!("{}/api/users", srv.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["stack"].is_null());
    assert!(!body["timestamp"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn health_reports_static_status() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "API is running");
    assert_eq!(body["environment"], "development");
    assert_eq!(body["database"], "in-memory");
}

#[tokio::test]
async fn welcome_lists_available_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(&srv.base_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["endpoints"]["users"], "/api/users");
    assert_eq!(body["endpoints"]["health"], "/api/health");
}

#[tokio::test]
async fn preflight_from_the_configured_origin_is_answered() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .request(reqwest::Method::OPTIONS, format!("{}/api/users", srv.base_url))
        .header("origin", "http://localhost:8080")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        res.headers()["access-control-allow-origin"],
        "http://localhost:8080"
    );
    assert_eq!(res.headers()["access-control-allow-credentials"], "true");
}
