use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use jobboard_api::{auth::AuthConfig, create_app};
use jobboard_infrastructure::memory::{InMemoryJobRepository, InMemoryUserRepository};

pub fn test_app() -> Router {
    create_app(
        Arc::new(InMemoryJobRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        AuthConfig {
            jwt_secret: "test-secret-key".to_string(),
            jwt_expiration_hours: 24,
        },
    )
}

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

pub fn error_messages(body: &Value) -> Vec<String> {
    body["error"]["messages"]
        .as_array()
        .map(|messages| {
            messages
                .iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

pub async fn register_user(app: &Router, name: &str, email: &str) {
    let (status, _) = request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": name,
            "lastName": "Tester",
            "email": email,
            "password": "longenoughpassword",
            "location": "Berlin",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed for {email}");
}

pub async fn login_token(app: &Router, email: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({
            "email": email,
            "password": "longenoughpassword",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {email}");
    body["data"]["access_token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}

pub fn valid_job_body() -> Value {
    json!({
        "company": "acme",
        "position": "backend engineer",
        "jobLocation": "berlin",
        "jobStatus": "pending",
        "jobType": "full-time",
    })
}

pub async fn create_job(app: &Router, token: &str) -> Value {
    let (status, body) = request(app, "POST", "/api/jobs", Some(token), Some(valid_job_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}
