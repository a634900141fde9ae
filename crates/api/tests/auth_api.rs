//! Authentication flow and role handling through the full router.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{error_messages, login_token, register_user, request, test_app};

#[tokio::test]
async fn test_register_then_login_and_fetch_profile() {
    let app = test_app();
    register_user(&app, "Ada", "ada@example.com").await;
    let token = login_token(&app, "ada@example.com").await;

    let (status, body) = request(&app, "GET", "/api/users/current-user", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert!(body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = test_app();
    register_user(&app, "Ada", "ada@example.com").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({
            "email": "ada@example.com",
            "password": "wrong-password",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["type"], "AUTHENTICATION_ERROR");
}

#[tokio::test]
async fn test_login_validation_messages() {
    let app = test_app();
    let (status, body) = request(&app, "POST", "/api/auth/login", None, Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_messages(&body),
        vec![
            "Email is required",
            "Invalid email format",
            "Password is required",
        ]
    );
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = test_app();
    let (status, body) = request(&app, "GET", "/api/jobs", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["type"], "AUTHENTICATION_ERROR");
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let app = test_app();
    let (status, _) = request(&app, "GET", "/api/jobs", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_first_account_becomes_admin() {
    let app = test_app();

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Root",
            "lastName": "Admin",
            "email": "root@example.com",
            "password": "longenoughpassword",
            "location": "HQ",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "admin");

    let (status, body) = request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "password": "longenoughpassword",
            "location": "London",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "user");
}

#[tokio::test]
async fn test_app_stats_requires_admin() {
    let app = test_app();
    register_user(&app, "Root", "root@example.com").await;
    register_user(&app, "Ada", "ada@example.com").await;

    let member = login_token(&app, "ada@example.com").await;
    let (status, _) = request(
        &app,
        "GET",
        "/api/users/admin/app-stats",
        Some(&member),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = login_token(&app, "root@example.com").await;
    let (status, body) = request(
        &app,
        "GET",
        "/api/users/admin/app-stats",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["users"], 2);
    assert_eq!(body["data"]["jobs"], 0);
}

#[tokio::test]
async fn test_logout_is_public() {
    let app = test_app();
    let (status, body) = request(&app, "GET", "/api/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "user logged out");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let (status, body) = request(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
