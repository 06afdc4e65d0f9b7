//! Authentication API integration tests
//!
//! Tests for register, login, logout, verify, me and change-password.

use axum::http::{header, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use bookblinks::backend::auth::sessions::SessionKeys;

use crate::assert_api_error;
use crate::common::{
    admin_token, editor_token, expired_admin_token, login, TestApp, ADMIN_PASSWORD,
    ADMIN_USERNAME, TEST_JWT_SECRET,
};

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(!cookie.contains("Secure"));

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["username"], "admin");
    assert!(body["user"].get("passwordHash").is_none());

    let claims = SessionKeys::new(TEST_JWT_SECRET)
        .verify_token(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.username, "admin");
    assert_eq!(claims.role, "admin");
}

#[tokio::test]
async fn test_login_with_email() {
    let app = TestApp::new().await;
    let token = login(&app, "admin@bookblinks.com", ADMIN_PASSWORD).await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": ADMIN_USERNAME, "password": "wrong" }))
        .await;

    assert_api_error!(response, StatusCode::UNAUTHORIZED, "invalid_credentials");
    let body: serde_json::Value = response.json();
    assert!(body.get("token").is_none());
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_login_unknown_user_matches_wrong_password() {
    let app = TestApp::new().await;

    let unknown = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "nobody", "password": "wrong" }))
        .await;
    let wrong = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": ADMIN_USERNAME, "password": "wrong" }))
        .await;

    assert_eq!(unknown.status_code(), wrong.status_code());
    assert_eq!(unknown.text(), wrong.text());
}

#[tokio::test]
async fn test_login_missing_fields() {
    let app = TestApp::new().await;
    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": ADMIN_USERNAME }))
        .await;
    assert_api_error!(response, StatusCode::BAD_REQUEST, "bad_request");
}

#[tokio::test]
async fn test_register_bootstrap_only() {
    let app = TestApp::without_admin().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "curator",
            "email": "curator@example.com",
            "password": "s3cret-pass"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["role"], "admin");

    let token = login(&app, "curator", "s3cret-pass").await;
    assert!(!token.is_empty());

    let second = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "intruder",
            "email": "intruder@example.com",
            "password": "pass"
        }))
        .await;
    assert_api_error!(second, StatusCode::FORBIDDEN, "forbidden");
}

#[tokio::test]
async fn test_verify_and_me() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let verify = app
        .server
        .get("/api/auth/verify")
        .authorization_bearer(&token)
        .await;
    assert_eq!(verify.status_code(), StatusCode::OK);
    let body: serde_json::Value = verify.json();
    assert_eq!(body["isAuthenticated"], true);
    assert_eq!(body["user"]["role"], "admin");

    let me = app.server.get("/api/auth/me").authorization_bearer(&token).await;
    assert_eq!(me.status_code(), StatusCode::OK);
    let body: serde_json::Value = me.json();
    assert_eq!(body["user"]["email"], "admin@bookblinks.com");
}

#[tokio::test]
async fn test_cookie_authenticates() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let response = app
        .server
        .get("/api/auth/verify")
        .add_header(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; token={}", token)).unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_verify_rejects_missing_and_bad_tokens() {
    let app = TestApp::new().await;

    let missing = app.server.get("/api/auth/verify").await;
    assert_api_error!(missing, StatusCode::UNAUTHORIZED, "unauthorized");

    let garbage = app
        .server
        .get("/api/auth/verify")
        .authorization_bearer("not-a-jwt")
        .await;
    assert_api_error!(garbage, StatusCode::UNAUTHORIZED, "unauthorized");

    let forged = SessionKeys::new("other-secret")
        .create_token(&crate::common::seeded_admin(&app).await)
        .unwrap();
    let forged = app
        .server
        .get("/api/auth/verify")
        .authorization_bearer(&forged)
        .await;
    assert_api_error!(forged, StatusCode::UNAUTHORIZED, "unauthorized");
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = TestApp::new().await;
    let token = expired_admin_token(&app).await;

    let response = app
        .server
        .post("/api/books")
        .authorization_bearer(&token)
        .json(&json!({ "title": "T", "author": "A" }))
        .await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED, "unauthorized");
}

#[tokio::test]
async fn test_non_admin_forbidden() {
    let app = TestApp::new().await;
    let token = editor_token(&app).await;

    let verify = app
        .server
        .get("/api/auth/verify")
        .authorization_bearer(&token)
        .await;
    assert_eq!(verify.status_code(), StatusCode::OK);

    let response = app
        .server
        .post("/api/books")
        .authorization_bearer(&token)
        .json(&json!({ "title": "T", "author": "A" }))
        .await;
    assert_api_error!(response, StatusCode::FORBIDDEN, "forbidden");
    assert_eq!(app.count_rows("books").await, 0);
}

#[tokio::test]
async fn test_deleted_user_token_rejected() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    sqlx::query("DELETE FROM users WHERE username = ?1")
        .bind(ADMIN_USERNAME)
        .execute(&app.pool)
        .await
        .unwrap();

    let me = app.server.get("/api/auth/me").authorization_bearer(&token).await;
    assert_api_error!(me, StatusCode::UNAUTHORIZED, "unauthorized");

    let create = app
        .server
        .post("/api/books")
        .authorization_bearer(&token)
        .json(&json!({ "title": "T", "author": "A" }))
        .await;
    assert_api_error!(create, StatusCode::UNAUTHORIZED, "unauthorized");
    assert_eq!(app.count_rows("books").await, 0);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new().await;
    let response = app.server.post("/api/auth/logout").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Logout successful");
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let wrong = app
        .server
        .put("/api/auth/change-password")
        .authorization_bearer(&token)
        .json(&json!({ "currentPassword": "nope", "newPassword": "next-pass" }))
        .await;
    assert_api_error!(wrong, StatusCode::UNAUTHORIZED, "invalid_credentials");

    let missing = app
        .server
        .put("/api/auth/change-password")
        .authorization_bearer(&token)
        .json(&json!({ "currentPassword": ADMIN_PASSWORD }))
        .await;
    assert_api_error!(missing, StatusCode::BAD_REQUEST, "bad_request");

    let changed = app
        .server
        .put("/api/auth/change-password")
        .authorization_bearer(&token)
        .json(&json!({ "currentPassword": ADMIN_PASSWORD, "newPassword": "next-pass" }))
        .await;
    assert_eq!(changed.status_code(), StatusCode::OK);

    let old = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .await;
    assert_eq!(old.status_code(), StatusCode::UNAUTHORIZED);
    assert!(!login(&app, ADMIN_USERNAME, "next-pass").await.is_empty());
}
