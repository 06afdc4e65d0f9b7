//! Health, index, categories and search integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::assert_api_error;
use crate::common::{admin_token, create_book, TestApp};

#[tokio::test]
async fn test_health_and_index() {
    let app = TestApp::new().await;

    let health: Value = app.server.get("/health").await.json();
    assert_eq!(health["status"], "ok");
    assert!(health["timestamp"].is_string());

    let index = app.server.get("/").await;
    index.assert_status_ok();
    let body: Value = index.json();
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["endpoints"]["books"], "/api/books");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new().await;
    let response = app.server.get("/api/nope").await;
    assert_api_error!(response, StatusCode::NOT_FOUND, "not_found");
    let body: Value = response.json();
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn test_categories_counted_and_sorted() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    create_book(&app, &token, "A", "Science").await;
    create_book(&app, &token, "B", "Business").await;
    create_book(&app, &token, "C", "Science").await;
    create_book(&app, &token, "D", "").await;

    let categories: Value = app.server.get("/api/categories").await.json();
    assert_eq!(
        categories,
        json!([
            { "category": "Business", "count": 1 },
            { "category": "Science", "count": 2 }
        ])
    );
}

#[tokio::test]
async fn test_search_matches_books_and_chapters() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let atomic = create_book(&app, &token, "Atomic Habits", "Self-Help").await;
    let other = create_book(&app, &token, "Deep Work", "Productivity").await;
    app.server
        .post("/api/chapters")
        .authorization_bearer(&token)
        .json(&json!({
            "bookId": other["id"],
            "chapterNumber": 1,
            "title": "Rules",
            "summary": "Embrace boredom and quit social media"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let by_title: Vec<Value> = app
        .server
        .get("/api/search")
        .add_query_param("q", "ATOMIC")
        .await
        .json();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0]["id"], atomic["id"]);

    let by_summary: Vec<Value> = app
        .server
        .get("/api/search")
        .add_query_param("q", "boredom")
        .await
        .json();
    assert_eq!(by_summary.len(), 1);
    assert_eq!(by_summary[0]["title"], "Deep Work");

    let none: Vec<Value> = app
        .server
        .get("/api/search")
        .add_query_param("q", "zzz-nonexistent")
        .await
        .json();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_search_requires_query() {
    let app = TestApp::new().await;

    let missing = app.server.get("/api/search").await;
    assert_api_error!(missing, StatusCode::BAD_REQUEST, "bad_request");

    let blank = app
        .server
        .get("/api/search")
        .add_query_param("q", "   ")
        .await;
    assert_api_error!(blank, StatusCode::BAD_REQUEST, "bad_request");
}
