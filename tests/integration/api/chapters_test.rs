//! Chapter API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::assert_api_error;
use crate::common::{admin_token, create_book, create_chapter, TestApp};

async fn book_id(app: &TestApp, token: &str) -> i64 {
    create_book(app, token, "Thinking, Fast and Slow", "Psychology").await["id"]
        .as_i64()
        .unwrap()
}

#[tokio::test]
async fn test_create_chapter_defaults_read_time() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_id(&app, &token).await;

    let chapter = create_chapter(&app, &token, book_id, 1).await;
    assert_eq!(chapter["bookId"], book_id);
    assert_eq!(chapter["readTimeMinutes"], 5);

    let fetched: Value = app
        .server
        .get(&format!("/api/chapters/{}", chapter["id"]))
        .await
        .json();
    assert_eq!(fetched["title"], "Chapter 1");
}

#[tokio::test]
async fn test_duplicate_chapter_number_conflicts() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_id(&app, &token).await;
    create_chapter(&app, &token, book_id, 1).await;

    let response = app
        .server
        .post("/api/chapters")
        .authorization_bearer(&token)
        .json(&json!({
            "bookId": book_id,
            "chapterNumber": 1,
            "title": "Again",
            "summary": "Duplicate"
        }))
        .await;
    assert_api_error!(response, StatusCode::CONFLICT, "conflict");
    assert_eq!(app.count_rows("chapters").await, 1);
}

#[tokio::test]
async fn test_chapter_for_missing_book() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let response = app
        .server
        .post("/api/chapters")
        .authorization_bearer(&token)
        .json(&json!({ "bookId": 404, "chapterNumber": 1, "title": "t", "summary": "s" }))
        .await;
    assert_api_error!(response, StatusCode::NOT_FOUND, "not_found");
}

#[tokio::test]
async fn test_chapter_validation() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_id(&app, &token).await;

    for payload in [
        json!({ "bookId": book_id, "chapterNumber": 0, "title": "t", "summary": "s" }),
        json!({ "bookId": book_id, "chapterNumber": 1, "summary": "s" }),
        json!({ "bookId": book_id, "chapterNumber": 1, "title": "t", "summary": "s", "readTimeMinutes": 0 }),
    ] {
        let response = app
            .server
            .post("/api/chapters")
            .authorization_bearer(&token)
            .json(&payload)
            .await;
        assert_api_error!(response, StatusCode::BAD_REQUEST, "bad_request");
    }
}

#[tokio::test]
async fn test_list_chapters_ordered() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_id(&app, &token).await;
    for number in [3, 1, 2] {
        create_chapter(&app, &token, book_id, number).await;
    }

    let chapters: Vec<Value> = app
        .server
        .get(&format!("/api/chapters/book/{}", book_id))
        .await
        .json();
    let numbers: Vec<i64> = chapters
        .iter()
        .map(|c| c["chapterNumber"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    let none: Vec<Value> = app.server.get("/api/chapters/book/9999").await.json();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_update_and_delete_chapter() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_id(&app, &token).await;
    let first = create_chapter(&app, &token, book_id, 1).await;
    create_chapter(&app, &token, book_id, 2).await;
    let id = first["id"].as_i64().unwrap();

    let response = app
        .server
        .put(&format!("/api/chapters/{}", id))
        .authorization_bearer(&token)
        .json(&json!({ "summary": "Revised", "readTimeMinutes": 12 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["summary"], "Revised");
    assert_eq!(updated["readTimeMinutes"], 12);
    assert_eq!(updated["title"], "Chapter 1");

    let clash = app
        .server
        .put(&format!("/api/chapters/{}", id))
        .authorization_bearer(&token)
        .json(&json!({ "chapterNumber": 2 }))
        .await;
    assert_api_error!(clash, StatusCode::CONFLICT, "conflict");

    app.server
        .delete(&format!("/api/chapters/{}", id))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
    let gone = app.server.get(&format!("/api/chapters/{}", id)).await;
    assert_api_error!(gone, StatusCode::NOT_FOUND, "not_found");
}
