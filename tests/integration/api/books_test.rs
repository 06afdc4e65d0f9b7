//! Book API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::assert_api_error;
use crate::common::{admin_token, book_with_chapters, create_book, create_chapter, TestApp};

#[tokio::test]
async fn test_create_and_get_book() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let book = create_book(&app, &token, "Atomic Habits", "Self-Help").await;
    assert_eq!(book["title"], "Atomic Habits");
    assert_eq!(book["totalChapters"], 0);
    assert_eq!(book["favoriteCount"], 0);
    assert!(book.get("pdfPath").is_none());

    let id = book["id"].as_i64().unwrap();
    let response = app.server.get(&format!("/api/books/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let fetched: Value = response.json();
    assert_eq!(fetched["title"], "Atomic Habits");
    assert_eq!(fetched["chapters"], json!([]));
}

#[tokio::test]
async fn test_create_book_requires_title_and_author() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let response = app
        .server
        .post("/api/books")
        .authorization_bearer(&token)
        .json(&json!({ "title": "  ", "author": "Someone" }))
        .await;
    assert_api_error!(response, StatusCode::BAD_REQUEST, "bad_request");

    let malformed = app
        .server
        .post("/api/books")
        .authorization_bearer(&token)
        .content_type("application/json")
        .bytes("{not json".into())
        .await;
    assert_api_error!(malformed, StatusCode::BAD_REQUEST, "bad_request");
    assert_eq!(app.count_rows("books").await, 0);
}

#[tokio::test]
async fn test_list_books_newest_first() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    create_book(&app, &token, "First", "Business").await;
    create_book(&app, &token, "Second", "Business").await;
    create_book(&app, &token, "Third", "Science").await;

    let books: Vec<Value> = app.server.get("/api/books").await.json();
    let titles: Vec<&str> = books.iter().map(|b| b["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);

    let business: Vec<Value> = app.server.get("/api/books/category/Business").await.json();
    assert_eq!(business.len(), 2);
}

#[tokio::test]
async fn test_total_chapters_tracks_mutations() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_with_chapters(&app, &token, "Deep Work", 3).await;

    let book: Value = app.server.get(&format!("/api/books/{}", book_id)).await.json();
    assert_eq!(book["totalChapters"], 3);
    let numbers: Vec<i64> = book["chapters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["chapterNumber"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    let chapter_id = book["chapters"][0]["id"].as_i64().unwrap();
    app.server
        .delete(&format!("/api/chapters/{}", chapter_id))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    let books: Vec<Value> = app.server.get("/api/books").await.json();
    assert_eq!(books[0]["totalChapters"], 2);
}

#[tokio::test]
async fn test_update_book_partial() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book = create_book(&app, &token, "Draft Title", "Business").await;
    let id = book["id"].as_i64().unwrap();

    let response = app
        .server
        .put(&format!("/api/books/{}", id))
        .authorization_bearer(&token)
        .json(&json!({ "title": "Final Title" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["title"], "Final Title");
    assert_eq!(updated["author"], "Test Author");
    assert_eq!(updated["category"], "Business");

    let missing = app
        .server
        .put("/api/books/9999")
        .authorization_bearer(&token)
        .json(&json!({ "title": "x" }))
        .await;
    assert_api_error!(missing, StatusCode::NOT_FOUND, "not_found");
}

#[tokio::test]
async fn test_delete_book_cascades() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_with_chapters(&app, &token, "Sapiens", 2).await;

    app.server
        .post("/api/favorites")
        .json(&json!({ "deviceId": "device-1", "bookId": book_id }))
        .await
        .assert_status(StatusCode::CREATED);
    app.server
        .post("/api/progress")
        .json(&json!({ "deviceId": "device-1", "bookId": book_id, "chaptersRead": [1] }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app
        .server
        .delete(&format!("/api/books/{}", book_id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let gone = app.server.get(&format!("/api/books/{}", book_id)).await;
    assert_api_error!(gone, StatusCode::NOT_FOUND, "not_found");
    assert_eq!(app.count_rows("chapters").await, 0);
    assert_eq!(app.count_rows("favorites").await, 0);
    assert_eq!(app.count_rows("reading_progress").await, 0);

    let again = app
        .server
        .delete(&format!("/api/books/{}", book_id))
        .authorization_bearer(&token)
        .await;
    assert_api_error!(again, StatusCode::NOT_FOUND, "not_found");
}

#[tokio::test]
async fn test_favorite_count() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book = create_book(&app, &token, "Popular", "Business").await;
    let book_id = book["id"].as_i64().unwrap();

    for device in ["a", "b"] {
        app.server
            .post("/api/favorites")
            .json(&json!({ "deviceId": device, "bookId": book_id }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let book: Value = app.server.get(&format!("/api/books/{}", book_id)).await.json();
    assert_eq!(book["favoriteCount"], 2);
}

#[tokio::test]
async fn test_book_mutations_require_admin() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book = create_book(&app, &token, "Guarded", "Business").await;
    let id = book["id"].as_i64().unwrap();

    let put = app
        .server
        .put(&format!("/api/books/{}", id))
        .json(&json!({ "title": "x" }))
        .await;
    assert_api_error!(put, StatusCode::UNAUTHORIZED, "unauthorized");

    let delete = app.server.delete(&format!("/api/books/{}", id)).await;
    assert_api_error!(delete, StatusCode::UNAUTHORIZED, "unauthorized");

    let chapter = app
        .server
        .post("/api/chapters")
        .json(&json!({ "bookId": id, "chapterNumber": 1, "title": "t", "summary": "s" }))
        .await;
    assert_api_error!(chapter, StatusCode::UNAUTHORIZED, "unauthorized");

    create_chapter(&app, &token, id, 1).await;
}
