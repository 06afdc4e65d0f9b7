//! Reading progress API integration tests

use std::future::IntoFuture;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{admin_token, book_with_chapters, create_chapter, TestApp};
use crate::{assert_api_error, assert_approx_eq, assert_in_range};

fn percent(progress: &Value) -> f64 {
    progress["percentComplete"].as_f64().unwrap()
}

#[tokio::test]
async fn test_progress_defaults_when_not_started() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_with_chapters(&app, &token, "Atomic Habits", 4).await;

    let response = app
        .server
        .get(&format!("/api/progress/device-1/{}", book_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let progress: Value = response.json();
    assert_eq!(progress["chaptersRead"], json!([]));
    assert_eq!(percent(&progress), 0.0);
    assert_eq!(progress["totalChapters"], 4);
    assert_eq!(progress["completedAt"], Value::Null);
    assert_eq!(app.count_rows("reading_progress").await, 0);
}

#[tokio::test]
async fn test_upsert_completes_then_reopens() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_with_chapters(&app, &token, "Atomic Habits", 3).await;

    let done: Value = app
        .server
        .post("/api/progress")
        .json(&json!({
            "deviceId": "device-1",
            "bookId": book_id,
            "chaptersRead": [1, 2, 3],
            "lastReadChapter": 3
        }))
        .await
        .json();
    assert_eq!(percent(&done), 100.0);
    assert!(done["completedAt"].is_string());

    let partial: Value = app
        .server
        .post("/api/progress")
        .json(&json!({ "deviceId": "device-1", "bookId": book_id, "chaptersRead": [1, 2] }))
        .await
        .json();
    assert_approx_eq!(percent(&partial), 66.67, 0.01);
    assert_eq!(partial["completedAt"], Value::Null);
    assert_eq!(partial["id"], done["id"]);
    assert_eq!(partial["lastReadChapter"], 3);
    assert_eq!(app.count_rows("reading_progress").await, 1);
}

#[tokio::test]
async fn test_upsert_status_reports_creation() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_with_chapters(&app, &token, "Atomic Habits", 2).await;
    let payload = json!({ "deviceId": "device-1", "bookId": book_id, "chaptersRead": [1] });

    let first = app.server.post("/api/progress").json(&payload).await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = app.server.post("/api/progress").json(&payload).await;
    assert_eq!(second.status_code(), StatusCode::OK);
    assert_eq!(second.json::<Value>()["id"], first.json::<Value>()["id"]);
}

#[tokio::test]
async fn test_stored_progress_follows_chapter_changes() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_with_chapters(&app, &token, "Atomic Habits", 3).await;
    let url = format!("/api/progress/device-1/{}", book_id);

    let done: Value = app
        .server
        .post("/api/progress")
        .json(&json!({ "deviceId": "device-1", "bookId": book_id, "chaptersRead": [1, 2, 3] }))
        .await
        .json();
    assert_eq!(percent(&done), 100.0);
    let first_completion = done["completedAt"].clone();
    assert!(first_completion.is_string());

    let added = create_chapter(&app, &token, book_id, 4).await;
    let grown: Value = app.server.get(&url).await.json();
    assert_eq!(grown["totalChapters"], 4);
    assert_approx_eq!(percent(&grown), 75.0, 0.001);
    assert_eq!(grown["completedAt"], Value::Null);

    let listed: Vec<Value> = app.server.get("/api/progress/device-1").await.json();
    assert_approx_eq!(percent(&listed[0]), 75.0, 0.001);

    app.server
        .delete(&format!("/api/chapters/{}", added["id"]))
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
    let shrunk: Value = app.server.get(&url).await.json();
    assert_eq!(shrunk["totalChapters"], 3);
    assert_eq!(percent(&shrunk), 100.0);
    assert!(shrunk["completedAt"].is_string());
}

#[tokio::test]
async fn test_upsert_normalizes_chapters() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_with_chapters(&app, &token, "Atomic Habits", 2).await;

    let progress: Value = app
        .server
        .post("/api/progress")
        .json(&json!({
            "deviceId": "device-1",
            "bookId": book_id,
            "chaptersRead": [2, 1, 2, 7, 9]
        }))
        .await
        .json();
    assert_eq!(progress["chaptersRead"], json!([1, 2, 7, 9]));
    assert_eq!(percent(&progress), 100.0);
}

#[tokio::test]
async fn test_upsert_validation() {
    let app = TestApp::new().await;

    let missing = app
        .server
        .post("/api/progress")
        .json(&json!({ "bookId": 1, "chaptersRead": [1] }))
        .await;
    assert_api_error!(missing, StatusCode::BAD_REQUEST, "bad_request");

    let no_book = app
        .server
        .post("/api/progress")
        .json(&json!({ "deviceId": "device-1", "bookId": 999, "chaptersRead": [1] }))
        .await;
    assert_api_error!(no_book, StatusCode::NOT_FOUND, "not_found");
}

#[tokio::test]
async fn test_mark_chapter_read() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_with_chapters(&app, &token, "Atomic Habits", 2).await;
    let url = |n: i64| format!("/api/progress/device-1/{}/chapters/{}", book_id, n);

    let first: Value = app.server.post(&url(2)).await.json();
    assert_eq!(first["chaptersRead"], json!([2]));
    assert_eq!(percent(&first), 50.0);

    let repeated: Value = app.server.post(&url(2)).await.json();
    assert_eq!(repeated["chaptersRead"], json!([2]));
    assert_eq!(percent(&repeated), 50.0);

    let done: Value = app.server.post(&url(1)).await.json();
    assert_eq!(done["chaptersRead"], json!([1, 2]));
    assert_eq!(done["lastReadChapter"], 1);
    assert!(done["completedAt"].is_string());

    let missing = app.server.post(&url(3)).await;
    assert_api_error!(missing, StatusCode::NOT_FOUND, "not_found");
}

#[tokio::test]
async fn test_percent_follows_live_chapter_count() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_with_chapters(&app, &token, "Atomic Habits", 2).await;

    app.server
        .post("/api/progress")
        .json(&json!({ "deviceId": "d", "bookId": book_id, "chaptersRead": [1, 2] }))
        .await
        .assert_status(StatusCode::CREATED);
    create_chapter(&app, &token, book_id, 3).await;

    let progress: Value = app
        .server
        .post(&format!("/api/progress/d/{}/chapters/3", book_id))
        .await
        .json();
    assert_eq!(progress["totalChapters"], 3);
    assert_eq!(percent(&progress), 100.0);
}

#[tokio::test]
async fn test_percent_never_exceeds_hundred() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_with_chapters(&app, &token, "Short", 1).await;

    let progress: Value = app
        .server
        .post("/api/progress")
        .json(&json!({ "deviceId": "d", "bookId": book_id, "chaptersRead": [1, 2, 3, 4] }))
        .await
        .json();
    assert_in_range!(percent(&progress), 0.0, 100.0);
}

#[tokio::test]
async fn test_concurrent_marks_all_land() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_with_chapters(&app, &token, "Atomic Habits", 5).await;

    let requests = (1..=5).map(|n| {
        app.server
            .post(&format!("/api/progress/device-1/{}/chapters/{}", book_id, n))
            .into_future()
    });
    for response in futures_util::future::join_all(requests).await {
        response.assert_status_ok();
    }

    let progress: Value = app
        .server
        .get(&format!("/api/progress/device-1/{}", book_id))
        .await
        .json();
    assert_eq!(progress["chaptersRead"], json!([1, 2, 3, 4, 5]));
    assert_eq!(percent(&progress), 100.0);
}

#[tokio::test]
async fn test_list_update_and_delete_progress() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let book_id = book_with_chapters(&app, &token, "Atomic Habits", 4).await;

    let created: Value = app
        .server
        .post("/api/progress")
        .json(&json!({ "deviceId": "device-1", "bookId": book_id, "chaptersRead": [1] }))
        .await
        .json();
    let id = created["id"].as_i64().unwrap();

    let list: Vec<Value> = app.server.get("/api/progress/device-1").await.json();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Atomic Habits");
    assert_eq!(list[0]["bookId"], book_id);

    let updated: Value = app
        .server
        .put(&format!("/api/progress/{}", id))
        .json(&json!({ "chaptersRead": [1, 2], "percentComplete": 99 }))
        .await
        .json();
    assert_eq!(percent(&updated), 50.0);

    let missing = app
        .server
        .put("/api/progress/9999")
        .json(&json!({ "chaptersRead": [1] }))
        .await;
    assert_api_error!(missing, StatusCode::NOT_FOUND, "not_found");

    app.server
        .delete(&format!("/api/progress/{}", id))
        .await
        .assert_status_ok();
    let again = app.server.delete(&format!("/api/progress/{}", id)).await;
    assert_api_error!(again, StatusCode::NOT_FOUND, "not_found");
}
