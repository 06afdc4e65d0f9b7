//! Catalog and PDF fixtures

use lopdf::{dictionary, Document, Object, Stream};
use serde_json::{json, Value};

use super::database::TestApp;

/// Build a minimal valid PDF with `pages` blank pages
pub fn build_pdf(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for _ in 0..pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"0 g".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 200.into(), 200.into()],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialize pdf");
    buf
}

/// Create a book through the API and return its JSON
pub async fn create_book(app: &TestApp, token: &str, title: &str, category: &str) -> Value {
    let response = app
        .server
        .post("/api/books")
        .authorization_bearer(token)
        .json(&json!({
            "title": title,
            "author": "Test Author",
            "description": format!("About {}", title),
            "category": category,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

/// Create a chapter through the API and return its JSON
pub async fn create_chapter(app: &TestApp, token: &str, book_id: i64, number: i64) -> Value {
    let response = app
        .server
        .post("/api/chapters")
        .authorization_bearer(token)
        .json(&json!({
            "bookId": book_id,
            "chapterNumber": number,
            "title": format!("Chapter {}", number),
            "summary": format!("Key ideas of chapter {}", number),
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

/// Create a book with `chapters` chapters and return the book id
pub async fn book_with_chapters(app: &TestApp, token: &str, title: &str, chapters: i64) -> i64 {
    let book = create_book(app, token, title, "Self-Help").await;
    let book_id = book["id"].as_i64().expect("book id");
    for number in 1..=chapters {
        create_chapter(app, token, book_id, number).await;
    }
    book_id
}
