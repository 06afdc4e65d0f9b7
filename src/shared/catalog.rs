//! Catalog Types
//!
//! Books and their chapters ("blinks"), plus the request payloads used to
//! create and edit them. All types serialize with camelCase keys.
//!
//! # Derived Fields
//!
//! `Book::total_chapters` and `Book::favorite_count` are never stored. They
//! are computed by the query that loads the book, so they always match the
//! live chapter and favorite rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::{require_text, SharedError};

/// Reading time assumed for a chapter when none is given
pub const DEFAULT_READ_TIME_MINUTES: i64 = 5;

/// A book in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    pub category: String,
    /// Server-side storage path of the attached PDF
    #[serde(skip)]
    pub pdf_path: Option<String>,
    pub pdf_file_name: Option<String>,
    pub pdf_size: Option<i64>,
    pub page_count: i64,
    /// Number of chapters currently attached to the book
    pub total_chapters: i64,
    /// Number of devices that favorited the book
    pub favorite_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A chapter summary belonging to a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: i64,
    pub book_id: i64,
    pub chapter_number: i64,
    pub title: String,
    pub summary: String,
    pub read_time_minutes: i64,
    #[serde(skip)]
    pub pdf_path: Option<String>,
    pub pdf_file_name: Option<String>,
    pub pdf_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A book together with its chapters, ordered by chapter number
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookWithChapters {
    #[serde(flatten)]
    pub book: Book,
    pub chapters: Vec<Chapter>,
}

/// Number of books in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Payload for creating a book
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub category: Option<String>,
}

/// A validated book ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    pub category: String,
}

impl NewBook {
    /// Check required fields and fill optional ones with empty strings
    pub fn validate(self) -> Result<BookDraft, SharedError> {
        let title = require_text("title", self.title.as_deref())?.to_string();
        let author = require_text("author", self.author.as_deref())?.to_string();
        Ok(BookDraft {
            title,
            author,
            description: self.description.unwrap_or_default(),
            cover_image: self.cover_image.unwrap_or_default(),
            category: self.category.map(|c| c.trim().to_string()).unwrap_or_default(),
        })
    }
}

/// Partial update for a book; omitted fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub category: Option<String>,
}

impl BookUpdate {
    /// Title and author may be omitted but never blanked
    pub fn validate(mut self) -> Result<Self, SharedError> {
        if self.title.is_some() {
            self.title = Some(require_text("title", self.title.as_deref())?.to_string());
        }
        if self.author.is_some() {
            self.author = Some(require_text("author", self.author.as_deref())?.to_string());
        }
        if let Some(category) = self.category.as_mut() {
            *category = category.trim().to_string();
        }
        Ok(self)
    }
}

/// Payload for creating a chapter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChapter {
    pub book_id: Option<i64>,
    pub chapter_number: Option<i64>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub read_time_minutes: Option<i64>,
}

/// A validated chapter ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterDraft {
    pub book_id: i64,
    pub chapter_number: i64,
    pub title: String,
    pub summary: String,
    pub read_time_minutes: i64,
}

impl NewChapter {
    pub fn validate(self) -> Result<ChapterDraft, SharedError> {
        let book_id = self
            .book_id
            .ok_or_else(|| SharedError::validation("bookId", "bookId is required"))?;
        let chapter_number = self
            .chapter_number
            .ok_or_else(|| SharedError::validation("chapterNumber", "chapterNumber is required"))?;
        check_chapter_number(chapter_number)?;
        let title = require_text("title", self.title.as_deref())?.to_string();
        let summary = require_text("summary", self.summary.as_deref())?.to_string();
        let read_time_minutes = self.read_time_minutes.unwrap_or(DEFAULT_READ_TIME_MINUTES);
        check_read_time(read_time_minutes)?;

        Ok(ChapterDraft {
            book_id,
            chapter_number,
            title,
            summary,
            read_time_minutes,
        })
    }
}

/// Partial update for a chapter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterUpdate {
    pub chapter_number: Option<i64>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub read_time_minutes: Option<i64>,
}

impl ChapterUpdate {
    pub fn validate(mut self) -> Result<Self, SharedError> {
        if let Some(number) = self.chapter_number {
            check_chapter_number(number)?;
        }
        if let Some(minutes) = self.read_time_minutes {
            check_read_time(minutes)?;
        }
        if self.title.is_some() {
            self.title = Some(require_text("title", self.title.as_deref())?.to_string());
        }
        if self.summary.is_some() {
            self.summary = Some(require_text("summary", self.summary.as_deref())?.to_string());
        }
        Ok(self)
    }
}

fn check_chapter_number(number: i64) -> Result<(), SharedError> {
    if number < 1 {
        return Err(SharedError::validation(
            "chapterNumber",
            "chapterNumber must be at least 1",
        ));
    }
    Ok(())
}

fn check_read_time(minutes: i64) -> Result<(), SharedError> {
    if minutes < 1 {
        return Err(SharedError::validation(
            "readTimeMinutes",
            "readTimeMinutes must be at least 1",
        ));
    }
    Ok(())
}
