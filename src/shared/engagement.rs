//! Engagement Types
//!
//! Favorites and reading progress for anonymous readers.
//!
//! # Device Identity
//!
//! Readers are identified only by a client-generated `deviceId` string.
//! Whoever presents a device id can read and change that device's
//! favorites and progress; the id is a bearer capability, not an account.
//!
//! # Progress Derivation
//!
//! `percentComplete` and `completedAt` are always derived on the server
//! from the set of chapters read and the live chapter count of the book:
//!
//! ```rust
//! use bookblinks::shared::engagement::percent_complete;
//!
//! assert_eq!(percent_complete(3, 3), 100.0);
//! assert_eq!(percent_complete(0, 0), 0.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::{require_text, SharedError};

/// A favorite joined with the fields of its book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i64,
    pub device_id: String,
    pub book_id: i64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    pub category: String,
    pub total_chapters: i64,
}

/// Answer to "has this device favorited this book?"
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub is_favorited: bool,
    pub favorite: Option<Favorite>,
}

/// Payload for adding a favorite
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    pub device_id: Option<String>,
    pub book_id: Option<i64>,
}

impl NewFavorite {
    pub fn validate(self) -> Result<(String, i64), SharedError> {
        let device_id = require_device_id(self.device_id.as_deref())?;
        let book_id = self
            .book_id
            .ok_or_else(|| SharedError::validation("bookId", "bookId is required"))?;
        Ok((device_id, book_id))
    }
}

/// Reading progress of one device through one book
///
/// A device that never read the book gets the default value with `id` unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingProgress {
    pub id: Option<i64>,
    pub device_id: String,
    pub book_id: i64,
    /// Sorted, deduplicated chapter numbers
    pub chapters_read: Vec<i64>,
    pub last_read_chapter: Option<i64>,
    pub percent_complete: f64,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_chapters: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl ReadingProgress {
    /// Progress for a device that has not started the book
    pub fn empty(device_id: impl Into<String>, book_id: i64, total_chapters: i64) -> Self {
        Self {
            id: None,
            device_id: device_id.into(),
            book_id,
            chapters_read: Vec::new(),
            last_read_chapter: None,
            percent_complete: 0.0,
            completed_at: None,
            total_chapters,
            created_at: None,
            last_updated: None,
        }
    }
}

/// Progress entry in a device's library, with book details
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    #[serde(flatten)]
    pub progress: ReadingProgress,
    pub title: String,
    pub author: String,
    pub cover_image: String,
}

/// Payload for the progress upsert
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpsert {
    pub device_id: Option<String>,
    pub book_id: Option<i64>,
    #[serde(default)]
    pub chapters_read: Vec<i64>,
    pub last_read_chapter: Option<i64>,
}

impl ProgressUpsert {
    pub fn validate(self) -> Result<(String, i64, ProgressUpdate), SharedError> {
        let device_id = require_device_id(self.device_id.as_deref())?;
        let book_id = self
            .book_id
            .ok_or_else(|| SharedError::validation("bookId", "bookId is required"))?;
        Ok((
            device_id,
            book_id,
            ProgressUpdate {
                chapters_read: self.chapters_read,
                last_read_chapter: self.last_read_chapter,
            },
        ))
    }
}

/// Replacement chapter set for an existing progress row
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    #[serde(default)]
    pub chapters_read: Vec<i64>,
    pub last_read_chapter: Option<i64>,
}

fn require_device_id(device_id: Option<&str>) -> Result<String, SharedError> {
    Ok(require_text("deviceId", device_id)?.to_string())
}

/// Sort and deduplicate chapter numbers, dropping anything below 1.
pub fn normalize_chapters(chapters: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut chapters: Vec<i64> = chapters.into_iter().filter(|n| *n >= 1).collect();
    chapters.sort_unstable();
    chapters.dedup();
    chapters
}

/// Percentage of a book read, in `0.0..=100.0`.
pub fn percent_complete(chapters_read: usize, total_chapters: i64) -> f64 {
    if total_chapters <= 0 {
        return 0.0;
    }
    let percent = chapters_read as f64 / total_chapters as f64 * 100.0;
    percent.min(100.0)
}

/// Completion timestamp for a given percentage; only a finished book has one.
pub fn completed_at(percent: f64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    (percent >= 100.0).then_some(now)
}
