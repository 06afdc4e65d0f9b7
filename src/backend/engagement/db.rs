/**
 * Engagement Database Operations
 *
 * Favorites and reading progress, keyed by (device_id, book_id).
 *
 * # Atomicity
 *
 * - One favorite per pair is enforced by the UNIQUE constraint; a second
 *   insert fails with a unique violation instead of a check-then-insert race.
 * - Progress writes run in a `BEGIN IMMEDIATE` transaction that reads the
 *   live chapter count and applies a single `INSERT ... ON CONFLICT DO
 *   UPDATE`, so concurrent writers serialize on the database write lock.
 */

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool, Transaction};

use crate::backend::catalog::db::{begin_write, count_chapters_tx};
use crate::shared::engagement::{
    completed_at, normalize_chapters, percent_complete, Favorite, ProgressSummary, ProgressUpdate,
    ReadingProgress,
};

const FAVORITE_SELECT: &str = r#"
    SELECT f.id, f.device_id, f.book_id, f.created_at,
           b.title, b.author, b.description, b.cover_image, b.category,
           (SELECT COUNT(*) FROM chapters c WHERE c.book_id = b.id) AS total_chapters
    FROM favorites f
    JOIN books b ON b.id = f.book_id
"#;

const PROGRESS_SELECT: &str = r#"
    SELECT p.id, p.device_id, p.book_id, p.chapters_read, p.last_read_chapter,
           p.percent_complete, p.completed_at, p.created_at, p.last_updated,
           (SELECT COUNT(*) FROM chapters c WHERE c.book_id = p.book_id) AS total_chapters,
           b.title, b.author, b.cover_image
    FROM reading_progress p
    JOIN books b ON b.id = p.book_id
"#;

/// Raw progress row; `chapters_read` is stored as a JSON array
#[derive(Debug, sqlx::FromRow)]
struct ProgressRow {
    id: i64,
    device_id: String,
    book_id: i64,
    chapters_read: String,
    last_read_chapter: Option<i64>,
    percent_complete: f64,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
    total_chapters: i64,
    title: String,
    author: String,
    cover_image: String,
}

/// Decode a stored `chapters_read` column; corrupt data reads as empty
fn parse_chapters(id: i64, raw: &str) -> Vec<i64> {
    match serde_json::from_str::<Vec<i64>>(raw) {
        Ok(chapters) => normalize_chapters(chapters),
        Err(e) => {
            tracing::warn!("Corrupt chapters_read on progress {}: {}", id, e);
            Vec::new()
        }
    }
}

impl ProgressRow {
    fn into_summary(self) -> ProgressSummary {
        let chapters_read = parse_chapters(self.id, &self.chapters_read);
        ProgressSummary {
            progress: ReadingProgress {
                id: Some(self.id),
                device_id: self.device_id,
                book_id: self.book_id,
                chapters_read,
                last_read_chapter: self.last_read_chapter,
                percent_complete: self.percent_complete,
                completed_at: self.completed_at,
                total_chapters: self.total_chapters,
                created_at: Some(self.created_at),
                last_updated: Some(self.last_updated),
            },
            title: self.title,
            author: self.author,
            cover_image: self.cover_image,
        }
    }
}

/// Outcome of a progress write that needs the book to exist
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressWrite {
    /// `created` is true when the write inserted the pair's first row
    Saved {
        progress: ReadingProgress,
        created: bool,
    },
    BookNotFound,
    ChapterNotFound,
}

// ----------------------------------------------------------------------------
// Favorites
// ----------------------------------------------------------------------------

/// List a device's favorites, newest first
pub async fn list_favorites(pool: &SqlitePool, device_id: &str) -> Result<Vec<Favorite>, sqlx::Error> {
    let sql = format!(
        "{} WHERE f.device_id = ? ORDER BY f.created_at DESC, f.id DESC",
        FAVORITE_SELECT
    );
    sqlx::query_as::<_, Favorite>(&sql)
        .bind(device_id)
        .fetch_all(pool)
        .await
}

/// Get the favorite for a (device, book) pair
pub async fn get_favorite(
    pool: &SqlitePool,
    device_id: &str,
    book_id: i64,
) -> Result<Option<Favorite>, sqlx::Error> {
    let sql = format!("{} WHERE f.device_id = ? AND f.book_id = ?", FAVORITE_SELECT);
    sqlx::query_as::<_, Favorite>(&sql)
        .bind(device_id)
        .bind(book_id)
        .fetch_optional(pool)
        .await
}

/// Add a favorite
///
/// Fails with a unique violation if the pair exists and with a foreign key
/// violation if the book does not.
pub async fn add_favorite(
    pool: &SqlitePool,
    device_id: &str,
    book_id: i64,
) -> Result<Favorite, sqlx::Error> {
    sqlx::query("INSERT INTO favorites (device_id, book_id, created_at) VALUES (?, ?, ?)")
        .bind(device_id)
        .bind(book_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    get_favorite(pool, device_id, book_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// Remove the favorite for a pair; `true` if one was deleted
pub async fn remove_favorite(
    pool: &SqlitePool,
    device_id: &str,
    book_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM favorites WHERE device_id = ? AND book_id = ?")
        .bind(device_id)
        .bind(book_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove a favorite by row id; `true` if one was deleted
pub async fn remove_favorite_by_id(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM favorites WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ----------------------------------------------------------------------------
// Reading progress
// ----------------------------------------------------------------------------

async fn fetch_progress<'e, E>(
    executor: E,
    device_id: &str,
    book_id: i64,
) -> Result<Option<ReadingProgress>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{} WHERE p.device_id = ? AND p.book_id = ?", PROGRESS_SELECT);
    let row = sqlx::query_as::<_, ProgressRow>(&sql)
        .bind(device_id)
        .bind(book_id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(|r| r.into_summary().progress))
}

/// Get a device's progress through a book, if any was recorded
pub async fn get_progress(
    pool: &SqlitePool,
    device_id: &str,
    book_id: i64,
) -> Result<Option<ReadingProgress>, sqlx::Error> {
    fetch_progress(pool, device_id, book_id).await
}

/// Live chapter count of a book (0 for a missing book)
pub async fn count_chapters(pool: &SqlitePool, book_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM chapters WHERE book_id = ?")
        .bind(book_id)
        .fetch_one(pool)
        .await
}

/// All progress of a device with book details, most recently updated first
pub async fn list_progress(
    pool: &SqlitePool,
    device_id: &str,
) -> Result<Vec<ProgressSummary>, sqlx::Error> {
    let sql = format!(
        "{} WHERE p.device_id = ? ORDER BY p.last_updated DESC, p.id DESC",
        PROGRESS_SELECT
    );
    let rows = sqlx::query_as::<_, ProgressRow>(&sql)
        .bind(device_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(ProgressRow::into_summary).collect())
}

async fn book_exists_tx(tx: &mut Transaction<'_, Sqlite>, book_id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM books WHERE id = ?")
        .bind(book_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(found.is_some())
}

/// Derive and store progress for a pair inside an open transaction
///
/// # Returns
/// The stored row and whether it was inserted rather than updated
async fn store_progress(
    tx: &mut Transaction<'_, Sqlite>,
    device_id: &str,
    book_id: i64,
    chapters: Vec<i64>,
    last_read_chapter: Option<i64>,
) -> Result<(ReadingProgress, bool), sqlx::Error> {
    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM reading_progress WHERE device_id = ? AND book_id = ?")
            .bind(device_id)
            .bind(book_id)
            .fetch_optional(&mut **tx)
            .await?;
    let total = count_chapters_tx(tx, book_id).await?;
    let chapters = normalize_chapters(chapters);
    let percent = percent_complete(chapters.len(), total);
    let now = Utc::now();
    let chapters_json =
        serde_json::to_string(&chapters).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    sqlx::query(
        r#"
        INSERT INTO reading_progress (device_id, book_id, chapters_read, last_read_chapter,
                                      percent_complete, completed_at, created_at, last_updated)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(device_id, book_id) DO UPDATE SET
            chapters_read = excluded.chapters_read,
            last_read_chapter = COALESCE(excluded.last_read_chapter,
                                         reading_progress.last_read_chapter),
            percent_complete = excluded.percent_complete,
            completed_at = CASE
                WHEN excluded.completed_at IS NULL THEN NULL
                ELSE COALESCE(reading_progress.completed_at, excluded.completed_at)
            END,
            last_updated = excluded.last_updated
        "#,
    )
    .bind(device_id)
    .bind(book_id)
    .bind(&chapters_json)
    .bind(last_read_chapter)
    .bind(percent)
    .bind(completed_at(percent, now))
    .bind(now)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    let progress = fetch_progress(&mut **tx, device_id, book_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    Ok((progress, existing.is_none()))
}

/// Replace the chapter set of a (device, book) pair, creating the row if needed
pub async fn upsert_progress(
    pool: &SqlitePool,
    device_id: &str,
    book_id: i64,
    update: &ProgressUpdate,
) -> Result<ProgressWrite, sqlx::Error> {
    let mut tx = begin_write(pool).await?;
    if !book_exists_tx(&mut tx, book_id).await? {
        return Ok(ProgressWrite::BookNotFound);
    }

    let (progress, created) = store_progress(
        &mut tx,
        device_id,
        book_id,
        update.chapters_read.clone(),
        update.last_read_chapter,
    )
    .await?;
    tx.commit().await?;
    Ok(ProgressWrite::Saved { progress, created })
}

/// Add one chapter to the read set
///
/// Reading the current set, adding the chapter and writing it back happen in
/// one write transaction, so two requests marking different chapters at
/// once both land.
pub async fn mark_chapter_read(
    pool: &SqlitePool,
    device_id: &str,
    book_id: i64,
    chapter_number: i64,
) -> Result<ProgressWrite, sqlx::Error> {
    let mut tx = begin_write(pool).await?;
    if !book_exists_tx(&mut tx, book_id).await? {
        return Ok(ProgressWrite::BookNotFound);
    }

    let chapter: Option<i64> =
        sqlx::query_scalar("SELECT id FROM chapters WHERE book_id = ? AND chapter_number = ?")
            .bind(book_id)
            .bind(chapter_number)
            .fetch_optional(&mut *tx)
            .await?;
    if chapter.is_none() {
        return Ok(ProgressWrite::ChapterNotFound);
    }

    let mut chapters = fetch_progress(&mut *tx, device_id, book_id)
        .await?
        .map(|p| p.chapters_read)
        .unwrap_or_default();
    chapters.push(chapter_number);

    let (progress, created) =
        store_progress(&mut tx, device_id, book_id, chapters, Some(chapter_number)).await?;
    tx.commit().await?;
    Ok(ProgressWrite::Saved { progress, created })
}

/// Replace the chapter set of an existing progress row
///
/// # Returns
/// `None` if no row has this id
pub async fn update_progress_by_id(
    pool: &SqlitePool,
    id: i64,
    update: &ProgressUpdate,
) -> Result<Option<ReadingProgress>, sqlx::Error> {
    let mut tx = begin_write(pool).await?;
    let key: Option<(String, i64)> =
        sqlx::query_as("SELECT device_id, book_id FROM reading_progress WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((device_id, book_id)) = key else {
        return Ok(None);
    };

    let (progress, _) = store_progress(
        &mut tx,
        &device_id,
        book_id,
        update.chapters_read.clone(),
        update.last_read_chapter,
    )
    .await?;
    tx.commit().await?;
    Ok(Some(progress))
}

/// Re-derive every progress row of a book after its chapter count changed
///
/// Runs inside the caller's transaction, next to the chapter insert or
/// delete. `completed_at` keeps its first value while a row stays complete.
/// `last_updated` is left alone since the reader did nothing.
///
/// # Returns
/// Number of rows rewritten
pub(crate) async fn refresh_book_progress(
    tx: &mut Transaction<'_, Sqlite>,
    book_id: i64,
) -> Result<u64, sqlx::Error> {
    let total = count_chapters_tx(tx, book_id).await?;
    let rows: Vec<(i64, String, Option<DateTime<Utc>>)> = sqlx::query_as(
        "SELECT id, chapters_read, completed_at FROM reading_progress WHERE book_id = ?",
    )
    .bind(book_id)
    .fetch_all(&mut **tx)
    .await?;

    let now = Utc::now();
    let mut refreshed = 0;
    for (id, raw, previous) in rows {
        let percent = percent_complete(parse_chapters(id, &raw).len(), total);
        let completed = completed_at(percent, now).map(|at| previous.unwrap_or(at));
        sqlx::query(
            "UPDATE reading_progress SET percent_complete = ?, completed_at = ? WHERE id = ?",
        )
        .bind(percent)
        .bind(completed)
        .bind(id)
        .execute(&mut **tx)
        .await?;
        refreshed += 1;
    }

    if refreshed > 0 {
        tracing::debug!(
            "Recomputed {} progress row(s) of book {} for {} chapter(s)",
            refreshed,
            book_id,
            total
        );
    }
    Ok(refreshed)
}

/// Delete a progress row; `true` if one was deleted
pub async fn delete_progress(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reading_progress WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
