/**
 * Catalog Database Operations
 *
 * Queries for books and chapters. Every book query selects the live
 * chapter and favorite counts through correlated subqueries, so no cached
 * counter can drift from the chapter rows.
 */

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::backend::engagement::db::refresh_book_progress;
use crate::shared::catalog::{Book, BookDraft, BookUpdate, Chapter, ChapterDraft, ChapterUpdate};

/// Column list for `Book`, with derived counts; `b` is the books alias
pub(crate) const BOOK_COLUMNS: &str = r#"
    b.id, b.title, b.author, b.description, b.cover_image, b.category,
    b.pdf_path, b.pdf_file_name, b.pdf_size, b.page_count,
    (SELECT COUNT(*) FROM chapters c WHERE c.book_id = b.id) AS total_chapters,
    (SELECT COUNT(*) FROM favorites f WHERE f.book_id = b.id) AS favorite_count,
    b.created_at, b.updated_at
"#;

const CHAPTER_COLUMNS: &str = r#"
    id, book_id, chapter_number, title, summary, read_time_minutes,
    pdf_path, pdf_file_name, pdf_size, created_at, updated_at
"#;

/// PDF metadata attached to a book or chapter
#[derive(Debug, Clone, PartialEq)]
pub struct PdfAttachment {
    pub path: String,
    pub file_name: String,
    pub size: i64,
}

/// List all books, newest first
pub async fn list_books(pool: &SqlitePool) -> Result<Vec<Book>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM books b ORDER BY b.created_at DESC, b.id DESC",
        BOOK_COLUMNS
    );
    sqlx::query_as::<_, Book>(&sql).fetch_all(pool).await
}

/// List books with an exact category, newest first
pub async fn list_books_by_category(
    pool: &SqlitePool,
    category: &str,
) -> Result<Vec<Book>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM books b WHERE b.category = ? ORDER BY b.created_at DESC, b.id DESC",
        BOOK_COLUMNS
    );
    sqlx::query_as::<_, Book>(&sql)
        .bind(category)
        .fetch_all(pool)
        .await
}

/// Get book by ID
pub async fn get_book(pool: &SqlitePool, id: i64) -> Result<Option<Book>, sqlx::Error> {
    let sql = format!("SELECT {} FROM books b WHERE b.id = ?", BOOK_COLUMNS);
    sqlx::query_as::<_, Book>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert a book, optionally with an already stored PDF
pub async fn create_book(
    pool: &SqlitePool,
    draft: &BookDraft,
    pdf: Option<(&PdfAttachment, i64)>,
) -> Result<Book, sqlx::Error> {
    let now = Utc::now();
    let (pdf_path, pdf_file_name, pdf_size, page_count) = match pdf {
        Some((attachment, pages)) => (
            Some(attachment.path.as_str()),
            Some(attachment.file_name.as_str()),
            Some(attachment.size),
            pages,
        ),
        None => (None, None, None, 0),
    };

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO books (title, author, description, cover_image, category,
                           pdf_path, pdf_file_name, pdf_size, page_count,
                           created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&draft.title)
    .bind(&draft.author)
    .bind(&draft.description)
    .bind(&draft.cover_image)
    .bind(&draft.category)
    .bind(pdf_path)
    .bind(pdf_file_name)
    .bind(pdf_size)
    .bind(page_count)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    get_book(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Apply a partial update
///
/// # Returns
/// The updated book, or `None` if it does not exist
pub async fn update_book(
    pool: &SqlitePool,
    id: i64,
    update: &BookUpdate,
) -> Result<Option<Book>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE books SET
            title = COALESCE(?, title),
            author = COALESCE(?, author),
            description = COALESCE(?, description),
            cover_image = COALESCE(?, cover_image),
            category = COALESCE(?, category),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(update.title.as_deref())
    .bind(update.author.as_deref())
    .bind(update.description.as_deref())
    .bind(update.cover_image.as_deref())
    .bind(update.category.as_deref())
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_book(pool, id).await
}

/// Delete a book and everything that cascades from it
///
/// # Returns
/// The PDF paths that belonged to the book and its chapters, or `None` if
/// the book did not exist. Files are not touched here.
pub async fn delete_book(pool: &SqlitePool, id: i64) -> Result<Option<Vec<String>>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let book_pdf: Option<Option<String>> =
        sqlx::query_scalar("SELECT pdf_path FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(book_pdf) = book_pdf else {
        return Ok(None);
    };

    let chapter_pdfs: Vec<String> = sqlx::query_scalar(
        "SELECT pdf_path FROM chapters WHERE book_id = ? AND pdf_path IS NOT NULL",
    )
    .bind(id)
    .fetch_all(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(Some(book_pdf.into_iter().chain(chapter_pdfs).collect()))
}

/// List chapters of a book ordered by chapter number
pub async fn list_chapters(pool: &SqlitePool, book_id: i64) -> Result<Vec<Chapter>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM chapters WHERE book_id = ? ORDER BY chapter_number ASC",
        CHAPTER_COLUMNS
    );
    sqlx::query_as::<_, Chapter>(&sql)
        .bind(book_id)
        .fetch_all(pool)
        .await
}

/// Get chapter by ID
pub async fn get_chapter(pool: &SqlitePool, id: i64) -> Result<Option<Chapter>, sqlx::Error> {
    let sql = format!("SELECT {} FROM chapters WHERE id = ?", CHAPTER_COLUMNS);
    sqlx::query_as::<_, Chapter>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Insert a chapter
///
/// A missing book surfaces as a foreign key violation and a repeated
/// chapter number as a unique violation. The book's progress rows are
/// re-derived in the same transaction.
pub async fn create_chapter(pool: &SqlitePool, draft: &ChapterDraft) -> Result<Chapter, sqlx::Error> {
    let now = Utc::now();
    let sql = format!(
        r#"
        INSERT INTO chapters (book_id, chapter_number, title, summary, read_time_minutes,
                              created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        CHAPTER_COLUMNS
    );

    let mut tx = begin_write(pool).await?;
    let chapter = sqlx::query_as::<_, Chapter>(&sql)
        .bind(draft.book_id)
        .bind(draft.chapter_number)
        .bind(&draft.title)
        .bind(&draft.summary)
        .bind(draft.read_time_minutes)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
    refresh_book_progress(&mut tx, chapter.book_id).await?;
    tx.commit().await?;

    Ok(chapter)
}

/// Apply a partial update to a chapter
pub async fn update_chapter(
    pool: &SqlitePool,
    id: i64,
    update: &ChapterUpdate,
) -> Result<Option<Chapter>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE chapters SET
            chapter_number = COALESCE(?, chapter_number),
            title = COALESCE(?, title),
            summary = COALESCE(?, summary),
            read_time_minutes = COALESCE(?, read_time_minutes),
            updated_at = ?
        WHERE id = ?
        RETURNING {}
        "#,
        CHAPTER_COLUMNS
    );
    sqlx::query_as::<_, Chapter>(&sql)
        .bind(update.chapter_number)
        .bind(update.title.as_deref())
        .bind(update.summary.as_deref())
        .bind(update.read_time_minutes)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Delete a chapter and re-derive the book's progress rows
///
/// # Returns
/// `Some(pdf_path)` if the chapter existed (the path may itself be `None`)
pub async fn delete_chapter(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Option<String>>, sqlx::Error> {
    let mut tx = begin_write(pool).await?;
    let deleted: Option<(i64, Option<String>)> =
        sqlx::query_as("DELETE FROM chapters WHERE id = ? RETURNING book_id, pdf_path")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((book_id, pdf_path)) = deleted else {
        return Ok(None);
    };
    refresh_book_progress(&mut tx, book_id).await?;
    tx.commit().await?;

    Ok(Some(pdf_path))
}

/// Attach or clear the PDF of a chapter
///
/// # Returns
/// `Some(previous_path)` if the chapter exists
pub async fn set_chapter_pdf(
    pool: &SqlitePool,
    id: i64,
    pdf: Option<&PdfAttachment>,
) -> Result<Option<Option<String>>, sqlx::Error> {
    let mut tx: Transaction<'_, Sqlite> = pool.begin().await?;

    let previous: Option<Option<String>> =
        sqlx::query_scalar("SELECT pdf_path FROM chapters WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    if previous.is_none() {
        return Ok(None);
    }

    sqlx::query(
        r#"
        UPDATE chapters
        SET pdf_path = ?, pdf_file_name = ?, pdf_size = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(pdf.map(|p| p.path.as_str()))
    .bind(pdf.map(|p| p.file_name.as_str()))
    .bind(pdf.map(|p| p.size))
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(previous)
}

/// Start a write transaction that takes the database write lock up front
pub(crate) async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Count chapters of a book inside a transaction
pub(crate) async fn count_chapters_tx(
    tx: &mut Transaction<'_, Sqlite>,
    book_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM chapters WHERE book_id = ?")
        .bind(book_id)
        .fetch_one(&mut **tx)
        .await
}
