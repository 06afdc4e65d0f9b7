/**
 * Search Database Operations
 *
 * Category aggregation and case-insensitive substring search over books
 * and their chapters.
 */

use sqlx::SqlitePool;

use crate::backend::catalog::db::BOOK_COLUMNS;
use crate::shared::catalog::{Book, CategoryCount};

/// Non-empty categories with their book counts, alphabetically
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<CategoryCount>, sqlx::Error> {
    sqlx::query_as::<_, CategoryCount>(
        r#"
        SELECT category, COUNT(*) AS count
        FROM books
        WHERE category <> ''
        GROUP BY category
        ORDER BY category ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Books whose own fields or chapter title/summary contain `query`
///
/// Each book appears once, newest first. `%` and `_` in the query match
/// literally. Case folding is ASCII-only to agree with SQLite's `LOWER`.
pub async fn search_books(pool: &SqlitePool, query: &str) -> Result<Vec<Book>, sqlx::Error> {
    let pattern = format!("%{}%", escape_like(&query.to_ascii_lowercase()));
    let sql = format!(
        r#"
        SELECT {}
        FROM books b
        WHERE LOWER(b.title) LIKE ?1 ESCAPE '\'
           OR LOWER(b.author) LIKE ?1 ESCAPE '\'
           OR LOWER(b.description) LIKE ?1 ESCAPE '\'
           OR LOWER(b.category) LIKE ?1 ESCAPE '\'
           OR EXISTS (
               SELECT 1 FROM chapters c
               WHERE c.book_id = b.id
                 AND (LOWER(c.title) LIKE ?1 ESCAPE '\'
                      OR LOWER(c.summary) LIKE ?1 ESCAPE '\')
           )
        ORDER BY b.created_at DESC, b.id DESC
        "#,
        BOOK_COLUMNS
    );
    sqlx::query_as::<_, Book>(&sql)
        .bind(pattern)
        .fetch_all(pool)
        .await
}

/// Escape LIKE wildcards with `\`
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
