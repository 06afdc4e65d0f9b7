//! Database Module
//!
//! Builds the SQLite connection pool shared by every service and applies the
//! embedded migrations under `migrations/`.
//!
//! Every connection is opened with foreign keys enabled, so deleting a book
//! cascades to its chapters, favorites and progress rows.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Connections kept by the application pool
const MAX_CONNECTIONS: u32 = 5;

/// Build connection options shared by all pooled connections.
fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    SqliteConnectOptions::from_str(database_url).map(|opts| {
        opts.create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
    })
}

/// Create the connection pool and bring the schema up to date
///
/// # Arguments
///
/// * `database_url` - sqlx SQLite URL, e.g. `sqlite://bookblinks.db`
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database at {}", database_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(connect_options(database_url)?)
        .await?;

    run_migrations(&pool).await?;

    tracing::info!("Database pool created successfully");
    Ok(pool)
}

/// Create a migrated in-memory database on a single connection
///
/// An in-memory SQLite database lives only as long as its connection, so
/// the pool is capped at one connection that is never recycled.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Apply embedded migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}
