/**
 * Server Configuration
 *
 * Startup steps that turn an `AppConfig` into live resources: the database
 * pool, the default administrator account and the optional sample catalog.
 */

use sqlx::SqlitePool;

use crate::backend::auth::password::hash_password;
use crate::backend::auth::users::{admin_exists, create_user, ADMIN_ROLE};
use crate::backend::catalog::samples::seed_sample_catalog;
use crate::backend::db::create_pool;
use crate::backend::error::BackendError;
use crate::shared::AppConfig;

/// Open the database and run migrations
///
/// Unlike optional services, the catalog cannot run without its database,
/// so any failure here aborts startup.
pub async fn load_database(config: &AppConfig) -> Result<SqlitePool, sqlx::Error> {
    create_pool(&config.database_url).await.map_err(|e| {
        tracing::error!("Failed to open database {}: {:?}", config.database_url, e);
        e
    })
}

/// Create the configured administrator when no administrator exists yet
///
/// # Returns
/// `true` if an account was created
pub async fn ensure_default_admin(
    pool: &SqlitePool,
    config: &AppConfig,
) -> Result<bool, BackendError> {
    let Some(seed) = &config.default_admin else {
        return Ok(false);
    };
    if admin_exists(pool).await? {
        return Ok(false);
    }

    let hash = hash_password(&seed.password, config.bcrypt_cost).await?;
    match create_user(pool, &seed.username, &seed.email, &hash, ADMIN_ROLE).await {
        Ok(user) => {
            tracing::warn!(
                "Created default administrator '{}'; change its password",
                user.username
            );
            Ok(true)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            tracing::warn!(
                "Default administrator '{}' not created: username or email taken",
                seed.username
            );
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Load the sample catalog when enabled and the catalog is empty
pub async fn ensure_sample_catalog(
    pool: &SqlitePool,
    config: &AppConfig,
) -> Result<usize, sqlx::Error> {
    if !config.seed_sample_data {
        return Ok(0);
    }
    let added = seed_sample_catalog(pool).await?;
    if added > 0 {
        tracing::info!("Loaded {} sample books", added);
    }
    Ok(added)
}
