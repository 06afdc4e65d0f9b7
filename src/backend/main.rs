/**
 * Book Blinks Server Entry Point
 *
 * Loads `.env`, initializes tracing, reads the configuration and serves the
 * API until the process is stopped.
 */

use bookblinks::backend::server::create_app;
use bookblinks::shared::AppConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "bookblinks=debug,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = AppConfig::from_env()?;
    let addr = config.bind_address();
    if !config.production {
        tracing::warn!("Running in development mode; cookies are not marked Secure");
    }

    let app = create_app(config).await?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Book Blinks API listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
