//! Application configuration module
//!
//! Provides the server configuration, its builder and the loader that merges
//! an optional TOML file with environment variables.
//!
//! # Sources
//!
//! Values are resolved in this order, later sources winning:
//!
//! 1. Built-in defaults (suitable for local development)
//! 2. The TOML file named by `BOOKBLINKS_CONFIG`, if set
//! 3. Environment variables (a `.env` file is loaded by the binary first)
//!
//! # Example
//!
//! ```rust
//! use bookblinks::shared::config::AppConfig;
//!
//! let config = AppConfig::builder()
//!     .port(8080)
//!     .jwt_secret("secret")
//!     .build()
//!     .unwrap();
//! assert_eq!(config.port, 8080);
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default SQLite location
pub const DEFAULT_DATABASE_URL: &str = "sqlite://bookblinks.db";

/// Signing secret used when none is configured outside production
pub const DEVELOPMENT_JWT_SECRET: &str = "bookblinks-development-secret";

/// Largest accepted book PDF (50 MiB)
pub const DEFAULT_MAX_BOOK_PDF_BYTES: usize = 50 * 1024 * 1024;

/// Largest accepted chapter PDF (20 MiB)
pub const DEFAULT_MAX_CHAPTER_PDF_BYTES: usize = 20 * 1024 * 1024;

/// Credentials for the administrator seeded at startup
#[derive(Debug, Clone, PartialEq)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminSeed {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@bookblinks.com".to_string(),
            password: "admin123".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// sqlx connection URL for the SQLite database
    pub database_url: String,
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Root directory for stored PDFs
    pub upload_dir: PathBuf,
    /// Production mode marks the session cookie `Secure` and disables the fallback admin password
    pub production: bool,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Administrator created on first start, if any
    pub default_admin: Option<AdminSeed>,
    /// Load the sample catalog into an empty database at startup
    pub seed_sample_data: bool,
    /// Allowed CORS origins; empty means permissive
    pub cors_allowed_origins: Vec<String>,
    pub max_book_pdf_bytes: usize,
    pub max_chapter_pdf_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            upload_dir: PathBuf::from("uploads"),
            production: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            default_admin: Some(AdminSeed::default()),
            seed_sample_data: false,
            cors_allowed_origins: Vec::new(),
            max_book_pdf_bytes: DEFAULT_MAX_BOOK_PDF_BYTES,
            max_chapter_pdf_bytes: DEFAULT_MAX_CHAPTER_PDF_BYTES,
        }
    }
}

/// Optional settings read from a TOML file
///
/// Every key is optional; missing keys fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub database_url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub jwt_secret: Option<String>,
    pub upload_dir: Option<PathBuf>,
    pub production: Option<bool>,
    pub bcrypt_cost: Option<u32>,
    pub seed_sample_data: Option<bool>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub max_book_pdf_bytes: Option<usize>,
    pub max_chapter_pdf_bytes: Option<usize>,
}

impl FileConfig {
    /// Parse a TOML document
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&contents)
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from the process environment
    ///
    /// Reads the TOML file named by `BOOKBLINKS_CONFIG` first, then applies
    /// environment overrides and validates the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, a value does not
    /// parse, or the merged configuration fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = match std::env::var("BOOKBLINKS_CONFIG") {
            Ok(path) => Some(FileConfig::load(Path::new(&path))?),
            Err(_) => None,
        };
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Merge a file config with a key lookup (normally the environment)
    pub fn from_sources<F>(file: Option<FileConfig>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();
        let mut builder = AppConfig::builder();

        if let Some(url) = lookup("DATABASE_URL").or(file.database_url) {
            builder = builder.database_url(url);
        }
        if let Some(host) = lookup("SERVER_HOST").or(file.host) {
            builder = builder.host(host);
        }
        match lookup("SERVER_PORT") {
            Some(raw) => builder = builder.port(parse_value("SERVER_PORT", &raw)?),
            None => {
                if let Some(port) = file.port {
                    builder = builder.port(port);
                }
            }
        }
        if let Some(dir) = lookup("UPLOAD_DIR").map(PathBuf::from).or(file.upload_dir) {
            builder = builder.upload_dir(dir);
        }

        let production = match lookup("APP_ENV").or_else(|| lookup("NODE_ENV")) {
            Some(env) => env.eq_ignore_ascii_case("production"),
            None => file.production.unwrap_or(false),
        };
        builder = builder.production(production);

        match lookup("BCRYPT_COST") {
            Some(raw) => builder = builder.bcrypt_cost(parse_value("BCRYPT_COST", &raw)?),
            None => {
                if let Some(cost) = file.bcrypt_cost {
                    builder = builder.bcrypt_cost(cost);
                }
            }
        }

        match lookup("JWT_SECRET").or(file.jwt_secret) {
            Some(secret) => builder = builder.jwt_secret(secret),
            None if production => return Err(ConfigError::MissingValue("JWT_SECRET")),
            None => {
                tracing::warn!("JWT_SECRET not set, using the development signing secret");
            }
        }

        match lookup("SEED_SAMPLE_DATA") {
            Some(raw) => builder = builder.seed_sample_data(parse_value("SEED_SAMPLE_DATA", &raw)?),
            None => {
                if let Some(seed) = file.seed_sample_data {
                    builder = builder.seed_sample_data(seed);
                }
            }
        }

        if let Some(raw) = lookup("CORS_ALLOWED_ORIGINS") {
            builder = builder.cors_allowed_origins(split_list(&raw));
        } else if let Some(origins) = file.cors_allowed_origins {
            builder = builder.cors_allowed_origins(origins);
        }

        if let Some(max) = file.max_book_pdf_bytes {
            builder = builder.max_book_pdf_bytes(max);
        }
        if let Some(max) = file.max_chapter_pdf_bytes {
            builder = builder.max_chapter_pdf_bytes(max);
        }

        let defaults = AdminSeed::default();
        let password = match lookup("DEFAULT_ADMIN_PASSWORD") {
            Some(password) => Some(password),
            None if production => {
                tracing::warn!(
                    "DEFAULT_ADMIN_PASSWORD not set in production, no administrator will be seeded"
                );
                None
            }
            None => Some(defaults.password),
        };
        builder = builder.default_admin(password.map(|password| AdminSeed {
            username: lookup("DEFAULT_ADMIN_USERNAME").unwrap_or(defaults.username),
            email: lookup("DEFAULT_ADMIN_EMAIL").unwrap_or(defaults.email),
            password,
        }));

        builder.build()
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SERVER_PORT",
                message: "port must be non-zero".to_string(),
            });
        }
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                message: format!("{} is outside 4..=31", self.bcrypt_cost),
            });
        }
        if self.max_book_pdf_bytes == 0 || self.max_chapter_pdf_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_pdf_bytes",
                message: "upload limits must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: Option<AppConfig>,
}

impl AppConfigBuilder {
    fn config(&mut self) -> &mut AppConfig {
        self.config.get_or_insert_with(AppConfig::default)
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config().database_url = url.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config().host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config().port = port;
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config().jwt_secret = secret.into();
        self
    }

    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config().upload_dir = dir.into();
        self
    }

    pub fn production(mut self, production: bool) -> Self {
        self.config().production = production;
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.config().bcrypt_cost = cost;
        self
    }

    pub fn default_admin(mut self, seed: Option<AdminSeed>) -> Self {
        self.config().default_admin = seed;
        self
    }

    pub fn seed_sample_data(mut self, seed: bool) -> Self {
        self.config().seed_sample_data = seed;
        self
    }

    pub fn cors_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.config().cors_allowed_origins = origins;
        self
    }

    pub fn max_book_pdf_bytes(mut self, max: usize) -> Self {
        self.config().max_book_pdf_bytes = max;
        self
    }

    pub fn max_chapter_pdf_bytes(mut self, max: usize) -> Self {
        self.config().max_chapter_pdf_bytes = max;
        self
    }

    /// Build and validate the configuration
    pub fn build(mut self) -> Result<AppConfig, ConfigError> {
        let config = self.config().clone();
        config.validate()?;
        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        message: e.to_string(),
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
    #[error("invalid config file: {0}")]
    Toml(String),
}
