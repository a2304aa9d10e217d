//! # Application Configuration Loader
//!
//! Provides a unified configuration loader for the HTTP listener, CORS,
//! the database and token/credential settings.
//!
//! Automatically loads `.env` files for non-production environments.
//! It checks for a custom `DOTENV_FILE` path first, then falls back to
//! `.env.{APP_ENV}` or `.env`.
//!
//! The configuration is initialized once at application startup and
//! passed by reference into everything that needs it.
//!
//! # Environment Variables
//! | Variable | Description | Default |
//! |-----------|-------------|----------|
//! | `APP_ENV` | Current environment (`development`, `production`, etc.) | `"development"` |
//! | `DOTENV_FILE` | Optional path to a custom dotenv file | *none* |
//! | `APP_HOST` | Listener host | `"0.0.0.0"` |
//! | `APP_PORT` | Listener port | `8080` |
//! | `DATABASE_URL` | MySQL connection URL | *required by the binary* |
//! | `HTTP_MAX_BODY_BYTES` | Maximum request body size (bytes) | derived from `HTTP_MAX_BODY_MB` |
//! | `HTTP_MAX_BODY_MB` | Max body size in megabytes (if bytes not set) | `5` |
//! | `CORS_ORIGINS` | Allowed origins for CORS | `""` |
//! | `CORS_CREDENTIALS` | Allow cookies/headers in CORS requests | `false` |
//! | `JWT_*`, `PASSWORD_HASH_COST` | See [`AuthConfig`] | |

use std::env;

use anyhow::Result;

use crate::config::{
    auth::AuthConfig,
    db::DbConfig,
    env::*,
    web::{CorsConfig, HttpConfig},
};

/// Top-level application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Value of `APP_ENV`.
    pub env: String,
    /// HTTP listener configuration.
    pub http: HttpConfig,
    /// Cross-Origin Resource Sharing configuration.
    pub cors: CorsConfig,
    /// Database configuration.
    pub db: DbConfig,
    /// Token signing and password hashing.
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Loads application configuration from environment variables.
    ///
    /// ## Behavior
    /// - Reads `APP_ENV` (defaults to `"development"`).
    /// - Loads `.env` or `.env.{APP_ENV}` for non-production environments.
    /// - Parses all supported environment variables and falls back to defaults.
    ///
    /// # Errors
    /// Fails when the token settings are invalid, e.g. `JWT_SECRET` is
    /// missing in production.
    pub fn from_env() -> Result<Self> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        if app_env != "production" {
            if let Ok(path) = env::var("DOTENV_FILE") {
                let _ = dotenvy::from_filename(path);
            } else {
                let candidate = format!(".env.{}", app_env);
                dotenvy::from_filename(&candidate)
                    .or_else(|_| dotenvy::dotenv())
                    .ok();
            }
        }

        let http_max_body_bytes = env::var("HTTP_MAX_BODY_BYTES")
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or_else(|| (read_u32("HTTP_MAX_BODY_MB", 5) as usize) * 1024 * 1024);

        let port = u16::try_from(read_u32("APP_PORT", 8080)).unwrap_or(8080);

        Ok(AppConfig {
            http: HttpConfig {
                host: env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
                port,
                max_body_bytes: http_max_body_bytes,
            },
            cors: CorsConfig {
                env: env::var("CORS_ORIGINS").unwrap_or_default(),
                credentials: read_flag("CORS_CREDENTIALS", false),
            },
            db: DbConfig::from_env(),
            auth: AuthConfig::from_env(&app_env)?,
            env: app_env,
        })
    }

    /// One-line summary safe for logs: no secret, no database password.
    pub fn redacted(&self) -> String {
        format!(
            "env={} addr={} db={} issuer={} access_ttl={}s refresh_ttl={}s hash_cost={}",
            self.env,
            self.http.addr(),
            self.db.redacted_url(),
            self.auth.issuer,
            self.auth.access_ttl.as_secs(),
            self.auth.refresh_ttl.as_secs(),
            self.auth.hash_cost,
        )
    }
}
