//! # HTTP and CORS Configuration
//!
//! Defines basic configuration structures for the HTTP listener and
//! CORS (Cross-Origin Resource Sharing) behavior.
//!
//! These are included within [`AppConfig`](crate::config::app::AppConfig).
//!
//! # Examples
//! ```rust
//! use postboard::config::web::{HttpConfig, CorsConfig};
//!
//! let http = HttpConfig { host: "127.0.0.1".into(), port: 8080, max_body_bytes: 10 * 1024 * 1024 };
//! let cors = CorsConfig {
//!     env: "http://localhost:5173".into(),
//!     credentials: true,
//! };
//!
//! assert_eq!(http.addr(), "127.0.0.1:8080");
//! assert_eq!(cors.env, "http://localhost:5173");
//! ```

/// HTTP listener configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl HttpConfig {
    /// Returns the `host:port` pair to bind.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
///
/// `env` holds the raw comma-separated origin list as read from
/// `CORS_ORIGINS`.
#[derive(Clone, Debug, PartialEq)]
pub struct CorsConfig {
    pub env: String,
    pub credentials: bool,
}
