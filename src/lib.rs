//! # postboard
//!
//! Account registration, login and bearer-token session handling for the
//! postboard HTTP API.
//!
//! This crate provides:
//! - Credential hashing and verification (`auth::password`)
//! - Signed access/refresh token issuing and verification (`auth::jwt`)
//! - Request-scoped identity and the bearer middleware (`auth::identity`, `auth::middleware`)
//! - Registration and login orchestration over an account store (`account`)
//! - Posts with author ownership and soft deletion (`post`)
//! - Environment-driven configuration (`config`) and the MySQL port (`db`)
//! - The axum router and handlers (`web`)
//!
//! ## Example usage
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use postboard::auth::jwt::TokenService;
//! use postboard::config::auth::AuthConfig;
//! use postboard::time::system_clock::SystemClock;
//!
//! let cfg = AuthConfig::for_secret("doc-secret", "postboard-api", Duration::from_secs(900), Duration::from_secs(3600));
//! let tokens = TokenService::new(&cfg, Arc::new(SystemClock));
//!
//! let token = tokens.issue_access_token(7, "user").unwrap();
//! assert_eq!(tokens.verify(&token).unwrap().user_id, 7);
//! ```

// ===============================
// Re-exports of external crates
// ===============================

pub use anyhow;
pub use axum;
pub use chrono;
pub use dotenvy;
pub use mysql;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower;
pub use tower_http;

// ===============================
// Public modules
// ===============================
pub mod account;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod post;
pub mod time;
pub mod web;
