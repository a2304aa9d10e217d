//! # CORS layer
//!
//! Builds the [`CorsLayer`] for the API from [`CorsConfig`]. Browsers send
//! the bearer token in `Authorization`, so that header is always allowed;
//! pre-flight `OPTIONS` requests are answered here and are also let
//! through untouched by the bearer middleware.
//!
//! With no configured origins the layer allows `http://localhost:5173`.
//!
//! # Example
//! ```rust,no_run
//! use axum::{routing::get, Router};
//! use postboard::config::web::CorsConfig;
//! use postboard::web::cors::build_cors;
//!
//! let cfg = CorsConfig { env: "https://app.example".into(), credentials: true };
//! let app: Router = Router::new()
//!     .route("/api/v1/health/live", get(|| async { "ok" }))
//!     .layer(build_cors(&cfg));
//! ```

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::web::CorsConfig;

const DEV_ORIGIN: &str = "http://localhost:5173";

/// Splits the comma-separated origin list, dropping blanks and values that
/// are not valid header values.
fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect()
}

pub fn build_cors(cors: &CorsConfig) -> CorsLayer {
    let origins = parse_origins(&cors.env);
    let allow_origin = if origins.is_empty() {
        AllowOrigin::list([HeaderValue::from_static(DEV_ORIGIN)])
    } else {
        AllowOrigin::list(origins)
    };

    let layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE]);

    if cors.credentials {
        layer.allow_credentials(true)
    } else {
        layer
    }
}
