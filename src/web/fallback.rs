use axum::{http::StatusCode, http::Uri};
use tracing::debug;

/// Router fallback: a bare `404` with no body.
pub async fn not_found(uri: Uri) -> StatusCode {
    debug!(%uri, "no route");
    StatusCode::NOT_FOUND
}
