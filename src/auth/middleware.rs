//! # Bearer authentication middleware
//!
//! The only authorization gate of the API. Routes are protected by wrapping
//! them explicitly:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/auth/me", get(me))
//!     .route_layer(axum::middleware::from_fn_with_state(tokens.clone(), require_bearer));
//! ```
//!
//! For each request the middleware:
//! 1. lets `OPTIONS` (CORS pre-flight) through untouched;
//! 2. requires `Authorization: Bearer <token>` (case-sensitive prefix,
//!    single space), else `401 missing bearer`;
//! 3. verifies the trimmed token as an access token, else `401 invalid token`;
//! 4. attaches a [`RequestIdentity`] with the user id, plus the role when
//!    the claim is non-empty, and runs the inner service.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::auth::identity::{attach, identity_of};
use crate::auth::jwt::{TokenKind, TokenService};

pub const MISSING_BEARER: &str = "missing bearer";
pub const INVALID_TOKEN: &str = "invalid token";

const BEARER_PREFIX: &str = "Bearer ";

pub async fn require_bearer(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Response {
    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let Some(token) = bearer_token(req.headers()) else {
        debug!(uri = %req.uri(), "rejected: missing bearer");
        return (StatusCode::UNAUTHORIZED, MISSING_BEARER).into_response();
    };

    let claims = match tokens.verify_kind(&token, TokenKind::Access) {
        Ok(claims) => claims,
        Err(_) => {
            debug!(uri = %req.uri(), "rejected: invalid token");
            return (StatusCode::UNAUTHORIZED, INVALID_TOKEN).into_response();
        }
    };

    let mut identity = identity_of(req.extensions()).with_user_id(claims.user_id);
    if !claims.role.is_empty() {
        identity = identity.with_role(claims.role);
    }
    attach(req.extensions_mut(), identity);

    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(|t| t.trim().to_string())
}
