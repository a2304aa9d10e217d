//! # Router
//!
//! Everything lives under `/api/v1`. `/auth/me` and the post writes
//! (`POST /posts`, `PATCH` and `DELETE /posts/{id}`) are wrapped by
//! [`require_bearer`] at the method level; reads stay public. Unknown paths
//! fall through to a bare `404`.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::account::service::AccountService;
use crate::auth::jwt::TokenService;
use crate::auth::middleware::require_bearer;
use crate::config::web::{CorsConfig, HttpConfig};
use crate::post::service::PostService;
use crate::web::{
    auth_handler, cors::build_cors, db_info, fallback::not_found, health, post_handler,
};

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub accounts: AccountService,
    pub posts: PostService,
    pub readiness: Arc<dyn health::ReadinessProbe>,
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<AppState> for Arc<dyn health::ReadinessProbe> {
    fn from_ref(state: &AppState) -> Self {
        state.readiness.clone()
    }
}

pub fn build_router(state: AppState, http: &HttpConfig, cors: &CorsConfig) -> Router {
    let bearer = from_fn_with_state(state.tokens.clone(), require_bearer);

    let api = Router::new()
        .route("/auth/register", post(auth_handler::register))
        .route("/auth/login", post(auth_handler::login))
        .route("/auth/token/refresh", post(auth_handler::refresh))
        .route(
            "/auth/me",
            get(auth_handler::me).route_layer(bearer.clone()),
        )
        .route(
            "/posts",
            get(post_handler::list)
                .merge(post(post_handler::create).route_layer(bearer.clone())),
        )
        .route(
            "/posts/{id}",
            patch(post_handler::update)
                .delete(post_handler::delete)
                .route_layer(bearer),
        )
        .route("/users/{id}/posts", get(post_handler::list_by_user))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/db/check", get(db_info::check))
        .route("/db/version", get(db_info::version));

    Router::new()
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(http.max_body_bytes))
        .layer(build_cors(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
