//! # Auth handlers
//!
//! `register`, `login`, `token/refresh` and `me`. Bodies that fail to parse
//! as JSON are answered with `400 BAD_JSON`; blank required fields with
//! `400 MISSING_FIELDS`. Token verification failures on refresh collapse to
//! a single `401 INVALID_REFRESH`. Bodies over the configured limit get
//! `413 PAYLOAD_TOO_LARGE`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::account::model::{PublicAccount, DEFAULT_ROLE};
use crate::account::service::AccountError;
use crate::auth::jwt::{TokenError, TokenKind};
use crate::auth::principal::CurrentUser;
use crate::error::api::ApiError;
use crate::web::response::{ok, Envelope};
use crate::web::router::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: PublicAccount,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

pub(crate) fn parse<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => Err(
            ApiError::new(rejection.status(), "PAYLOAD_TOO_LARGE", "request body too large"),
        ),
        Err(rejection) => {
            debug!(error = %rejection, "rejected request body");
            Err(ApiError::bad_request("BAD_JSON", "invalid json"))
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn token_issue_failed(err: TokenError) -> ApiError {
    error!(error = %err, "token issue failed");
    ApiError::internal("TOKEN_ISSUE_FAIL")
}

fn issue_pair(state: &AppState, user_id: i64, role: &str) -> Result<TokenPair, ApiError> {
    let role = if role.is_empty() { DEFAULT_ROLE } else { role };
    let access_token = state
        .tokens
        .issue_access_token(user_id, role)
        .map_err(token_issue_failed)?;
    let refresh_token = state
        .tokens
        .issue_refresh_token(user_id)
        .map_err(token_issue_failed)?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        token_type: "Bearer",
        expires_in: state.tokens.access_ttl().as_secs(),
    })
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<Envelope<PublicAccount>>, ApiError> {
    let req = parse(payload)?;
    if is_blank(&req.email) || is_blank(&req.username) || req.password.is_empty() {
        return Err(ApiError::bad_request(
            "MISSING_FIELDS",
            "email, username and password are required",
        ));
    }

    let account = state
        .accounts
        .register(&req.email, &req.username, &req.password)
        .await?;
    Ok(ok(account))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Envelope<LoginResponse>>, ApiError> {
    let req = parse(payload)?;
    if is_blank(&req.identifier) || req.password.is_empty() {
        return Err(ApiError::bad_request(
            "MISSING_FIELDS",
            "identifier and password are required",
        ));
    }

    let user = state.accounts.login(&req.identifier, &req.password).await?;
    let tokens = issue_pair(&state, user.id, &user.role)?;
    Ok(ok(LoginResponse { user, tokens }))
}

pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<Envelope<TokenPair>>, ApiError> {
    let req = parse(payload)?;
    if is_blank(&req.refresh_token) {
        return Err(ApiError::bad_request(
            "MISSING_FIELDS",
            "refresh token is required",
        ));
    }

    let invalid = || ApiError::unauthorized("INVALID_REFRESH", "refresh token invalid or expired");

    let claims = state
        .tokens
        .verify_kind(req.refresh_token.trim(), TokenKind::Refresh)
        .map_err(|e| {
            debug!(error = %e, "refresh rejected");
            invalid()
        })?;

    let account = match state.accounts.find(claims.user_id).await {
        Ok(account) => account,
        Err(AccountError::NotFound) => {
            debug!(user_id = claims.user_id, "refresh for missing account");
            return Err(invalid());
        }
        Err(e) => return Err(e.into()),
    };

    Ok(ok(issue_pair(&state, account.id, &account.role)?))
}

pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Envelope<PublicAccount>>, ApiError> {
    let account = state.accounts.find(user.user_id).await?;
    Ok(ok(account))
}
