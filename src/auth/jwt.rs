//! # Token service (JWT)
//!
//! Issues and verifies HS256-signed access and refresh tokens.
//!
//! ## Design principles
//! - No dependency on `std::env`; secret, issuer and lifetimes come from
//!   [`AuthConfig`] at construction and never change afterwards
//! - No global state; the service is shared as `Arc<TokenService>`
//! - Time is read through [`Clock`], so expiry is testable to the second
//!
//! ## Verification rules
//! A token is rejected with [`TokenError::InvalidToken`] when it is
//! malformed, signed with another key or algorithm, issued by another
//! issuer, or when `now >= exp`. Callers never learn which rule failed.

use std::{sync::Arc, time::Duration};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::auth::AuthConfig;
use crate::time::clock::Clock;

/// Which flow a token was minted for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims stored inside the token payload.
///
/// ## Fields
/// - `user_id`: account id, also rendered as the decimal `sub`
/// - `role`: role claim; empty for refresh tokens
/// - `iss`: issuer, must equal the configured issuer on verification
/// - `iat` / `exp`: issue and expiry times (UNIX seconds), `exp > iat`
/// - `token_type`: [`TokenKind`]; absent on tokens minted elsewhere
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: i64,
    #[serde(default)]
    pub role: String,
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenKind>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("cannot sign token")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("token expiry overflows")]
    ExpiryOverflow,
    #[error("invalid token")]
    InvalidToken,
}

/// Issues and verifies signed bearer tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(cfg: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock with no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[cfg.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(&cfg.secret),
            decoding: DecodingKey::from_secret(&cfg.secret),
            validation,
            issuer: cfg.issuer.clone(),
            access_ttl: cfg.access_ttl,
            refresh_ttl: cfg.refresh_ttl,
            clock,
        }
    }

    /// Signs an access token carrying `user_id` and `role`.
    pub fn issue_access_token(&self, user_id: i64, role: &str) -> Result<String, TokenError> {
        self.issue(user_id, role, TokenKind::Access, self.access_ttl)
    }

    /// Signs a refresh token carrying only the identity.
    pub fn issue_refresh_token(&self, user_id: i64) -> Result<String, TokenError> {
        self.issue(user_id, "", TokenKind::Refresh, self.refresh_ttl)
    }

    fn issue(
        &self,
        user_id: i64,
        role: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let iat = self.clock.now().timestamp();
        let exp = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| iat.checked_add(secs))
            .ok_or(TokenError::ExpiryOverflow)?;

        let claims = Claims {
            user_id,
            role: role.to_string(),
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            iat,
            exp,
            token_type: Some(kind),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verifies signature, algorithm, issuer and expiry, returning the claims.
    ///
    /// Accepts access and refresh tokens alike.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                debug!(reason = %e, "token rejected");
                TokenError::InvalidToken
            })?
            .claims;

        if claims.iss != self.issuer {
            debug!("token rejected: issuer mismatch");
            return Err(TokenError::InvalidToken);
        }
        if claims.exp <= claims.iat {
            debug!("token rejected: exp not after iat");
            return Err(TokenError::InvalidToken);
        }
        if self.clock.now().timestamp() >= claims.exp {
            debug!("token rejected: expired");
            return Err(TokenError::InvalidToken);
        }

        Ok(claims)
    }

    /// Like [`verify`](Self::verify), but also requires the token to have been
    /// minted as `kind`.
    pub fn verify_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if claims.token_type != Some(kind) {
            debug!(expected = ?kind, got = ?claims.token_type, "token rejected: wrong kind");
            return Err(TokenError::InvalidToken);
        }
        Ok(claims)
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}
