//! # Token and Credential Configuration
//!
//! Settings consumed by the token service and the credential hasher.
//! They are read once at start-up and never change for the lifetime of
//! the process.
//!
//! The configuration reads from environment variables:
//! - `JWT_SECRET` — HMAC-SHA256 signing secret (required in production;
//!   elsewhere a random per-process secret is generated)
//! - `JWT_ISSUER` — issuer stamped into and required on every token (default: `postboard-api`)
//! - `JWT_ACCESS_TTL` — access token lifetime (default: `15m`)
//! - `JWT_REFRESH_TTL` — refresh token lifetime (default: `720h`)
//! - `PASSWORD_HASH_COST` — bcrypt work factor (default: `10`)

use std::{env as std_env, fmt, time::Duration};

use anyhow::{bail, Result};
use rand::RngCore;
use tracing::warn;

use crate::config::env::{read_duration_from, read_u32_from};

pub const DEFAULT_ISSUER: &str = "postboard-api";
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);
pub const DEFAULT_HASH_COST: u32 = 10;

/// Upper bound for either token lifetime.
const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Configuration for token signing and password hashing.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub secret: Vec<u8>,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub hash_cost: u32,
    /// `true` when no `JWT_SECRET` was supplied and a random one was generated.
    pub secret_generated: bool,
}

impl AuthConfig {
    /// Loads configuration from environment variables.
    ///
    /// `app_env` decides whether a missing secret is fatal (`"production"`).
    pub fn from_env(app_env: &str) -> Result<Self> {
        Self::from_env_with(app_env, |k| std_env::var(k).ok())
    }

    /// Loads configuration using a custom key provider (for testing/mocking).
    pub fn from_env_with<F>(app_env: &str, get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (secret, secret_generated) = match get("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(s) => (s.into_bytes(), false),
            None if app_env == "production" => bail!("JWT_SECRET is required in production"),
            None => {
                warn!("JWT_SECRET is not set; using a random secret, tokens will not survive a restart");
                (random_secret().to_vec(), true)
            }
        };

        let issuer = get("JWT_ISSUER")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_ISSUER.into());

        let cfg = Self {
            secret,
            issuer,
            access_ttl: read_duration_from(&get, "JWT_ACCESS_TTL", DEFAULT_ACCESS_TTL),
            refresh_ttl: read_duration_from(&get, "JWT_REFRESH_TTL", DEFAULT_REFRESH_TTL),
            hash_cost: read_u32_from(&get, "PASSWORD_HASH_COST", DEFAULT_HASH_COST)
                .clamp(bcrypt_cost_bounds::MIN, bcrypt_cost_bounds::MAX),
            secret_generated,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Builds a configuration from explicit values with the default hash cost.
    ///
    /// Intended for tests and embedding; it is not validated.
    pub fn for_secret(
        secret: &str,
        issuer: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            issuer: issuer.to_string(),
            access_ttl,
            refresh_ttl,
            hash_cost: DEFAULT_HASH_COST,
            secret_generated: false,
        }
    }

    /// Checks the invariants the token service relies on.
    pub fn validate(&self) -> Result<()> {
        if self.issuer.is_empty() {
            bail!("JWT_ISSUER must not be empty");
        }
        if self.access_ttl.as_secs() == 0 || self.refresh_ttl.as_secs() == 0 {
            bail!("token lifetimes must be at least one second");
        }
        if self.access_ttl > MAX_TTL || self.refresh_ttl > MAX_TTL {
            bail!("token lifetimes must not exceed ten years");
        }
        if self.refresh_ttl < self.access_ttl {
            bail!("JWT_REFRESH_TTL must not be shorter than JWT_ACCESS_TTL");
        }
        Ok(())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("hash_cost", &self.hash_cost)
            .field("secret_generated", &self.secret_generated)
            .finish()
    }
}

mod bcrypt_cost_bounds {
    pub const MIN: u32 = 4;
    pub const MAX: u32 = 31;
}

/// Generates a new random 32-byte signing secret.
pub fn random_secret() -> [u8; 32] {
    let mut key = [0u8; 32];
    rand::rng().fill_bytes(&mut key);
    key
}
