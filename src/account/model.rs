use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Role given to new accounts, and put into access tokens for accounts
/// whose stored role is empty.
pub const DEFAULT_ROLE: &str = "user";

/// A stored account, including its password hash.
///
/// Never serialize this type; hand out [`PublicAccount`] instead.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    /// May be empty for accounts created before roles existed.
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// The redacted projection returned to clients.
    pub fn public(&self) -> PublicAccount {
        PublicAccount {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Account fields that are safe to expose over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicAccount {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}
