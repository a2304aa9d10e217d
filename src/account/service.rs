//! # Account service
//!
//! Registration and login on top of an [`AccountStore`] and the
//! [`PasswordHasher`]. Hashing and verification are CPU-heavy and run on
//! the blocking pool.
//!
//! Login never reveals whether an account exists: an unknown identifier
//! and a wrong password both yield [`AccountError::BadCredentials`].

use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info};

use crate::account::model::{Account, PublicAccount};
use crate::account::store::{AccountStore, StoreError, UniqueField};
use crate::auth::password::PasswordHasher;

pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid email")]
    InvalidEmail,

    #[error("password must be at least 8 characters")]
    InvalidPassword,

    #[error("username is required")]
    InvalidUsername,

    #[error("email is already in use")]
    EmailTaken,

    #[error("username is already in use")]
    UsernameTaken,

    #[error("invalid credentials")]
    BadCredentials,

    #[error("account not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AccountError::NotFound,
            StoreError::UniqueViolation(UniqueField::Email) => AccountError::EmailTaken,
            StoreError::UniqueViolation(UniqueField::Username) => AccountError::UsernameTaken,
            StoreError::Backend(e) => AccountError::Internal(e),
        }
    }
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Validates input, checks uniqueness (username first), hashes and
    /// persists. A unique-key race lost at insert time maps to the same
    /// `*Taken` errors as the pre-checks.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<PublicAccount, AccountError> {
        let email = normalize_email(email);
        if !is_plausible_email(&email) {
            return Err(AccountError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AccountError::InvalidPassword);
        }
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::InvalidUsername);
        }

        if self.store.exists_by_username(username).await? {
            return Err(AccountError::UsernameTaken);
        }
        if self.store.exists_by_email(&email).await? {
            return Err(AccountError::EmailTaken);
        }

        let hasher = self.hasher;
        let password = password.to_string();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .context("hash task failed")?
            .context("hash password")?;

        let account = self.store.create(&email, username, &hash).await?;
        info!(account_id = account.id, "account registered");
        Ok(account.public())
    }

    /// `identifier` is an email when it contains `@`, otherwise a username.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<PublicAccount, AccountError> {
        let identifier = identifier.trim();
        let lookup = if identifier.contains('@') {
            self.store.find_by_email(&normalize_email(identifier)).await
        } else {
            self.store.find_by_username(identifier).await
        };

        let account = match lookup {
            Ok(account) => account,
            Err(StoreError::NotFound(_)) => {
                debug!("login rejected: unknown identifier");
                return Err(AccountError::BadCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        if !self.verify_password(&account, password).await? {
            debug!(account_id = account.id, "login rejected: password mismatch");
            return Err(AccountError::BadCredentials);
        }

        info!(account_id = account.id, "login succeeded");
        Ok(account.public())
    }

    /// Looks up an account by id; used by the refresh and `me` flows.
    pub async fn find(&self, id: i64) -> Result<PublicAccount, AccountError> {
        Ok(self.store.find_by_id(id).await?.public())
    }

    async fn verify_password(&self, account: &Account, password: &str) -> anyhow::Result<bool> {
        let hasher = self.hasher;
        let hash = account.password_hash.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .context("verify task failed")
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Exactly one `@` and at least one `.`; nothing stricter.
fn is_plausible_email(email: &str) -> bool {
    email.matches('@').count() == 1 && email.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::account::memory::InMemoryAccountStore;

    fn service_with(store: Arc<dyn AccountStore>) -> AccountService {
        AccountService::new(store, PasswordHasher::new(4))
    }

    fn service() -> AccountService {
        service_with(Arc::new(InMemoryAccountStore::default()))
    }

    #[tokio::test]
    async fn register_returns_public_projection() {
        let svc = service();

        let acc = svc.register("a@b.com", "alice", "password1").await.unwrap();

        assert_eq!(acc.email, "a@b.com");
        assert_eq!(acc.username, "alice");
        let json = serde_json::to_string(&acc).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("$2"));
    }

    #[tokio::test]
    async fn register_normalizes_email() {
        let svc = service();

        let acc = svc.register("  A@B.Com ", " alice ", "password1").await.unwrap();

        assert_eq!(acc.email, "a@b.com");
        assert_eq!(acc.username, "alice");
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_and_username() {
        let svc = service();
        svc.register("a@b.com", "alice", "password1").await.unwrap();

        let err = svc.register("A@b.com", "other", "password1").await.unwrap_err();
        assert!(matches!(err, AccountError::EmailTaken));

        let err = svc.register("c@d.com", "alice", "password1").await.unwrap_err();
        assert!(matches!(err, AccountError::UsernameTaken));
    }

    #[tokio::test]
    async fn username_is_checked_before_email() {
        let svc = service();
        svc.register("a@b.com", "alice", "password1").await.unwrap();

        let err = svc.register("a@b.com", "alice", "password1").await.unwrap_err();

        assert!(matches!(err, AccountError::UsernameTaken));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let svc = service();

        for email in ["ab.com", "a@@b.com", "a@b", "a@b@c.com"] {
            let err = svc.register(email, "alice", "password1").await.unwrap_err();
            assert!(matches!(err, AccountError::InvalidEmail), "{email}");
        }

        let err = svc.register("a@b.com", "alice", "short7!").await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidPassword));

        let err = svc.register("a@b.com", "   ", "password1").await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidUsername));
    }

    #[tokio::test]
    async fn password_length_counts_characters_not_bytes() {
        let svc = service();

        // 4 characters, 8 bytes
        let err = svc.register("a@b.com", "alice", "éééé").await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidPassword));

        svc.register("a@b.com", "alice", "pässwörd").await.unwrap();
    }

    #[tokio::test]
    async fn login_by_email_or_username() {
        let svc = service();
        let reg = svc.register("a@b.com", "alice", "password1").await.unwrap();

        let by_email = svc.login("A@B.com", "password1").await.unwrap();
        let by_name = svc.login("alice", "password1").await.unwrap();

        assert_eq!(by_email.id, reg.id);
        assert_eq!(by_name.id, reg.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_account_are_indistinguishable() {
        let svc = service();
        svc.register("a@b.com", "alice", "password1").await.unwrap();

        let wrong = svc.login("a@b.com", "password2").await.unwrap_err();
        let unknown = svc.login("nobody@b.com", "password1").await.unwrap_err();

        assert!(matches!(wrong, AccountError::BadCredentials));
        assert!(matches!(unknown, AccountError::BadCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn find_by_id() {
        let svc = service();
        let reg = svc.register("a@b.com", "alice", "password1").await.unwrap();

        assert_eq!(svc.find(reg.id).await.unwrap(), reg);
        assert!(matches!(svc.find(999).await.unwrap_err(), AccountError::NotFound));
    }

    /// Passes the pre-checks, then loses the insert race on one field.
    struct RacingStore(UniqueField);

    #[async_trait]
    impl AccountStore for RacingStore {
        async fn create(&self, _: &str, _: &str, _: &str) -> Result<Account, StoreError> {
            Err(StoreError::UniqueViolation(self.0))
        }
        async fn find_by_email(&self, _: &str) -> Result<Account, StoreError> {
            Err(StoreError::account_not_found())
        }
        async fn find_by_username(&self, _: &str) -> Result<Account, StoreError> {
            Err(StoreError::account_not_found())
        }
        async fn find_by_id(&self, _: i64) -> Result<Account, StoreError> {
            Err(StoreError::account_not_found())
        }
        async fn exists_by_email(&self, _: &str) -> Result<bool, StoreError> {
            Ok(false)
        }
        async fn exists_by_username(&self, _: &str) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn unique_violation_at_insert_maps_to_taken() {
        let svc = service_with(Arc::new(RacingStore(UniqueField::Email)));
        let err = svc.register("a@b.com", "alice", "password1").await.unwrap_err();
        assert!(matches!(err, AccountError::EmailTaken));

        let svc = service_with(Arc::new(RacingStore(UniqueField::Username)));
        let err = svc.register("a@b.com", "alice", "password1").await.unwrap_err();
        assert!(matches!(err, AccountError::UsernameTaken));
    }

    struct BrokenStore;

    #[async_trait]
    impl AccountStore for BrokenStore {
        async fn create(&self, _: &str, _: &str, _: &str) -> Result<Account, StoreError> {
            Err(anyhow::anyhow!("down").into())
        }
        async fn find_by_email(&self, _: &str) -> Result<Account, StoreError> {
            Err(anyhow::anyhow!("down").into())
        }
        async fn find_by_username(&self, _: &str) -> Result<Account, StoreError> {
            Err(anyhow::anyhow!("down").into())
        }
        async fn find_by_id(&self, _: i64) -> Result<Account, StoreError> {
            Err(anyhow::anyhow!("down").into())
        }
        async fn exists_by_email(&self, _: &str) -> Result<bool, StoreError> {
            Err(anyhow::anyhow!("down").into())
        }
        async fn exists_by_username(&self, _: &str) -> Result<bool, StoreError> {
            Err(anyhow::anyhow!("down").into())
        }
    }

    #[tokio::test]
    async fn backend_failures_are_internal_not_bad_credentials() {
        let svc = service_with(Arc::new(BrokenStore));

        assert!(matches!(
            svc.login("a@b.com", "password1").await.unwrap_err(),
            AccountError::Internal(_)
        ));
        assert!(matches!(
            svc.register("a@b.com", "alice", "password1").await.unwrap_err(),
            AccountError::Internal(_)
        ));
    }
}
