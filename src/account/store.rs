//! # Account store port
//!
//! The persistence contract the account service depends on. Errors are the
//! shared [`StoreError`]; `create` reports a taken email or username as
//! [`StoreError::UniqueViolation`].

use async_trait::async_trait;

use crate::account::model::Account;

pub use crate::error::store::{StoreError, UniqueField};

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account with the default role.
    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Account, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Account, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Account, StoreError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError>;
}
