//! In-memory [`AccountStore`] for tests and local runs without MySQL.
//!
//! Uniqueness of email and username is checked and the account inserted
//! under one lock, so concurrent `create` calls behave like a table with
//! two unique keys.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::account::model::{Account, DEFAULT_ROLE};
use crate::account::store::{AccountStore, StoreError, UniqueField};
use crate::time::{clock::Clock, system_clock::SystemClock};

#[derive(Default)]
struct Table {
    rows: Vec<Account>,
    next_id: i64,
}

pub struct InMemoryAccountStore {
    table: Mutex<Table>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl InMemoryAccountStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: Mutex::new(Table::default()),
            clock,
        }
    }

    /// Overwrites the role of an existing account.
    pub fn set_role(&self, id: i64, role: &str) -> Result<(), StoreError> {
        let mut table = self.lock()?;
        let row = table
            .rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(StoreError::account_not_found)?;
        row.role = role.to_string();
        Ok(())
    }

    /// Removes an account; returns whether one was removed.
    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut table = self.lock()?;
        let before = table.rows.len();
        table.rows.retain(|a| a.id != id);
        Ok(table.rows.len() != before)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, StoreError> {
        self.table
            .lock()
            .map_err(|_| StoreError::Backend(anyhow!("account table lock poisoned")))
    }

    fn find_where<P>(&self, pred: P) -> Result<Account, StoreError>
    where
        P: Fn(&Account) -> bool,
    {
        self.lock()?
            .rows
            .iter()
            .find(|a| pred(a))
            .cloned()
            .ok_or_else(StoreError::account_not_found)
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError> {
        let created_at = self.clock.now();
        let mut table = self.lock()?;

        if table.rows.iter().any(|a| a.email == email) {
            return Err(StoreError::UniqueViolation(UniqueField::Email));
        }
        if table.rows.iter().any(|a| a.username == username) {
            return Err(StoreError::UniqueViolation(UniqueField::Username));
        }

        table.next_id += 1;
        let account = Account {
            id: table.next_id,
            email: email.to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role: DEFAULT_ROLE.to_string(),
            created_at,
        };
        table.rows.push(account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Account, StoreError> {
        self.find_where(|a| a.email == email)
    }

    async fn find_by_username(&self, username: &str) -> Result<Account, StoreError> {
        self.find_where(|a| a.username == username)
    }

    async fn find_by_id(&self, id: i64) -> Result<Account, StoreError> {
        self.find_where(|a| a.id == id)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.rows.iter().any(|a| a.email == email))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.rows.iter().any(|a| a.username == username))
    }
}
