//! # MySQL account store
//!
//! [`AccountStore`] over the blocking [`Db`] port. Every call runs on the
//! blocking pool via `spawn_blocking`.
//!
//! Expected schema (see `migrations/0001_create_users.sql`):
//! unique keys `users_email` and `users_username` on `users`.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use crate::account::model::Account;
use crate::account::store::{AccountStore, StoreError, UniqueField};
use crate::db::blocking::run_blocking;
use crate::db::mysql_adapter::duplicate_entry_key;
use crate::db::port::{Db, Param, Row};
use crate::params;

const SELECT_COLUMNS: &str = "SELECT id, email, username, password_hash, role, created_at FROM users";

#[derive(Clone)]
pub struct MySqlAccountStore {
    db: Arc<dyn Db>,
}

impl MySqlAccountStore {
    pub fn new(db: Arc<dyn Db>) -> Self {
        Self { db }
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Db) -> Result<T, StoreError> + Send + 'static,
    {
        run_blocking(&self.db, f).await
    }
}

fn account_from_row(row: &Row) -> anyhow::Result<Account> {
    Ok(Account {
        id: row.get_i64("id")?,
        email: row.get_string("email")?,
        username: row.get_string("username")?,
        password_hash: row.get_string("password_hash")?,
        role: row.get_string_or_empty("role")?,
        created_at: row.get_datetime("created_at")?.and_utc(),
    })
}

fn find_one(db: &dyn Db, column: &str, value: Param<'_>) -> Result<Account, StoreError> {
    let sql = format!("{SELECT_COLUMNS} WHERE {column} = ? LIMIT 1");
    match db.fetch_one(&sql, &[value])? {
        Some(row) => Ok(account_from_row(&row)?),
        None => Err(StoreError::account_not_found()),
    }
}

fn exists(db: &dyn Db, column: &str, value: &str) -> Result<bool, StoreError> {
    let sql = format!("SELECT 1 AS found FROM users WHERE {column} = ? LIMIT 1");
    Ok(db.fetch_one(&sql, &params![value])?.is_some())
}

/// Maps a duplicate-key failure to the field whose unique key was hit.
fn classify_insert_error(err: anyhow::Error) -> StoreError {
    let field = match duplicate_entry_key(&err) {
        Some(key) if key.contains("users_email") => Some(UniqueField::Email),
        Some(key) if key.contains("users_username") => Some(UniqueField::Username),
        _ => None,
    };
    match field {
        Some(field) => StoreError::UniqueViolation(field),
        None => StoreError::Backend(err),
    }
}

#[async_trait]
impl AccountStore for MySqlAccountStore {
    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError> {
        let (email, username, hash) = (
            email.to_string(),
            username.to_string(),
            password_hash.to_string(),
        );
        self.blocking(move |db| {
            let id = db
                .exec_returning_last_insert_id(
                    "INSERT INTO users (email, username, password_hash) VALUES (?, ?, ?)",
                    &params![email.as_str(), username.as_str(), hash.as_str()],
                )
                .map_err(classify_insert_error)?;
            let id = i64::try_from(id).context("insert id out of range")?;
            find_one(db, "id", id.into())
        })
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Account, StoreError> {
        let email = email.to_string();
        self.blocking(move |db| find_one(db, "email", email.as_str().into()))
            .await
    }

    async fn find_by_username(&self, username: &str) -> Result<Account, StoreError> {
        let username = username.to_string();
        self.blocking(move |db| find_one(db, "username", username.as_str().into()))
            .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Account, StoreError> {
        self.blocking(move |db| find_one(db, "id", id.into())).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let email = email.to_string();
        self.blocking(move |db| exists(db, "email", &email)).await
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        let username = username.to_string();
        self.blocking(move |db| exists(db, "username", &username))
            .await
    }
}
