//! # MySQL post store
//!
//! [`PostStore`] over the blocking [`Db`] port. Timestamps are written from
//! the injected clock as UTC; `config::db` pins the session time zone so
//! they read back unchanged.
//!
//! Expected schema: `migrations/0002_create_posts.sql`.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use crate::db::blocking::run_blocking;
use crate::db::port::{Db, Param, Row};
use crate::error::store::StoreError;
use crate::params;
use crate::post::model::{Page, Post, PostPatch};
use crate::post::store::PostStore;
use crate::time::clock::Clock;

const SELECT_COLUMNS: &str =
    "SELECT id, title, description, user_id, created_at, updated_at FROM posts";

#[derive(Clone)]
pub struct MySqlPostStore {
    db: Arc<dyn Db>,
    clock: Arc<dyn Clock>,
}

impl MySqlPostStore {
    pub fn new(db: Arc<dyn Db>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Db) -> Result<T, StoreError> + Send + 'static,
    {
        run_blocking(&self.db, f).await
    }
}

fn post_from_row(row: &Row) -> anyhow::Result<Post> {
    Ok(Post {
        id: row.get_i64("id")?,
        title: row.get_string("title")?,
        description: row.get_string_or_empty("description")?,
        user_id: row.get_i64("user_id")?,
        created_at: row.get_datetime("created_at")?.and_utc(),
        updated_at: row.get_datetime("updated_at")?.and_utc(),
    })
}

fn find_live(db: &dyn Db, id: i64) -> Result<Post, StoreError> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ? AND deleted_at IS NULL LIMIT 1");
    match db.fetch_one(&sql, &params![id])? {
        Some(row) => Ok(post_from_row(&row)?),
        None => Err(StoreError::post_not_found()),
    }
}

#[async_trait]
impl PostStore for MySqlPostStore {
    async fn create(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
    ) -> Result<Post, StoreError> {
        let now = self.clock.now().naive_utc();
        let (title, description) = (title.to_string(), description.to_string());
        self.blocking(move |db| {
            let id = db.exec_returning_last_insert_id(
                "INSERT INTO posts (user_id, title, description, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?)",
                &params![user_id, title.as_str(), description.as_str(), now, now],
            )?;
            let id = i64::try_from(id).context("insert id out of range")?;
            find_live(db, id)
        })
        .await
    }

    async fn find(&self, id: i64) -> Result<Post, StoreError> {
        self.blocking(move |db| find_live(db, id)).await
    }

    async fn update(&self, id: i64, patch: &PostPatch) -> Result<Post, StoreError> {
        let now = self.clock.now().naive_utc();
        let patch = patch.clone();
        self.blocking(move |db| {
            // 0 affected rows can also mean "unchanged"; the re-read decides.
            db.exec(
                "UPDATE posts SET title = COALESCE(?, title), \
                 description = COALESCE(?, description), updated_at = ? \
                 WHERE id = ? AND deleted_at IS NULL",
                &params![patch.title.as_deref(), patch.description.as_deref(), now, id],
            )?;
            find_live(db, id)
        })
        .await
    }

    async fn soft_delete(&self, id: i64) -> Result<(), StoreError> {
        let now = self.clock.now().naive_utc();
        self.blocking(move |db| {
            let affected = db.exec(
                "UPDATE posts SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL",
                &params![now, id],
            )?;
            if affected == 0 {
                return Err(StoreError::post_not_found());
            }
            Ok(())
        })
        .await
    }

    async fn list(&self, user_id: Option<i64>, page: Page) -> Result<Vec<Post>, StoreError> {
        self.blocking(move |db| {
            let limit = u64::from(page.limit);
            let offset = u64::from(page.offset);
            let rows = match user_id {
                Some(uid) => db.fetch_all(
                    &format!(
                        "{SELECT_COLUMNS} WHERE deleted_at IS NULL AND user_id = ? \
                         ORDER BY id DESC LIMIT ? OFFSET ?"
                    ),
                    &params![uid, limit, offset],
                )?,
                None => db.fetch_all(
                    &format!(
                        "{SELECT_COLUMNS} WHERE deleted_at IS NULL \
                         ORDER BY id DESC LIMIT ? OFFSET ?"
                    ),
                    &params![limit, offset],
                )?,
            };
            rows.iter()
                .map(|r| post_from_row(r).map_err(StoreError::from))
                .collect()
        })
        .await
    }
}
