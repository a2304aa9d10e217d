//! In-memory [`PostStore`]; soft-deleted rows stay in the table with a
//! `deleted_at` stamp, like the SQL schema.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::store::StoreError;
use crate::post::model::{Page, Post, PostPatch};
use crate::post::store::PostStore;
use crate::time::{clock::Clock, system_clock::SystemClock};

struct StoredPost {
    post: Post,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Table {
    rows: Vec<StoredPost>,
    next_id: i64,
}

impl Table {
    fn live_mut(&mut self, id: i64) -> Result<&mut StoredPost, StoreError> {
        self.rows
            .iter_mut()
            .find(|r| r.post.id == id && r.deleted_at.is_none())
            .ok_or_else(StoreError::post_not_found)
    }
}

pub struct InMemoryPostStore {
    table: Mutex<Table>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl InMemoryPostStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: Mutex::new(Table::default()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, StoreError> {
        self.table
            .lock()
            .map_err(|_| StoreError::Backend(anyhow!("post table lock poisoned")))
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn create(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
    ) -> Result<Post, StoreError> {
        let now = self.clock.now();
        let mut table = self.lock()?;
        table.next_id += 1;
        let post = Post {
            id: table.next_id,
            title: title.to_string(),
            description: description.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(StoredPost {
            post: post.clone(),
            deleted_at: None,
        });
        Ok(post)
    }

    async fn find(&self, id: i64) -> Result<Post, StoreError> {
        Ok(self.lock()?.live_mut(id)?.post.clone())
    }

    async fn update(&self, id: i64, patch: &PostPatch) -> Result<Post, StoreError> {
        let now = self.clock.now();
        let mut table = self.lock()?;
        let row = table.live_mut(id)?;
        if let Some(title) = &patch.title {
            row.post.title = title.clone();
        }
        if let Some(description) = &patch.description {
            row.post.description = description.clone();
        }
        row.post.updated_at = now;
        Ok(row.post.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), StoreError> {
        let now = self.clock.now();
        self.lock()?.live_mut(id)?.deleted_at = Some(now);
        Ok(())
    }

    async fn list(&self, user_id: Option<i64>, page: Page) -> Result<Vec<Post>, StoreError> {
        let table = self.lock()?;
        Ok(table
            .rows
            .iter()
            .rev()
            .filter(|r| r.deleted_at.is_none())
            .filter(|r| user_id.is_none_or(|u| r.post.user_id == u))
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .map(|r| r.post.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::time::clock::FixedClock;

    fn store() -> InMemoryPostStore {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        InMemoryPostStore::new(Arc::new(FixedClock::new(at)))
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paginated() {
        let s = store();
        for i in 1..=5 {
            s.create(1, &format!("p{i}"), "").await.unwrap();
        }

        let page = s.list(None, Page { limit: 2, offset: 1 }).await.unwrap();

        let titles: Vec<_> = page.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["p4", "p3"]);
    }

    #[tokio::test]
    async fn list_filters_by_author() {
        let s = store();
        s.create(1, "mine", "").await.unwrap();
        s.create(2, "theirs", "").await.unwrap();

        let posts = s.list(Some(2), Page::default()).await.unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "theirs");
    }

    #[tokio::test]
    async fn update_applies_only_set_fields() {
        let s = store();
        let p = s.create(1, "title", "body").await.unwrap();

        let patch = PostPatch {
            description: Some("new body".into()),
            ..PostPatch::default()
        };
        let updated = s.update(p.id, &patch).await.unwrap();

        assert_eq!(updated.title, "title");
        assert_eq!(updated.description, "new body");
    }

    #[tokio::test]
    async fn soft_deleted_posts_are_gone() {
        let s = store();
        let p = s.create(1, "title", "").await.unwrap();

        s.soft_delete(p.id).await.unwrap();

        assert!(matches!(s.find(p.id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(s.soft_delete(p.id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            s.update(p.id, &PostPatch::default()).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(s.list(None, Page::default()).await.unwrap().is_empty());
    }
}
