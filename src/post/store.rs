//! # Post store port
//!
//! Soft-deleted posts are invisible through every operation: `find`,
//! `update` and `soft_delete` answer [`StoreError::NotFound`] for them and
//! `list` skips them.

use async_trait::async_trait;

use crate::error::store::StoreError;
use crate::post::model::{Page, Post, PostPatch};

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, user_id: i64, title: &str, description: &str)
        -> Result<Post, StoreError>;

    async fn find(&self, id: i64) -> Result<Post, StoreError>;

    /// Applies the set fields of `patch` and bumps `updated_at`.
    async fn update(&self, id: i64, patch: &PostPatch) -> Result<Post, StoreError>;

    async fn soft_delete(&self, id: i64) -> Result<(), StoreError>;

    /// Newest first, optionally restricted to one author.
    async fn list(&self, user_id: Option<i64>, page: Page) -> Result<Vec<Post>, StoreError>;
}
