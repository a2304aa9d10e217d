//! # Post service
//!
//! Validation and ownership rules on top of a [`PostStore`]. Only the
//! author or an `admin` may change or delete a post.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::auth::principal::CurrentUser;
use crate::error::store::StoreError;
use crate::post::model::{Page, Post, PostPatch};
use crate::post::store::PostStore;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Error)]
pub enum PostError {
    #[error("title is required")]
    MissingTitle,

    #[error("title cannot be empty")]
    TitleEmpty,

    #[error("nothing to update")]
    EmptyPatch,

    #[error("post not found")]
    NotFound,

    #[error("not allowed to modify this post")]
    Forbidden,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for PostError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => PostError::NotFound,
            StoreError::UniqueViolation(field) => {
                PostError::Internal(anyhow::anyhow!("unexpected unique violation on {field}"))
            }
            StoreError::Backend(e) => PostError::Internal(e),
        }
    }
}

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        author: &CurrentUser,
        title: &str,
        description: &str,
    ) -> Result<Post, PostError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PostError::MissingTitle);
        }
        let post = self
            .store
            .create(author.user_id, title, description)
            .await?;
        info!(post_id = post.id, user_id = author.user_id, "post created");
        Ok(post)
    }

    pub async fn list(&self, user_id: Option<i64>, page: Page) -> Result<Vec<Post>, PostError> {
        Ok(self.store.list(user_id, page).await?)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: i64,
        mut patch: PostPatch,
    ) -> Result<Post, PostError> {
        if patch.is_empty() {
            return Err(PostError::EmptyPatch);
        }
        if let Some(title) = patch.title.as_mut() {
            *title = title.trim().to_string();
            if title.is_empty() {
                return Err(PostError::TitleEmpty);
            }
        }
        if let Some(description) = patch.description.as_mut() {
            *description = description.trim().to_string();
        }
        self.authorize(actor, id).await?;
        Ok(self.store.update(id, &patch).await?)
    }

    pub async fn delete(&self, actor: &CurrentUser, id: i64) -> Result<(), PostError> {
        self.authorize(actor, id).await?;
        self.store.soft_delete(id).await?;
        info!(post_id = id, user_id = actor.user_id, "post deleted");
        Ok(())
    }

    async fn authorize(&self, actor: &CurrentUser, id: i64) -> Result<(), PostError> {
        let post = self.store.find(id).await?;
        if post.user_id != actor.user_id && actor.role != ADMIN_ROLE {
            debug!(post_id = id, user_id = actor.user_id, "post change rejected: not owner");
            return Err(PostError::Forbidden);
        }
        Ok(())
    }
}
