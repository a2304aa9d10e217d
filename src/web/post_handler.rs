//! # Post handlers
//!
//! Listing is public; `create`, `update` and `delete` sit behind the bearer
//! middleware and take the author from [`CurrentUser`]. Ids in the path
//! must be positive integers (`400 BAD_POST_ID` / `400 BAD_USER_ID`).

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::principal::CurrentUser;
use crate::error::api::ApiError;
use crate::post::model::{Page, PostPatch, PublicPost};
use crate::web::auth_handler::parse;
use crate::web::response::{ok, Envelope};
use crate::web::router::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// `null` and an absent field both mean "leave unchanged".
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Raw query values; malformed numbers fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostList {
    pub items: Vec<PublicPost>,
    pub page: Page,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

fn positive_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

fn post_id(raw: &str) -> Result<i64, ApiError> {
    positive_id(raw).ok_or_else(|| ApiError::bad_request("BAD_POST_ID", "invalid post id"))
}

fn user_id(raw: &str) -> Result<i64, ApiError> {
    positive_id(raw).ok_or_else(|| ApiError::bad_request("BAD_USER_ID", "invalid user id"))
}

async fn list_page(
    state: &AppState,
    author: Option<i64>,
    query: &ListQuery,
) -> Result<Json<Envelope<PostList>>, ApiError> {
    let page = Page::parse(query.limit.as_deref(), query.offset.as_deref());
    let posts = state.posts.list(author, page).await?;
    Ok(ok(PostList {
        items: posts.iter().map(|p| p.public()).collect(),
        page,
    }))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<PostList>>, ApiError> {
    let author = query.user_id.as_deref().map(user_id).transpose()?;
    list_page(&state, author, &query).await
}

pub async fn list_by_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<PostList>>, ApiError> {
    let author = user_id(&id)?;
    list_page(&state, Some(author), &query).await
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<Json<Envelope<PublicPost>>, ApiError> {
    let req = parse(payload)?;
    let post = state
        .posts
        .create(&user, &req.title, &req.description)
        .await?;
    Ok(ok(post.public()))
}

pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<Json<Envelope<PublicPost>>, ApiError> {
    let id = post_id(&id)?;
    let req = parse(payload)?;
    let patch = PostPatch {
        title: req.title,
        description: req.description,
    };
    let post = state.posts.update(&user, id, patch).await?;
    Ok(ok(post.public()))
}

pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Deleted>>, ApiError> {
    let id = post_id(&id)?;
    state.posts.delete(&user, id).await?;
    Ok(ok(Deleted { deleted: true }))
}
