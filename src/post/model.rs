use chrono::{DateTime, Utc};
use serde::Serialize;

/// A live (not soft-deleted) post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Account that created the post.
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn public(&self) -> PublicPost {
        PublicPost {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            user_id: self.user_id,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicPost {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Partial update; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Limit/offset window for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;
    pub const MAX_OFFSET: u32 = 1_000_000;

    /// Parses raw query values. Missing, malformed, negative or zero limits
    /// fall back to the default; values above the maximum are clamped.
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = parse_bounded(limit, Self::DEFAULT_LIMIT, Self::MAX_LIMIT);
        let offset = parse_bounded(offset, 0, Self::MAX_OFFSET);
        Self {
            limit: if limit == 0 { Self::DEFAULT_LIMIT } else { limit },
            offset,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

fn parse_bounded(raw: Option<&str>, default: u32, max: u32) -> u32 {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => default,
        Some(s) => match s.parse::<i64>() {
            Ok(n) if n < 0 => default,
            Ok(n) => u32::try_from(n).unwrap_or(max).min(max),
            Err(_) => default,
        },
    }
}
