use std::fmt;

use thiserror::Error;

use crate::error::entity::NotFoundError;

/// The unique column a write collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Username,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Email => f.write_str("email"),
            UniqueField::Username => f.write_str("username"),
        }
    }
}

/// Failure of a store operation (accounts, posts).
///
/// Lookups that find nothing return [`StoreError::NotFound`]; a
/// unique-constraint hit returns [`StoreError::UniqueViolation`] naming the
/// field, whether it was caught by the store itself or by the database.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("{0} already exists")]
    UniqueViolation(UniqueField),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    pub(crate) fn account_not_found() -> Self {
        StoreError::NotFound(NotFoundError::new("Account"))
    }

    pub(crate) fn post_not_found() -> Self {
        StoreError::NotFound(NotFoundError::new("Post"))
    }
}
