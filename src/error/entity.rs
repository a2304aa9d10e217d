use thiserror::Error;

/// A requested entity was not found in a store.
///
/// Stores return it for lookups by key (`id`, `email`, `username`) so that
/// callers can tell "absent" apart from a backend failure without
/// inspecting driver errors.
///
/// # Example
/// ```
/// use postboard::error::entity::NotFoundError;
///
/// let err = NotFoundError::new("Account");
/// assert_eq!(err.to_string(), "Account not found");
/// ```
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{entity} not found")]
pub struct NotFoundError {
    /// Name of the entity that was not found (e.g. `"Account"`)
    pub entity: &'static str,
}

impl NotFoundError {
    pub fn new(entity: &'static str) -> Self {
        Self { entity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format_is_correct() {
        let err = NotFoundError::new("Account");
        assert_eq!(err.entity, "Account");
        assert_eq!(err.to_string(), "Account not found");
    }

    #[test]
    fn converts_into_anyhow_and_back() {
        let err: anyhow::Error = NotFoundError::new("Account").into();
        assert_eq!(
            err.downcast_ref::<NotFoundError>(),
            Some(&NotFoundError::new("Account"))
        );
    }
}
