//! # Request-scoped identity
//!
//! The authenticated identity travels with a single request inside the
//! request's extensions. The extension key is the private [`IdentitySlot`]
//! type, so no other layer can overwrite or collide with it; everything
//! goes through [`attach`] and [`identity_of`].
//!
//! [`RequestIdentity`] is immutable: `with_*` return a derived value and
//! leave the original untouched.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts, http::Extensions};

/// Identity attached to one in-flight request.
///
/// `user_id() == 0` means "no authenticated identity" and `role() == ""`
/// means "no role claim".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestIdentity {
    user_id: Option<i64>,
    role: Option<String>,
}

impl RequestIdentity {
    /// An identity with nothing attached.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_user_id(&self, user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            ..self.clone()
        }
    }

    pub fn with_role(&self, role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            ..self.clone()
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id.unwrap_or(0)
    }

    pub fn role(&self) -> &str {
        self.role.as_deref().unwrap_or("")
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id() != 0
    }
}

#[derive(Clone)]
struct IdentitySlot(RequestIdentity);

/// Attaches `identity` to a request, replacing any identity attached earlier.
///
/// Other extensions are left as they are.
pub fn attach(extensions: &mut Extensions, identity: RequestIdentity) {
    extensions.insert(IdentitySlot(identity));
}

/// Reads the identity attached to a request, or an anonymous one.
pub fn identity_of(extensions: &Extensions) -> RequestIdentity {
    extensions
        .get::<IdentitySlot>()
        .map(|slot| slot.0.clone())
        .unwrap_or_default()
}

/// Extracts the request identity; never rejects.
///
/// Handlers that require authentication should use
/// [`CurrentUser`](crate::auth::principal::CurrentUser) instead.
impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(identity_of(&parts.extensions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_identity_reads_sentinels() {
        let id = RequestIdentity::anonymous();

        assert_eq!(id.user_id(), 0);
        assert_eq!(id.role(), "");
        assert!(!id.is_authenticated());
    }

    #[test]
    fn with_calls_derive_without_mutating() {
        let base = RequestIdentity::anonymous();
        let with_user = base.with_user_id(42);
        let with_both = with_user.with_role("admin");

        assert_eq!(base.user_id(), 0);
        assert_eq!(with_user.user_id(), 42);
        assert_eq!(with_user.role(), "");
        assert_eq!(with_both.user_id(), 42);
        assert_eq!(with_both.role(), "admin");
    }

    #[test]
    fn role_can_be_set_before_user_id() {
        let id = RequestIdentity::anonymous().with_role("user").with_user_id(3);

        assert_eq!(id.role(), "user");
        assert_eq!(id.user_id(), 3);
    }

    #[test]
    fn attach_and_read_back_through_extensions() {
        let mut ext = Extensions::new();
        assert_eq!(identity_of(&ext), RequestIdentity::anonymous());

        attach(&mut ext, RequestIdentity::anonymous().with_user_id(9));
        assert_eq!(identity_of(&ext).user_id(), 9);
    }

    #[test]
    fn attach_preserves_unrelated_extensions() {
        #[derive(Clone, Debug, PartialEq)]
        struct RequestTag(&'static str);

        let mut ext = Extensions::new();
        ext.insert(RequestTag("trace-1"));
        ext.insert(7i64);

        attach(&mut ext, RequestIdentity::anonymous().with_user_id(5));

        assert_eq!(ext.get::<RequestTag>(), Some(&RequestTag("trace-1")));
        assert_eq!(ext.get::<i64>(), Some(&7));
        assert_eq!(identity_of(&ext).user_id(), 5);
    }

    #[test]
    fn plain_values_in_extensions_are_not_mistaken_for_identity() {
        let mut ext = Extensions::new();
        ext.insert(RequestIdentity::anonymous().with_user_id(99));
        ext.insert(String::from("admin"));

        assert_eq!(identity_of(&ext).user_id(), 0);
        assert_eq!(identity_of(&ext).role(), "");
    }
}
