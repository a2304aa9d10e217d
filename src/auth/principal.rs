use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::identity::identity_of;
use crate::error::api::ApiError;

/// An authenticated principal, extracted from the identity that the bearer
/// middleware attached to the request.
///
/// Using `CurrentUser` as a handler argument makes the handler reject
/// requests without an identity with `401 UNAUTHORIZED`, so handlers never
/// see the `0` / `""` sentinels.
///
/// ```ignore
/// async fn me(user: CurrentUser) -> String {
///     format!("hello {}", user.user_id)
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
    /// Empty when the token carried no role.
    pub role: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = identity_of(&parts.extensions);
        if !identity.is_authenticated() {
            return Err(ApiError::unauthorized("UNAUTHORIZED", "authentication required"));
        }
        Ok(Self {
            user_id: identity.user_id(),
            role: identity.role().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    use crate::auth::identity::{attach, RequestIdentity};

    fn parts_with(identity: Option<RequestIdentity>) -> Parts {
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        if let Some(identity) = identity {
            attach(&mut parts.extensions, identity);
        }
        parts
    }

    #[tokio::test]
    async fn extracts_user_and_role() {
        let mut parts = parts_with(Some(
            RequestIdentity::anonymous().with_user_id(12).with_role("user"),
        ));

        let user = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(user.user_id, 12);
        assert_eq!(user.role, "user");
    }

    #[tokio::test]
    async fn rejects_missing_identity_with_401() {
        let mut parts = parts_with(None);

        let err = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap_err();

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_zero_user_id() {
        let mut parts = parts_with(Some(RequestIdentity::anonymous().with_role("admin")));

        assert!(CurrentUser::from_request_parts(&mut parts, &()).await.is_err());
    }
}
