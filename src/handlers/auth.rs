//! Acting-user extraction.
//!
//! Sign-in happens in front of this service. The identity proxy forwards the
//! authenticated user's id in the `x-user-id` header; the extractor resolves
//! it to a known [`User`] or rejects the request with 401.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::models::User;
use crate::state::AppState;
use crate::utils::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::AuthError("Sign in required".to_string()))?;

        let id = Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::AuthError("Malformed user identity".to_string()))?;

        let user = state
            .store
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::AuthError("Unknown user".to_string()))?;

        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryEventStore;
    use axum::http::{Request, StatusCode};

    fn state_with(user: &User) -> AppState {
        let store = InMemoryEventStore::new();
        store.add_user(user.clone());
        AppState::new(store)
    }

    fn alice() -> User {
        User {
            id: Uuid::new_v4(),
            user_name: "alice".to_string(),
            email: "alice@homies.test".to_string(),
        }
    }

    async fn extract(state: &AppState, header: Option<&str>) -> Result<CurrentUser, AppError> {
        let mut builder = Request::builder();
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        CurrentUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn test_known_user_is_resolved() {
        let user = alice();
        let state = state_with(&user);
        let current = extract(&state, Some(&user.id.to_string())).await.unwrap();
        assert_eq!(current.id(), user.id);
        assert_eq!(current.0.user_name, "alice");
    }

    #[tokio::test]
    async fn test_missing_malformed_or_unknown_identity_is_unauthorized() {
        let state = state_with(&alice());
        let unknown = Uuid::new_v4().to_string();

        for header in [None, Some("not-a-uuid"), Some(unknown.as_str())] {
            let err = extract(&state, header).await.unwrap_err();
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }
}
