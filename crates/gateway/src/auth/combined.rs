//! Combined authentication: `X-API-Key` tried first, then `Authorization:
//! Bearer`. Whichever succeeds is carried as a typed variant rather than a
//! single flattened struct, so handlers can tell an API-key-authenticated
//! call (instance-scoped) from a user-authenticated one (org-scoped).

use super::api_key::{self, ApiKeyContext};
use super::jwt::{self, UserContext};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

#[derive(Debug, Clone)]
pub enum AuthContext {
    ApiKey(ApiKeyContext),
    User(UserContext),
}

impl<S> FromRequestParts<S> for AuthContext
where
    AppState: axum::extract::FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        if let Some(key) = parts.headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
            let ctx = api_key::introspect(&app_state, key).await?;
            return Ok(AuthContext::ApiKey(ctx));
        }

        if let Some(auth_header) = parts.headers.get(axum::http::header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            if let Some(token) = auth_header.strip_prefix("Bearer ") {
                let ctx = jwt::validate(&app_state, token).await?;
                return Ok(AuthContext::User(ctx));
            }
        }

        Err(ApiError::Unauthenticated)
    }
}
