//! OIDC bearer validation. Signature is checked against the issuer's
//! cached JWKS (§4.8), expiry/issuer/audience are checked by
//! `jsonwebtoken::Validation`.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    #[serde(default)]
    pub aud: Vec<String>,
    pub exp: i64,
}

/// An authenticated end user, as opposed to a service-to-service caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;
        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthenticated)?;

        let header = decode_header(token).map_err(|_| ApiError::Unauthenticated)?;
        let kid = header.kid.ok_or(ApiError::Unauthenticated)?;
        let key = state.jwks.decoding_key_for(&kid).await.map_err(|_| ApiError::Unauthenticated)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&state.config.oidc_accepted_audiences);
        validation.set_issuer(&[state.config.oidc_issuer.clone()]);

        let data = decode::<Claims>(token, &key, &validation).map_err(|_| ApiError::Unauthenticated)?;
        Ok(AuthUser {
            user_id: data.claims.sub,
        })
    }
}
