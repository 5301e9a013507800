//! Bearer JWT validation against the OIDC issuer's cached JWKS (§4.3 step 1).

use crate::error::ApiError;
use crate::state::AppState;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    iss: String,
    #[serde(default)]
    #[allow(dead_code)]
    aud: Vec<String>,
    #[allow(dead_code)]
    exp: usize,
}

pub async fn validate(state: &AppState, token: &str) -> Result<UserContext, ApiError> {
    let header = decode_header(token).map_err(|_| ApiError::Unauthenticated)?;
    let kid = header.kid.ok_or(ApiError::Unauthenticated)?;
    let decoding_key = state.jwks.decoding_key_for(&kid).await.map_err(|_| ApiError::Unauthenticated)?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&state.config.oidc_accepted_audiences);
    validation.set_issuer(&[state.config.oidc_issuer.clone()]);

    let data = decode::<Claims>(token, &decoding_key, &validation).map_err(|_| ApiError::Unauthenticated)?;
    Ok(UserContext { user_id: data.claims.sub })
}
