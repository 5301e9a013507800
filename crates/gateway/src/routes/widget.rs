//! `POST /v1/widget/session:init` (§4.3, §4.8). Issues a short-lived opaque
//! token for embedding, after checking the caller's origin against the
//! configured allowlist.

use crate::auth::AuthContext;
use crate::error::{ApiError, Result};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct WidgetSessionInitRequest {
    pub instance_id: Uuid,
    pub origin: String,
}

#[derive(Debug, Serialize)]
pub struct WidgetBranding {
    pub display_name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
}

#[derive(Debug, Serialize)]
pub struct WidgetSessionInitResponse {
    pub widget_token: String,
    pub expires_in_sec: u64,
    pub config: WidgetBranding,
}

fn generate_widget_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub async fn init_session(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(body): Json<WidgetSessionInitRequest>,
) -> Result<Json<WidgetSessionInitResponse>> {
    if !state.config.widget_allowed_origins.iter().any(|o| o == &body.origin) {
        return Err(ApiError::ForbiddenOrigin);
    }

    // Branding is read off the instance's offering in the original; Control
    // Plane does not yet expose a dedicated lookup for it, so a generic
    // default is returned here (see DESIGN.md open question).

    Ok(Json(WidgetSessionInitResponse {
        widget_token: generate_widget_token(),
        expires_in_sec: state.config.widget_token_ttl_secs,
        config: WidgetBranding {
            display_name: "Assistant".to_string(),
            logo_url: None,
            primary_color: "#6366f1".to_string(),
        },
    }))
}
