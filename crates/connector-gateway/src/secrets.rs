//! Secret-store client with Kubernetes-auth token caching, grounded on the
//! original connector service's `vault/client.py`. Authenticates once and
//! reuses the token until it nears expiry, rather than re-authenticating
//! per call.

use crate::config::ConnectorGatewayConfig;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const SERVICE_ACCOUNT_TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";
const TOKEN_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Deserialize)]
struct LoginResponse {
    auth: LoginAuth,
}

#[derive(Debug, Deserialize)]
struct LoginAuth {
    client_token: String,
}

#[derive(Debug, Deserialize)]
struct SecretResponse {
    data: SecretData,
}

#[derive(Debug, Deserialize)]
struct SecretData {
    data: Value,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

pub struct SecretStoreClient {
    addr: String,
    role: String,
    login_path: String,
    static_token: Option<String>,
    http: reqwest::Client,
    cached: Arc<Mutex<Option<CachedToken>>>,
}

impl SecretStoreClient {
    pub fn new(config: &ConnectorGatewayConfig) -> Self {
        Self {
            addr: config.secret_store_addr.trim_end_matches('/').to_string(),
            role: config.secret_store_role.clone(),
            login_path: config.secret_store_login_path.clone(),
            static_token: config.secret_store_token.clone(),
            http: reqwest::Client::new(),
            cached: Arc::new(Mutex::new(None)),
        }
    }

    async fn authenticate(&self) -> Option<String> {
        if let Some(token) = &self.static_token {
            tracing::debug!("using static secret store token");
            return Some(token.clone());
        }

        let jwt = match tokio::fs::read_to_string(SERVICE_ACCOUNT_TOKEN_PATH).await {
            Ok(jwt) => jwt.trim().to_string(),
            Err(_) => {
                tracing::warn!("no service account token found and no static token configured");
                return None;
            }
        };

        let url = format!("{}/v1/{}", self.addr, self.login_path);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "role": self.role, "jwt": jwt }))
            .send()
            .await;

        match resp {
            Ok(resp) if resp.status().is_success() => match resp.json::<LoginResponse>().await {
                Ok(body) => Some(body.auth.client_token),
                Err(e) => {
                    tracing::error!(error = %e, "malformed secret store auth response");
                    None
                }
            },
            Ok(resp) => {
                tracing::error!(status = %resp.status(), "secret store authentication failed");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "secret store authentication request failed");
                None
            }
        }
    }

    async fn token(&self) -> Option<String> {
        let mut cached = self.cached.lock().await;
        if let Some(entry) = cached.as_ref() {
            if entry.expires_at > Instant::now() {
                return Some(entry.token.clone());
            }
        }

        let token = self.authenticate().await?;
        *cached = Some(CachedToken {
            token: token.clone(),
            expires_at: Instant::now() + TOKEN_CACHE_TTL,
        });
        Some(token)
    }

    /// Fetches the KV-v2 secret at `path` (e.g.
    /// `secret/cmp/{org}/{project}/{connector}/{binding}`). Returns `None` on
    /// a missing secret or any transport failure.
    pub async fn get_secrets(&self, path: &str) -> Option<Value> {
        let token = self.token().await?;
        let url = format!("{}/v1/{}", self.addr, path);

        let resp = self.http.get(&url).header("X-Vault-Token", token).send().await;

        match resp {
            Ok(resp) if resp.status() == reqwest::StatusCode::NOT_FOUND => {
                tracing::warn!(path, "secret not found");
                None
            }
            Ok(resp) if resp.status().is_success() => match resp.json::<SecretResponse>().await {
                Ok(body) => Some(body.data.data),
                Err(e) => {
                    tracing::error!(error = %e, "malformed secret store response");
                    None
                }
            },
            Ok(resp) => {
                tracing::error!(status = %resp.status(), path, "failed to retrieve secrets");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, path, "failed to retrieve secrets");
                None
            }
        }
    }
}
