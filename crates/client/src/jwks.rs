//! JWKS fetch and cache for OIDC bearer validation, grounded on the
//! original control plane's `auth.py`: the document is cached and only
//! re-fetched when a token's `kid` is not found in the cached set, bounded
//! by a minimum refresh interval so a forged `kid` cannot be used to
//! hammer the issuer.

use crate::error::{ClientError, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Deserialize)]
struct JwkKey {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Clone, Deserialize)]
struct JwksDocument {
    keys: Vec<JwkKey>,
}

struct Cached {
    keys: HashMap<String, JwkKey>,
    fetched_at: DateTime<Utc>,
}

pub struct JwksCache {
    jwks_url: String,
    http: reqwest::Client,
    min_refresh_interval: ChronoDuration,
    cached: RwLock<Option<Cached>>,
}

impl JwksCache {
    pub fn new(jwks_url: impl Into<String>) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            http: reqwest::Client::new(),
            min_refresh_interval: ChronoDuration::seconds(60),
            cached: RwLock::new(None),
        }
    }

    pub async fn decoding_key_for(&self, kid: &str) -> Result<DecodingKey> {
        {
            let guard = self.cached.read().await;
            if let Some(cached) = guard.as_ref() {
                if let Some(key) = cached.keys.get(kid) {
                    return DecodingKey::from_rsa_components(&key.n, &key.e).map_err(ClientError::Jwt);
                }
            }
        }

        let should_refresh = {
            let guard = self.cached.read().await;
            match guard.as_ref() {
                None => true,
                Some(cached) => Utc::now() - cached.fetched_at > self.min_refresh_interval,
            }
        };

        if should_refresh {
            self.refresh().await?;
        }

        let guard = self.cached.read().await;
        let cached = guard.as_ref().ok_or_else(|| ClientError::UnknownKid(kid.to_string()))?;
        let key = cached.keys.get(kid).ok_or_else(|| ClientError::UnknownKid(kid.to_string()))?;
        DecodingKey::from_rsa_components(&key.n, &key.e).map_err(ClientError::Jwt)
    }

    async fn refresh(&self) -> Result<()> {
        let resp = self.http.get(&self.jwks_url).send().await?;
        let doc: JwksDocument = resp.json().await.map_err(ClientError::Request)?;
        let keys = doc.keys.into_iter().map(|k| (k.kid.clone(), k)).collect();
        let mut guard = self.cached.write().await;
        *guard = Some(Cached {
            keys,
            fetched_at: Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn refreshes_on_kid_miss_and_caches_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "keys": [{"kid": "k1", "n": "sXch", "e": "AQAB", "kty": "RSA"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cache = JwksCache::new(format!("{}/.well-known/jwks.json", server.uri()));
        assert!(cache.decoding_key_for("k1").await.is_ok());
        // second lookup for the same kid must not hit the mock again
        assert!(cache.decoding_key_for("k1").await.is_ok());
    }

    #[tokio::test]
    async fn unknown_kid_after_refresh_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "keys": [] })))
            .mount(&server)
            .await;

        let cache = JwksCache::new(format!("{}/.well-known/jwks.json", server.uri()));
        let err = cache.decoding_key_for("missing").await.unwrap_err();
        assert!(matches!(err, ClientError::UnknownKid(_)));
    }
}
