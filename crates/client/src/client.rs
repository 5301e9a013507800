//! Thin SDK over the Control Plane's service-to-service endpoints, used by
//! the Provisioner, Gateway, and Connector Gateway. Every call goes through
//! `retry_request` and a per-client configurable timeout (§5).

use crate::error::Result;
use crate::retry::{ok_or_upstream, retry_request, RetryConfig};
use crate::types::*;
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone)]
pub struct ControlPlaneClient {
    base_url: String,
    http: reqwest::Client,
    retry_config: RetryConfig,
}

impl ControlPlaneClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self::with_retry_config(base_url, timeout_secs, RetryConfig::default())
    }

    pub fn with_retry_config(base_url: impl Into<String>, timeout_secs: u64, retry_config: RetryConfig) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            retry_config,
        }
    }

    pub async fn authorize(&self, instance_id: Uuid, requested_budget: Option<i64>) -> Result<AuthorizeResponse> {
        let url = format!("{}/billing/authorize", self.base_url);
        let body = AuthorizeRequest {
            instance_id,
            requested_budget,
        };
        retry_request(&self.retry_config, || async {
            let resp = self.http.post(&url).json(&body).send().await?;
            let resp = ok_or_upstream(&url, resp).await?;
            Ok(resp.json::<AuthorizeResponse>().await?)
        })
        .await
    }

    pub async fn settle(
        &self,
        reservation_id: Uuid,
        instance_id: Uuid,
        usage: Option<cmp_domain::pricing::Usage>,
    ) -> Result<SettleResponse> {
        let url = format!("{}/billing/settle", self.base_url);
        let body = SettleRequest {
            reservation_id,
            instance_id,
            usage,
        };
        retry_request(&self.retry_config, || async {
            let resp = self.http.post(&url).json(&body).send().await?;
            let resp = ok_or_upstream(&url, resp).await?;
            Ok(resp.json::<SettleResponse>().await?)
        })
        .await
    }

    pub async fn provision_instance(&self, req: &ProvisionInstanceRequest) -> Result<ProvisionInstanceResponse> {
        let url = format!("{}/integrations/commerce/provision", self.base_url);
        retry_request(&self.retry_config, || async {
            let resp = self.http.post(&url).json(req).send().await?;
            let resp = ok_or_upstream(&url, resp).await?;
            Ok(resp.json::<ProvisionInstanceResponse>().await?)
        })
        .await
    }

    pub async fn add_credits(&self, req: &AddCreditsRequest) -> Result<AddCreditsResponse> {
        let url = format!("{}/integrations/commerce/add-credits", self.base_url);
        retry_request(&self.retry_config, || async {
            let resp = self.http.post(&url).json(req).send().await?;
            let resp = ok_or_upstream(&url, resp).await?;
            Ok(resp.json::<AddCreditsResponse>().await?)
        })
        .await
    }

    pub async fn validate_api_key(&self, candidate: &str) -> Result<Option<ValidateApiKeyResponse>> {
        let url = format!("{}/auth/api-keys/validate", self.base_url);
        retry_request(&self.retry_config, || async {
            let resp = self
                .http
                .post(&url)
                .json(&serde_json::json!({ "api_key": candidate }))
                .send()
                .await?;
            if resp.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            let resp = ok_or_upstream(&url, resp).await?;
            Ok(Some(resp.json::<ValidateApiKeyResponse>().await?))
        })
        .await
    }

    pub async fn get_connector_binding(&self, binding_id: Uuid) -> Result<ConnectorBindingResponse> {
        let url = format!("{}/connectors/bindings/{}", self.base_url, binding_id);
        retry_request(&self.retry_config, || async {
            let resp = self.http.get(&url).send().await?;
            let resp = ok_or_upstream(&url, resp).await?;
            Ok(resp.json::<ConnectorBindingResponse>().await?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn authorize_decodes_success_response() {
        let server = MockServer::start().await;
        let instance_id = Uuid::new_v4();
        let reservation_id = Uuid::new_v4();
        Mock::given(method("POST"))
            .and(path("/billing/authorize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "allowed": true,
                "reservation_id": reservation_id,
                "budget": 10,
                "balance": 100
            })))
            .mount(&server)
            .await;

        let client = ControlPlaneClient::new(server.uri(), 10);
        let resp = client.authorize(instance_id, None).await.unwrap();
        assert!(resp.allowed);
        assert_eq!(resp.reservation_id, reservation_id);
    }

    #[tokio::test]
    async fn upstream_5xx_surfaces_as_error_after_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/billing/authorize"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ControlPlaneClient::with_retry_config(
            server.uri(),
            5,
            RetryConfig {
                max_retries: 2,
                initial_delay_ms: 1,
                max_delay_ms: 2,
                backoff_multiplier: 1.0,
            },
        );
        let err = client.authorize(Uuid::new_v4(), None).await.unwrap_err();
        assert!(matches!(err, crate::error::ClientError::Upstream { status: 500, .. }));
    }
}
