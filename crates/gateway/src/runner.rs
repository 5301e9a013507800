//! Client for the flow execution engine. The engine itself is out of scope
//! here — only its invocation contract is: POST `{instance_id, input,
//! metadata}` to `{runner_url}/run`, get back `{run_id, output, usage}`.

use cmp_domain::pricing::Usage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
struct RunnerRequest<'a> {
    instance_id: Uuid,
    input: &'a Value,
    metadata: &'a Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunOutput {
    #[serde(default)]
    pub run_id: String,
    #[serde(default)]
    pub output: Value,
    #[serde(default)]
    pub usage: Usage,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("runner request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("runner returned {status}: {body}")]
    Upstream { status: u16, body: String },
}

#[derive(Clone)]
pub struct RunnerClient {
    base_url: String,
    http: reqwest::Client,
}

impl RunnerClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    pub async fn execute(&self, instance_id: Uuid, input: &Value, metadata: &Value) -> Result<RunOutput, RunnerError> {
        let url = format!("{}/run", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&RunnerRequest { instance_id, input, metadata })
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(RunnerError::Upstream { status, body });
        }
        Ok(resp.json::<RunOutput>().await?)
    }
}
