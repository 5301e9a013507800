//! Connector dispatch by `connector_type`, grounded on the original
//! connector service's `connectors/executor.py`.

mod http;
mod mcp;
mod oauth2;

use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

#[derive(Debug, Serialize)]
pub struct ToolCallResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub execution_time_ms: u64,
}

pub struct Executor {
    pub connector_type: String,
    pub config: Value,
    pub secrets: Value,
    pub timeout_secs: u64,
}

impl Executor {
    pub async fn execute(&self, tool_name: &str, tool_input: &Value) -> ToolCallResponse {
        let started = Instant::now();

        let result = match self.connector_type.as_str() {
            "http" => http::execute(&self.config, &self.secrets, self.timeout_secs, tool_name, tool_input).await,
            "mcp" => mcp::execute(&self.config, &self.secrets, self.timeout_secs, tool_name, tool_input).await,
            "oauth2" => oauth2::execute(&self.config, &self.secrets, self.timeout_secs, tool_name, tool_input).await,
            other => Err(format!("unsupported connector type: {other}")),
        };

        let execution_time_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(value) => ToolCallResponse {
                success: true,
                result: Some(value),
                error: None,
                execution_time_ms,
            },
            Err(error) => {
                tracing::error!(connector_type = %self.connector_type, tool_name, error, "connector execution failed");
                ToolCallResponse {
                    success: false,
                    result: None,
                    error: Some(error),
                    execution_time_ms,
                }
            }
        }
    }
}
