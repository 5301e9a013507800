use reqwest::Method;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, serde::Deserialize)]
struct ToolConfig {
    #[serde(default = "default_method")]
    method: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    headers: std::collections::HashMap<String, String>,
}

fn default_method() -> String {
    "POST".to_string()
}

pub async fn execute(config: &Value, secrets: &Value, timeout_secs: u64, tool_name: &str, tool_input: &Value) -> Result<Value, String> {
    execute_with_bearer_override(config, secrets, timeout_secs, tool_name, tool_input, None).await
}

/// Shared by `oauth2`, which authenticates separately and supplies its own
/// bearer token in place of whatever `secrets` would otherwise produce.
pub(crate) async fn execute_with_bearer_override(
    config: &Value,
    secrets: &Value,
    timeout_secs: u64,
    tool_name: &str,
    tool_input: &Value,
    bearer_override: Option<&str>,
) -> Result<Value, String> {
    let base_url = config.get("base_url").and_then(Value::as_str).unwrap_or("");
    let tool_config: ToolConfig = config
        .get("tools")
        .and_then(|t| t.get(tool_name))
        .and_then(|t| serde_json::from_value(t.clone()).ok())
        .ok_or_else(|| format!("tool not configured: {tool_name}"))?;

    let method = Method::from_bytes(tool_config.method.to_uppercase().as_bytes()).map_err(|_| format!("unsupported http method: {}", tool_config.method))?;

    let mut headers = tool_config.headers;
    if bearer_override.is_none() {
        let api_key = secrets.get("api_key").and_then(Value::as_str).unwrap_or("");
        if !api_key.is_empty() {
            let auth_header = secrets.get("auth_header").and_then(Value::as_str).unwrap_or("Authorization").to_string();
            let auth_prefix = secrets.get("auth_prefix").and_then(Value::as_str).unwrap_or("Bearer");
            let value = if auth_prefix.is_empty() {
                api_key.to_string()
            } else {
                format!("{auth_prefix} {api_key}")
            };
            headers.insert(auth_header, value);
        }
    }

    let url = format!("{base_url}{}", tool_config.path);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| e.to_string())?;

    let mut req = client.request(method.clone(), &url);
    for (k, v) in &headers {
        req = req.header(k, v);
    }
    if let Some(token) = bearer_override {
        req = req.bearer_auth(token);
    }
    req = match method {
        Method::GET => req.query(tool_input),
        Method::DELETE => req,
        _ => req.json(tool_input),
    };

    let resp = req.send().await.map_err(|e| e.to_string())?;
    if !resp.status().is_success() {
        return Err(format!("upstream returned {}", resp.status()));
    }

    let text = resp.text().await.map_err(|e| e.to_string())?;
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}
