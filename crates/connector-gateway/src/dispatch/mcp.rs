use serde_json::{json, Value};
use std::time::Duration;

pub async fn execute(config: &Value, secrets: &Value, timeout_secs: u64, tool_name: &str, tool_input: &Value) -> Result<Value, String> {
    let server_url = config.get("server_url").and_then(Value::as_str).ok_or("MCP server URL not configured")?;

    let body = json!({
        "jsonrpc": "2.0",
        "method": "tools/call",
        "params": { "name": tool_name, "arguments": tool_input },
        "id": 1,
    });

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| e.to_string())?;

    let mut req = client.post(server_url).json(&body);
    if let Some(api_key) = secrets.get("api_key").and_then(Value::as_str) {
        if !api_key.is_empty() {
            req = req.bearer_auth(api_key);
        }
    }

    let resp = req.send().await.map_err(|e| e.to_string())?;
    if !resp.status().is_success() {
        return Err(format!("upstream returned {}", resp.status()));
    }

    let data: Value = resp.json().await.map_err(|e| e.to_string())?;
    if let Some(error) = data.get("error") {
        return Err(format!("MCP error: {error}"));
    }

    Ok(data.get("result").and_then(|r| r.get("content")).cloned().unwrap_or(json!([])))
}
