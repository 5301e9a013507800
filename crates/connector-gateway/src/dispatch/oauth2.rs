use serde_json::Value;
use std::time::Duration;

async fn fetch_access_token(config: &Value, secrets: &Value, timeout_secs: u64) -> Result<String, String> {
    let token_url = config.get("token_url").and_then(Value::as_str).unwrap_or("");
    let client_id = secrets.get("client_id").and_then(Value::as_str).unwrap_or("");
    let client_secret = secrets.get("client_secret").and_then(Value::as_str).unwrap_or("");
    let refresh_token = secrets.get("refresh_token").and_then(Value::as_str);

    if token_url.is_empty() || client_id.is_empty() || client_secret.is_empty() {
        return Err("OAuth2 credentials not properly configured".to_string());
    }

    let mut form = vec![("client_id", client_id), ("client_secret", client_secret)];
    if let Some(refresh_token) = refresh_token {
        form.push(("grant_type", "refresh_token"));
        form.push(("refresh_token", refresh_token));
    } else {
        form.push(("grant_type", "client_credentials"));
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| e.to_string())?;

    let resp = client.post(token_url).form(&form).send().await.map_err(|e| e.to_string())?;
    if !resp.status().is_success() {
        return Err(format!("token endpoint returned {}", resp.status()));
    }

    let data: Value = resp.json().await.map_err(|e| e.to_string())?;
    data.get("access_token")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| "token response missing access_token".to_string())
}

/// Authenticates against the token endpoint, then proceeds as per `http`,
/// with the fetched access token overriding whatever auth `secrets` carries.
pub async fn execute(config: &Value, secrets: &Value, timeout_secs: u64, tool_name: &str, tool_input: &Value) -> Result<Value, String> {
    let access_token = fetch_access_token(config, secrets, timeout_secs).await?;
    super::http::execute_with_bearer_override(config, secrets, timeout_secs, tool_name, tool_input, Some(&access_token)).await
}
