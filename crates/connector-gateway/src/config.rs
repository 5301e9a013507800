//! Connector Gateway configuration, loaded from the environment.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorGatewayConfig {
    pub control_plane_url: String,

    #[serde(default = "default_secret_store_addr")]
    pub secret_store_addr: String,
    #[serde(default = "default_secret_store_role")]
    pub secret_store_role: String,
    #[serde(default = "default_secret_store_login_path")]
    pub secret_store_login_path: String,
    /// Static token for local development; skips the Kubernetes auth dance.
    #[serde(default)]
    pub secret_store_token: Option<String>,

    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_control_plane_timeout_secs")]
    pub control_plane_timeout_secs: u64,
    #[serde(default = "default_external_request_timeout_secs")]
    pub external_request_timeout_secs: u64,

    #[serde(default = "default_rate_limit_enabled")]
    pub rate_limit_enabled: bool,
    #[serde(default = "default_rate_limit_requests_per_minute")]
    pub rate_limit_requests_per_minute: usize,
}

fn default_secret_store_addr() -> String {
    "http://vault.vault.svc.cluster.local:8200".to_string()
}

fn default_secret_store_role() -> String {
    "cmp-connector".to_string()
}

fn default_secret_store_login_path() -> String {
    "auth/kubernetes/login".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8083
}

fn default_control_plane_timeout_secs() -> u64 {
    10
}

fn default_external_request_timeout_secs() -> u64 {
    30
}

fn default_rate_limit_enabled() -> bool {
    true
}

fn default_rate_limit_requests_per_minute() -> usize {
    100
}

impl ConnectorGatewayConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;
        cfg.try_deserialize()
    }
}
