//! Gateway configuration, loaded from the environment.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub control_plane_url: String,
    pub runner_url: String,
    pub oidc_issuer: String,
    pub oidc_jwks_url: String,

    #[serde(default = "default_accepted_audiences")]
    pub oidc_accepted_audiences: Vec<String>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,

    #[serde(default = "default_control_plane_timeout_secs")]
    pub control_plane_timeout_secs: u64,

    #[serde(default = "default_widget_token_ttl_secs")]
    pub widget_token_ttl_secs: u64,

    /// Allowed widget embedding origins. Empty means nothing is allowed —
    /// deployments must opt in explicitly.
    #[serde(default)]
    pub widget_allowed_origins: Vec<String>,
}

fn default_accepted_audiences() -> Vec<String> {
    vec!["cmp-gateway".to_string()]
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_run_timeout_secs() -> u64 {
    120
}

fn default_control_plane_timeout_secs() -> u64 {
    10
}

fn default_widget_token_ttl_secs() -> u64 {
    3600
}

impl GatewayConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;
        cfg.try_deserialize()
    }
}
