//! Provisioner configuration, loaded from the environment.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionerConfig {
    pub control_plane_url: String,

    /// Shared HMAC secret for the commerce webhook. Empty disables
    /// verification — development only, logged as a warning at startup.
    #[serde(default)]
    pub webhook_secret: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_idempotency_ttl_secs")]
    pub idempotency_ttl_secs: u64,

    #[serde(default = "default_control_plane_timeout_secs")]
    pub control_plane_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_idempotency_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_control_plane_timeout_secs() -> u64 {
    10
}

impl ProvisionerConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;
        cfg.try_deserialize()
    }
}
