//! Control Plane configuration, loaded from the environment with the same
//! fn-per-default shape used across this workspace.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ControlPlaneConfig {
    pub database_url: String,
    pub oidc_issuer: String,
    pub oidc_jwks_url: String,

    #[serde(default = "default_audience")]
    pub oidc_audience: String,

    #[serde(default = "default_accepted_audiences")]
    pub oidc_accepted_audiences: Vec<String>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_secret_mount")]
    pub secret_mount: String,

    #[serde(default = "default_secret_store_addr")]
    pub secret_store_addr: String,
    #[serde(default = "default_secret_store_role")]
    pub secret_store_role: String,
    #[serde(default = "default_secret_store_login_path")]
    pub secret_store_login_path: String,
    /// Static token for local development; skips the Kubernetes auth dance.
    #[serde(default)]
    pub secret_store_token: Option<String>,
}

fn default_audience() -> String {
    "cmp-platform".to_string()
}

fn default_accepted_audiences() -> Vec<String> {
    vec!["cmp-platform".to_string()]
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_secret_mount() -> String {
    "secret/cmp".to_string()
}

fn default_secret_store_addr() -> String {
    "http://vault.vault.svc.cluster.local:8200".to_string()
}

fn default_secret_store_role() -> String {
    "cmp-control-plane".to_string()
}

fn default_secret_store_login_path() -> String {
    "auth/kubernetes/login".to_string()
}

impl ControlPlaneConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;
        cfg.try_deserialize()
    }
}
