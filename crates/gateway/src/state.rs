use crate::config::GatewayConfig;
use crate::runner::RunnerClient;
use cmp_client::{ControlPlaneClient, JwksCache};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub control_plane: ControlPlaneClient,
    pub runner: RunnerClient,
    pub config: Arc<GatewayConfig>,
    pub jwks: Arc<JwksCache>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        let control_plane = ControlPlaneClient::new(config.control_plane_url.clone(), config.control_plane_timeout_secs);
        let runner = RunnerClient::new(config.runner_url.clone(), config.run_timeout_secs);
        let jwks = Arc::new(JwksCache::new(config.oidc_jwks_url.clone()));
        Self {
            control_plane,
            runner,
            config: Arc::new(config),
            jwks,
        }
    }
}
