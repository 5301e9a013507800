use crate::config::ProvisionerConfig;
use crate::idempotency::IdempotencyStore;
use cmp_client::ControlPlaneClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub control_plane: ControlPlaneClient,
    pub config: Arc<ProvisionerConfig>,
    pub idempotency: Arc<IdempotencyStore>,
}

impl AppState {
    pub fn new(config: ProvisionerConfig) -> Self {
        let control_plane = ControlPlaneClient::new(config.control_plane_url.clone(), config.control_plane_timeout_secs);
        let idempotency = Arc::new(IdempotencyStore::new(config.idempotency_ttl_secs));
        Self {
            control_plane,
            config: Arc::new(config),
            idempotency,
        }
    }
}
