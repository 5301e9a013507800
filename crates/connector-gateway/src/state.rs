use crate::config::ConnectorGatewayConfig;
use crate::secrets::SecretStoreClient;
use cmp_client::ControlPlaneClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub control_plane: ControlPlaneClient,
    pub secrets: Arc<SecretStoreClient>,
    pub config: Arc<ConnectorGatewayConfig>,
}

impl AppState {
    pub fn new(config: ConnectorGatewayConfig) -> Self {
        let control_plane = ControlPlaneClient::new(config.control_plane_url.clone(), config.control_plane_timeout_secs);
        let secrets = Arc::new(SecretStoreClient::new(&config));
        Self {
            control_plane,
            secrets,
            config: Arc::new(config),
        }
    }
}
