use crate::config::ControlPlaneConfig;
use crate::secrets::SecretStoreClient;
use cmp_client::JwksCache;
use cmp_store::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ControlPlaneConfig>,
    pub jwks: Arc<JwksCache>,
    pub secrets: Arc<SecretStoreClient>,
}

impl AppState {
    pub fn new(db: Database, config: ControlPlaneConfig) -> Self {
        let jwks = Arc::new(JwksCache::new(config.oidc_jwks_url.clone()));
        let secrets = Arc::new(SecretStoreClient::new(&config));
        Self {
            db,
            config: Arc::new(config),
            jwks,
            secrets,
        }
    }
}
