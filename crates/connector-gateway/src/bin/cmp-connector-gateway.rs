use cmp_connector_gateway::{telemetry, AppState, ConnectorGatewayConfig, Server};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    telemetry::init();
    info!("starting cmp-connector-gateway");

    let config = match ConnectorGatewayConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let state = AppState::new(config);
    let server = Server::new(state);

    if let Err(e) = server.start().await {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}
