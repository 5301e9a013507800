use cmp_control_plane::{telemetry, AppState, ControlPlaneConfig, Server};
use cmp_store::{config::StoreConfig, Database};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    telemetry::init();
    info!("starting cmp-control-plane");

    let config = match ControlPlaneConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let store_config = match StoreConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to load store configuration");
            std::process::exit(1);
        }
    };

    let db = match Database::connect(&store_config).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "failed to connect to database");
            std::process::exit(1);
        }
    };

    if let Err(e) = db.migrate().await {
        error!(error = %e, "failed to run migrations");
        std::process::exit(1);
    }

    let state = AppState::new(db, config);
    let server = Server::new(state);

    if let Err(e) = server.start().await {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}
