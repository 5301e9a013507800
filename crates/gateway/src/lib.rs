pub mod auth;
pub mod config;
pub mod error;
pub mod metering;
pub mod routes;
pub mod runner;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::GatewayConfig;
pub use server::Server;
pub use state::AppState;
