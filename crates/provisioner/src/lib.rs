pub mod config;
pub mod error;
pub mod hmac_verify;
pub mod idempotency;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ProvisionerConfig;
pub use server::Server;
pub use state::AppState;
