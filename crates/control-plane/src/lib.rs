pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod secrets;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ControlPlaneConfig;
pub use server::Server;
pub use state::AppState;
