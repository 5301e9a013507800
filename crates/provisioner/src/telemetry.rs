//! Structured logging init, identical shape to the rest of the workspace.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match std::env::var("LOG_FORMAT").unwrap_or_default().to_lowercase().as_str() {
        "json" => tracing_subscriber::registry().with(filter).with(fmt::layer().json()).init(),
        _ => tracing_subscriber::registry().with(filter).with(fmt::layer()).init(),
    }
}
