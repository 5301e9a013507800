use crate::middleware::rate_limit::{RateLimitConfig, RateLimitLayer};
use crate::routes;
use crate::state::AppState;
use axum::Router;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct Server {
    host: String,
    port: u16,
    app: Router,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        let host = state.config.host.clone();
        let port = state.config.port;
        let rate_limit_enabled = state.config.rate_limit_enabled;
        let rate_limit_requests_per_minute = state.config.rate_limit_requests_per_minute;

        let mut app = routes::create_router(state).layer(TraceLayer::new_for_http());
        if rate_limit_enabled {
            app = app.layer(RateLimitLayer::new(RateLimitConfig::per_minute(rate_limit_requests_per_minute)));
        }

        Self { host, port, app }
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.host, self.port).parse()?;
        info!(%addr, "cmp-connector-gateway starting");
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    #[cfg(test)]
    pub fn router(self) -> Router {
        self.app
    }
}
