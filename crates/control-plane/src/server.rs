//! Server assembly: router plus cross-cutting layers.

use crate::middleware::trace_id_middleware;
use crate::routes;
use crate::state::AppState;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
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
        let app = Self::build_app(state);
        Self { host, port, app }
    }

    fn build_app(state: AppState) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

        routes::create_router(state)
            .layer(axum::middleware::from_fn(trace_id_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.host, self.port).parse()?;
        info!(%addr, "cmp-control-plane starting");
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    #[cfg(test)]
    pub fn router(self) -> Router {
        self.app
    }
}
