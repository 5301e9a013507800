use crate::routes;
use crate::state::AppState;
use axum::http::HeaderValue;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, CorsLayer};
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

        if state.config.widget_allowed_origins.is_empty() {
            tracing::warn!("no widget_allowed_origins configured — widget embedding will be rejected for every origin");
        }

        let allowed_origins: Vec<HeaderValue> = state
            .config
            .widget_allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed_origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any);

        let app = routes::create_router(state).layer(TraceLayer::new_for_http()).layer(cors);
        Self { host, port, app }
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.host, self.port).parse()?;
        info!(%addr, "cmp-gateway starting");
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    #[cfg(test)]
    pub fn router(self) -> Router {
        self.app
    }
}
