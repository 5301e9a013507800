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
        if state.config.webhook_secret.is_empty() {
            tracing::warn!("CMP_WEBHOOK_SECRET is unset — webhook signature verification is disabled");
        }
        let app = routes::create_router(state).layer(TraceLayer::new_for_http());
        Self { host, port, app }
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.host, self.port).parse()?;
        info!(%addr, "cmp-provisioner starting");
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    #[cfg(test)]
    pub fn router(self) -> Router {
        self.app
    }
}
