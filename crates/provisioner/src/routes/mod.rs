pub mod health;
pub mod webhooks;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/webhooks/saleor/order-paid", post(webhooks::order_paid))
        .with_state(state)
}
