//! Route wiring for the Control Plane (§6).

pub mod auth;
pub mod billing;
pub mod connectors;
pub mod health;
pub mod instances;
pub mod integrations;
pub mod offerings;
pub mod orgs;
pub mod wallets;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/auth/api-keys/validate", post(auth::validate_api_key))
        .route("/billing/authorize", post(billing::authorize))
        .route("/billing/settle", post(billing::settle))
        .route("/offerings", get(offerings::list_offerings).post(offerings::create_offering))
        .route("/offerings/:slug", get(offerings::get_offering))
        .route(
            "/offerings/:id/versions",
            get(offerings::list_versions).post(offerings::create_version),
        )
        .route("/offerings/:id/plans", get(offerings::list_plans).post(offerings::create_plan))
        .route("/instances", post(instances::create_instance))
        .route("/instances/trial", post(instances::start_trial))
        .route("/instances/:id", get(instances::get_instance))
        .route("/instances/:id/entitlements", get(instances::get_entitlements))
        .route(
            "/instances/:id/api_keys",
            get(instances::list_api_keys).post(instances::create_api_key),
        )
        .route("/instances/:id/api_keys/:key_id/revoke", post(instances::revoke_api_key))
        .route("/wallets/me", get(wallets::get_my_wallet))
        .route("/wallets/me/ledger", get(wallets::get_my_ledger))
        .route("/wallets/:id", get(wallets::get_wallet))
        .route("/wallets/:id/topups", post(wallets::create_topup))
        .route("/orgs/auto", post(orgs::auto_create))
        .route("/orgs/:id", get(orgs::get_org))
        .route("/orgs/:id/membership", get(orgs::get_membership))
        .route("/orgs/:id/projects", post(orgs::create_project))
        .route("/orgs/:id/projects/default", get(orgs::get_default_project))
        .route("/orgs/:id/members", post(orgs::invite_member))
        .route("/integrations/saleor/order-paid", post(integrations::order_paid))
        .route("/integrations/commerce/provision", post(integrations::provision))
        .route("/integrations/commerce/add-credits", post(integrations::add_credits))
        .route(
            "/connectors/bindings",
            post(connectors::create_binding),
        )
        .route("/connectors/bindings/project/:project_id", get(connectors::list_bindings))
        .route("/connectors/bindings/:id", get(connectors::get_binding))
        .route("/connectors/bindings/:id/revoke", post(connectors::revoke_binding))
        .route("/connectors/bindings/:id/credentials", get(connectors::get_credentials))
        .with_state(state)
}
