//! Catalog: offerings, versions, plans (§4.1.9). Listing published
//! offerings is public; mutation requires an authenticated caller.

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use cmp_domain::entities::offering::{Offering, OfferingCategory, OfferingStatus, OfferingVersion, Plan};
use cmp_store::repositories::offering;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

pub async fn list_offerings(State(state): State<AppState>) -> Result<Json<Vec<Offering>>> {
    Ok(Json(offering::list_published(state.db.pool()).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateOfferingBody {
    pub name: String,
    pub slug: String,
    pub category: OfferingCategory,
    pub commerce_product_id: Option<String>,
}

pub async fn create_offering(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(body): Json<CreateOfferingBody>,
) -> Result<Json<Offering>> {
    let now = Utc::now();
    let new_offering = Offering {
        id: Uuid::new_v4(),
        name: body.name,
        slug: body.slug,
        category: body.category,
        status: OfferingStatus::Draft,
        commerce_product_id: body.commerce_product_id,
        created_at: now,
        updated_at: now,
    };
    offering::insert_offering(state.db.pool(), &new_offering).await?;
    Ok(Json(new_offering))
}

pub async fn list_versions(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Vec<OfferingVersion>>> {
    Ok(Json(offering::list_versions(state.db.pool(), id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateVersionBody {
    pub version_label: String,
    pub artifact_ref: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default = "default_empty_object")]
    pub defaults: Value,
}

fn default_empty_object() -> Value {
    json!({})
}

pub async fn create_version(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateVersionBody>,
) -> Result<Json<OfferingVersion>> {
    let version = OfferingVersion {
        id: Uuid::new_v4(),
        offering_id: id,
        version_label: body.version_label,
        artifact_ref: body.artifact_ref,
        capabilities: body.capabilities,
        defaults: body.defaults,
        status: OfferingStatus::Draft,
        created_at: Utc::now(),
    };
    offering::insert_version(state.db.pool(), &version).await?;
    Ok(Json(version))
}

pub async fn list_plans(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Vec<Plan>>> {
    Ok(Json(offering::list_plans(state.db.pool(), id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanBody {
    pub name: String,
    pub slug: String,
    pub billing_period: cmp_domain::entities::offering::BillingPeriod,
    pub price_credits: i64,
    #[serde(default)]
    pub included_credits: i64,
    #[serde(default = "default_empty_object")]
    pub limits: Value,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_trial: bool,
    pub commerce_variant_id: Option<String>,
}

pub async fn create_plan(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreatePlanBody>,
) -> Result<Json<Plan>> {
    let plan = Plan {
        id: Uuid::new_v4(),
        offering_id: id,
        name: body.name,
        slug: body.slug,
        billing_period: body.billing_period,
        price_credits: body.price_credits,
        included_credits: body.included_credits,
        limits: body.limits,
        is_default: body.is_default,
        is_trial: body.is_trial,
        commerce_variant_id: body.commerce_variant_id,
        created_at: Utc::now(),
    };
    offering::insert_plan(state.db.pool(), &plan).await?;
    Ok(Json(plan))
}

pub async fn get_offering(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Offering>> {
    let found = offering::find_by_slug(state.db.pool(), &slug)
        .await?
        .ok_or_else(|| ApiError::Store(cmp_store::StoreError::NotFound(format!("offering {slug}"))))?;
    Ok(Json(found))
}
