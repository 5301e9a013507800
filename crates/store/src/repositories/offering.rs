//! Catalog repositories: offerings, immutable versions, plans.
//!
//! The fuzzy name-match fallback in `find_offering_for_provisioning` is kept
//! as-is per SPEC_FULL.md §9 ("that heuristic is fragile and should be
//! replaced by an explicit mapping table in a future revision") — it is not
//! this workspace's job to replace it, only to reproduce it faithfully.

use crate::error::Result;
use cmp_domain::entities::offering::{
    cheapest_plan, BillingPeriod, Offering, OfferingCategory, OfferingStatus, OfferingVersion, Plan,
};
use serde_json::Value;
use sqlx::{PgExecutor, Row};
use uuid::Uuid;

fn category_from_str(s: &str) -> OfferingCategory {
    match s {
        "APP" => OfferingCategory::App,
        "ASSISTANT" => OfferingCategory::Assistant,
        "AUTOMATION" => OfferingCategory::Automation,
        _ => OfferingCategory::Agent,
    }
}

fn category_to_str(c: OfferingCategory) -> &'static str {
    match c {
        OfferingCategory::Agent => "AGENT",
        OfferingCategory::App => "APP",
        OfferingCategory::Assistant => "ASSISTANT",
        OfferingCategory::Automation => "AUTOMATION",
    }
}

fn status_from_str(s: &str) -> OfferingStatus {
    match s {
        "PUBLISHED" => OfferingStatus::Published,
        "PAUSED" => OfferingStatus::Paused,
        "EOS" => OfferingStatus::Eos,
        "EOL" => OfferingStatus::Eol,
        _ => OfferingStatus::Draft,
    }
}

fn status_to_str(s: OfferingStatus) -> &'static str {
    match s {
        OfferingStatus::Draft => "DRAFT",
        OfferingStatus::Published => "PUBLISHED",
        OfferingStatus::Paused => "PAUSED",
        OfferingStatus::Eos => "EOS",
        OfferingStatus::Eol => "EOL",
    }
}

fn billing_period_from_str(s: &str) -> BillingPeriod {
    match s {
        "YEARLY" => BillingPeriod::Yearly,
        "ONE_TIME" => BillingPeriod::OneTime,
        "USAGE" => BillingPeriod::Usage,
        _ => BillingPeriod::Monthly,
    }
}

fn offering_from_row(row: &sqlx::postgres::PgRow) -> Offering {
    Offering {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        category: category_from_str(row.get::<String, _>("category").as_str()),
        status: status_from_str(row.get::<String, _>("status").as_str()),
        commerce_product_id: row.get("commerce_product_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn version_from_row(row: &sqlx::postgres::PgRow) -> OfferingVersion {
    let capabilities: Value = row.get("capabilities");
    OfferingVersion {
        id: row.get("id"),
        offering_id: row.get("offering_id"),
        version_label: row.get("version_label"),
        artifact_ref: row.get("artifact_ref"),
        capabilities: serde_json::from_value(capabilities).unwrap_or_default(),
        defaults: row.get("defaults"),
        status: status_from_str(row.get::<String, _>("status").as_str()),
        created_at: row.get("created_at"),
    }
}

fn plan_from_row(row: &sqlx::postgres::PgRow) -> Plan {
    Plan {
        id: row.get("id"),
        offering_id: row.get("offering_id"),
        name: row.get("name"),
        slug: row.get("slug"),
        billing_period: billing_period_from_str(row.get::<String, _>("billing_period").as_str()),
        price_credits: row.get("price_credits"),
        included_credits: row.get("included_credits"),
        limits: row.get("limits"),
        is_default: row.get("is_default"),
        is_trial: row.get("is_trial"),
        commerce_variant_id: row.get("commerce_variant_id"),
        created_at: row.get("created_at"),
    }
}

pub async fn find_by_slug<'e, E: PgExecutor<'e>>(exec: E, slug: &str) -> Result<Option<Offering>> {
    let row = sqlx::query("SELECT * FROM offerings WHERE slug = $1")
        .bind(slug)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| offering_from_row(&r)))
}

pub async fn find_by_commerce_product_id<'e, E: PgExecutor<'e>>(
    exec: E,
    product_id: &str,
) -> Result<Option<Offering>> {
    let row = sqlx::query("SELECT * FROM offerings WHERE commerce_product_id = $1")
        .bind(product_id)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| offering_from_row(&r)))
}

/// Fragile-by-design fallback: case-insensitive substring match of the
/// commerce product name against offering names. See module docs.
pub async fn find_by_fuzzy_name<'e, E: PgExecutor<'e>>(
    exec: E,
    product_name: &str,
) -> Result<Option<Offering>> {
    let pattern = format!("%{}%", product_name.to_lowercase());
    let row = sqlx::query("SELECT * FROM offerings WHERE lower(name) LIKE $1 ORDER BY created_at ASC LIMIT 1")
        .bind(pattern)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| offering_from_row(&r)))
}

pub async fn list_published<'e, E: PgExecutor<'e>>(exec: E) -> Result<Vec<Offering>> {
    let rows = sqlx::query("SELECT * FROM offerings WHERE status = 'PUBLISHED' ORDER BY name ASC")
        .fetch_all(exec)
        .await?;
    Ok(rows.iter().map(offering_from_row).collect())
}

pub async fn insert_offering<'e, E: PgExecutor<'e>>(exec: E, offering: &Offering) -> Result<()> {
    sqlx::query(
        "INSERT INTO offerings (id, name, slug, category, status, commerce_product_id, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(offering.id)
    .bind(&offering.name)
    .bind(&offering.slug)
    .bind(category_to_str(offering.category))
    .bind(status_to_str(offering.status))
    .bind(&offering.commerce_product_id)
    .bind(offering.created_at)
    .bind(offering.updated_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn newest_version<'e, E: PgExecutor<'e>>(exec: E, offering_id: Uuid) -> Result<Option<OfferingVersion>> {
    let row = sqlx::query("SELECT * FROM offering_versions WHERE offering_id = $1 ORDER BY created_at DESC LIMIT 1")
        .bind(offering_id)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| version_from_row(&r)))
}

pub async fn list_versions<'e, E: PgExecutor<'e>>(exec: E, offering_id: Uuid) -> Result<Vec<OfferingVersion>> {
    let rows = sqlx::query("SELECT * FROM offering_versions WHERE offering_id = $1 ORDER BY created_at DESC")
        .bind(offering_id)
        .fetch_all(exec)
        .await?;
    Ok(rows.iter().map(version_from_row).collect())
}

pub async fn insert_version<'e, E: PgExecutor<'e>>(exec: E, version: &OfferingVersion) -> Result<()> {
    sqlx::query(
        "INSERT INTO offering_versions (id, offering_id, version_label, artifact_ref, capabilities, defaults, status, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(version.id)
    .bind(version.offering_id)
    .bind(&version.version_label)
    .bind(&version.artifact_ref)
    .bind(serde_json::to_value(&version.capabilities).unwrap_or(Value::Array(vec![])))
    .bind(&version.defaults)
    .bind(status_to_str(version.status))
    .bind(version.created_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn find_plan_by_variant<'e, E: PgExecutor<'e>>(
    exec: E,
    offering_id: Uuid,
    commerce_variant_id: &str,
) -> Result<Option<Plan>> {
    let row = sqlx::query("SELECT * FROM plans WHERE offering_id = $1 AND commerce_variant_id = $2")
        .bind(offering_id)
        .bind(commerce_variant_id)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| plan_from_row(&r)))
}

pub async fn list_plans<'e, E: PgExecutor<'e>>(exec: E, offering_id: Uuid) -> Result<Vec<Plan>> {
    let rows = sqlx::query("SELECT * FROM plans WHERE offering_id = $1")
        .bind(offering_id)
        .fetch_all(exec)
        .await?;
    Ok(rows.iter().map(plan_from_row).collect())
}

pub async fn find_cheapest_plan<'e, E: PgExecutor<'e>>(exec: E, offering_id: Uuid) -> Result<Option<Plan>> {
    let plans = list_plans(exec, offering_id).await?;
    Ok(cheapest_plan(&plans).cloned())
}

pub async fn find_plan_by_id<'e, E: PgExecutor<'e>>(exec: E, plan_id: Uuid) -> Result<Option<Plan>> {
    let row = sqlx::query("SELECT * FROM plans WHERE id = $1")
        .bind(plan_id)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| plan_from_row(&r)))
}

pub async fn insert_plan<'e, E: PgExecutor<'e>>(exec: E, plan: &Plan) -> Result<()> {
    sqlx::query(
        "INSERT INTO plans (id, offering_id, name, slug, billing_period, price_credits, included_credits, limits, is_default, is_trial, commerce_variant_id, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(plan.id)
    .bind(plan.offering_id)
    .bind(&plan.name)
    .bind(&plan.slug)
    .bind(match plan.billing_period {
        BillingPeriod::Monthly => "MONTHLY",
        BillingPeriod::Yearly => "YEARLY",
        BillingPeriod::OneTime => "ONE_TIME",
        BillingPeriod::Usage => "USAGE",
    })
    .bind(plan.price_credits)
    .bind(plan.included_credits)
    .bind(&plan.limits)
    .bind(plan.is_default)
    .bind(plan.is_trial)
    .bind(&plan.commerce_variant_id)
    .bind(plan.created_at)
    .execute(exec)
    .await?;
    Ok(())
}

/// Offering resolution order for commerce provisioning (§4.1.3 step 3):
/// explicit slug in metadata, then commerce product id, then fuzzy name.
pub async fn find_offering_for_provisioning<'e, E: PgExecutor<'e> + Copy>(
    exec: E,
    cp_offering_slug: Option<&str>,
    commerce_product_id: Option<&str>,
    product_name: Option<&str>,
) -> Result<Option<Offering>> {
    if let Some(slug) = cp_offering_slug {
        if let Some(offering) = find_by_slug(exec, slug).await? {
            return Ok(Some(offering));
        }
    }
    if let Some(product_id) = commerce_product_id {
        if let Some(offering) = find_by_commerce_product_id(exec, product_id).await? {
            return Ok(Some(offering));
        }
    }
    if let Some(name) = product_name {
        if let Some(offering) = find_by_fuzzy_name(exec, name).await? {
            return Ok(Some(offering));
        }
    }
    Ok(None)
}

/// Offering resolution for the trial flow (§4.1.6): exact slug, then
/// contains-name on the same `offerings.name` column.
pub async fn find_offering_for_trial<'e, E: PgExecutor<'e> + Copy>(
    exec: E,
    slug: &str,
) -> Result<Option<Offering>> {
    if let Some(offering) = find_by_slug(exec, slug).await? {
        return Ok(Some(offering));
    }
    find_by_fuzzy_name(exec, slug).await
}
