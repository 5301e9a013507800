//! Instances and API keys.

use crate::error::Result;
use chrono::{DateTime, Utc};
use cmp_domain::entities::instance::{ApiKey, Instance, InstanceState};
use sqlx::{PgExecutor, Row};
use uuid::Uuid;

fn state_from_str(s: &str) -> InstanceState {
    match s {
        "PROVISIONING" => InstanceState::Provisioning,
        "ACTIVE" => InstanceState::Active,
        "PAUSED" => InstanceState::Paused,
        "TERMINATED" => InstanceState::Terminated,
        _ => InstanceState::Requested,
    }
}

fn state_to_str(s: InstanceState) -> &'static str {
    match s {
        InstanceState::Requested => "REQUESTED",
        InstanceState::Provisioning => "PROVISIONING",
        InstanceState::Active => "ACTIVE",
        InstanceState::Paused => "PAUSED",
        InstanceState::Terminated => "TERMINATED",
    }
}

fn instance_from_row(row: &sqlx::postgres::PgRow) -> Instance {
    Instance {
        id: row.get("id"),
        offering_version_id: row.get("offering_version_id"),
        org_id: row.get("org_id"),
        project_id: row.get("project_id"),
        plan_id: row.get("plan_id"),
        name: row.get("name"),
        state: state_from_str(row.get::<String, _>("state").as_str()),
        overrides: row.get("overrides"),
        effective_config: row.get("effective_config"),
        idempotency_key: row.get("idempotency_key"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn api_key_from_row(row: &sqlx::postgres::PgRow) -> ApiKey {
    ApiKey {
        id: row.get("id"),
        instance_id: row.get("instance_id"),
        name: row.get("name"),
        prefix: row.get("prefix"),
        hash: row.get("hash"),
        last_used_at: row.get("last_used_at"),
        expires_at: row.get("expires_at"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

pub async fn insert_instance<'e, E: PgExecutor<'e>>(exec: E, instance: &Instance) -> Result<()> {
    sqlx::query(
        "INSERT INTO instances (id, offering_version_id, org_id, project_id, plan_id, name, state, overrides, effective_config, idempotency_key, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(instance.id)
    .bind(instance.offering_version_id)
    .bind(instance.org_id)
    .bind(instance.project_id)
    .bind(instance.plan_id)
    .bind(&instance.name)
    .bind(state_to_str(instance.state))
    .bind(&instance.overrides)
    .bind(&instance.effective_config)
    .bind(&instance.idempotency_key)
    .bind(instance.created_at)
    .bind(instance.updated_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn find_instance_by_id<'e, E: PgExecutor<'e>>(exec: E, id: Uuid) -> Result<Option<Instance>> {
    let row = sqlx::query("SELECT * FROM instances WHERE id = $1")
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| instance_from_row(&r)))
}

pub async fn find_instance_by_idempotency_key<'e, E: PgExecutor<'e>>(
    exec: E,
    key: &str,
) -> Result<Option<Instance>> {
    let row = sqlx::query("SELECT * FROM instances WHERE idempotency_key = $1")
        .bind(key)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| instance_from_row(&r)))
}

pub async fn update_state<'e, E: PgExecutor<'e>>(exec: E, id: Uuid, state: InstanceState, now: DateTime<Utc>) -> Result<()> {
    sqlx::query("UPDATE instances SET state = $1, updated_at = $2 WHERE id = $3")
        .bind(state_to_str(state))
        .bind(now)
        .bind(id)
        .execute(exec)
        .await?;
    Ok(())
}

pub async fn insert_api_key<'e, E: PgExecutor<'e>>(exec: E, key: &ApiKey) -> Result<()> {
    sqlx::query(
        "INSERT INTO api_keys (id, instance_id, name, prefix, hash, last_used_at, expires_at, is_active, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(key.id)
    .bind(key.instance_id)
    .bind(&key.name)
    .bind(&key.prefix)
    .bind(&key.hash)
    .bind(key.last_used_at)
    .bind(key.expires_at)
    .bind(key.is_active)
    .bind(key.created_at)
    .execute(exec)
    .await?;
    Ok(())
}

/// Candidates sharing the key's 12-char prefix; the caller still compares
/// the hash (I7: prefix collision alone is not sufficient).
pub async fn find_active_api_keys_by_prefix<'e, E: PgExecutor<'e>>(
    exec: E,
    prefix: &str,
) -> Result<Vec<ApiKey>> {
    let rows = sqlx::query("SELECT * FROM api_keys WHERE prefix = $1 AND is_active = true")
        .bind(prefix)
        .fetch_all(exec)
        .await?;
    Ok(rows.iter().map(api_key_from_row).collect())
}

pub async fn touch_last_used<'e, E: PgExecutor<'e>>(exec: E, key_id: Uuid, now: DateTime<Utc>) -> Result<()> {
    sqlx::query("UPDATE api_keys SET last_used_at = $1 WHERE id = $2")
        .bind(now)
        .bind(key_id)
        .execute(exec)
        .await?;
    Ok(())
}

pub async fn revoke_api_key<'e, E: PgExecutor<'e>>(exec: E, key_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE api_keys SET is_active = false WHERE id = $1")
        .bind(key_id)
        .execute(exec)
        .await?;
    Ok(())
}

pub async fn list_api_keys_for_instance<'e, E: PgExecutor<'e>>(exec: E, instance_id: Uuid) -> Result<Vec<ApiKey>> {
    let rows = sqlx::query("SELECT * FROM api_keys WHERE instance_id = $1 ORDER BY created_at ASC")
        .bind(instance_id)
        .fetch_all(exec)
        .await?;
    Ok(rows.iter().map(api_key_from_row).collect())
}
