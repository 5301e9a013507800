//! Connector bindings.

use crate::error::Result;
use cmp_domain::entities::connector::{ConnectorBinding, ConnectorBindingStatus};
use sqlx::{PgExecutor, Row};
use uuid::Uuid;

fn status_from_str(s: &str) -> ConnectorBindingStatus {
    match s {
        "REVOKED" => ConnectorBindingStatus::Revoked,
        _ => ConnectorBindingStatus::Active,
    }
}

fn status_to_str(s: ConnectorBindingStatus) -> &'static str {
    match s {
        ConnectorBindingStatus::Active => "ACTIVE",
        ConnectorBindingStatus::Revoked => "REVOKED",
    }
}

fn binding_from_row(row: &sqlx::postgres::PgRow) -> ConnectorBinding {
    ConnectorBinding {
        id: row.get("id"),
        org_id: row.get("org_id"),
        project_id: row.get("project_id"),
        connector_id: row.get("connector_id"),
        connector_type: row.get("connector_type"),
        display_name: row.get("display_name"),
        secret_path: row.get("secret_path"),
        config: row.get("config"),
        status: status_from_str(row.get::<String, _>("status").as_str()),
        created_at: row.get("created_at"),
    }
}

pub async fn insert_binding<'e, E: PgExecutor<'e>>(exec: E, binding: &ConnectorBinding) -> Result<()> {
    sqlx::query(
        "INSERT INTO connector_bindings (id, org_id, project_id, connector_id, connector_type, display_name, secret_path, config, status, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(binding.id)
    .bind(binding.org_id)
    .bind(binding.project_id)
    .bind(&binding.connector_id)
    .bind(&binding.connector_type)
    .bind(&binding.display_name)
    .bind(&binding.secret_path)
    .bind(&binding.config)
    .bind(status_to_str(binding.status))
    .bind(binding.created_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn find_binding_by_id<'e, E: PgExecutor<'e>>(exec: E, id: Uuid) -> Result<Option<ConnectorBinding>> {
    let row = sqlx::query("SELECT * FROM connector_bindings WHERE id = $1")
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| binding_from_row(&r)))
}

pub async fn list_bindings_for_project<'e, E: PgExecutor<'e>>(
    exec: E,
    project_id: Uuid,
) -> Result<Vec<ConnectorBinding>> {
    let rows = sqlx::query("SELECT * FROM connector_bindings WHERE project_id = $1 ORDER BY created_at ASC")
        .bind(project_id)
        .fetch_all(exec)
        .await?;
    Ok(rows.iter().map(binding_from_row).collect())
}

pub async fn revoke_binding<'e, E: PgExecutor<'e>>(exec: E, id: Uuid) -> Result<()> {
    sqlx::query("UPDATE connector_bindings SET status = 'REVOKED' WHERE id = $1")
        .bind(id)
        .execute(exec)
        .await?;
    Ok(())
}

pub async fn update_binding_status<'e, E: PgExecutor<'e>>(
    exec: E,
    id: Uuid,
    status: ConnectorBindingStatus,
) -> Result<()> {
    sqlx::query("UPDATE connector_bindings SET status = $1 WHERE id = $2")
        .bind(status_to_str(status))
        .bind(id)
        .execute(exec)
        .await?;
    Ok(())
}
