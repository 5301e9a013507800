//! Organizations, projects, and memberships.

use crate::error::{Result, StoreError};
use chrono::Utc;
use cmp_domain::entities::org::{Membership, Organization, Project, Role};
use serde_json::Value;
use sqlx::{PgExecutor, Row};
use uuid::Uuid;

fn role_to_str(r: Role) -> &'static str {
    match r {
        Role::Owner => "OWNER",
        Role::Admin => "ADMIN",
        Role::Member => "MEMBER",
        Role::Viewer => "VIEWER",
    }
}

fn role_from_str(s: &str) -> Role {
    match s {
        "OWNER" => Role::Owner,
        "ADMIN" => Role::Admin,
        "VIEWER" => Role::Viewer,
        _ => Role::Member,
    }
}

fn org_from_row(row: &sqlx::postgres::PgRow) -> Organization {
    Organization {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        owner_id: row.get("owner_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn project_from_row(row: &sqlx::postgres::PgRow) -> Project {
    Project {
        id: row.get("id"),
        org_id: row.get("org_id"),
        name: row.get("name"),
        slug: row.get("slug"),
        is_default: row.get("is_default"),
        created_at: row.get("created_at"),
    }
}

fn membership_from_row(row: &sqlx::postgres::PgRow) -> Membership {
    let teams: Value = row.get("teams");
    Membership {
        id: row.get("id"),
        org_id: row.get("org_id"),
        user_id: row.get("user_id"),
        role: role_from_str(row.get::<String, _>("role").as_str()),
        teams: serde_json::from_value(teams).unwrap_or_default(),
        created_at: row.get("created_at"),
    }
}

pub async fn find_org_by_slug<'e, E: PgExecutor<'e>>(exec: E, slug: &str) -> Result<Option<Organization>> {
    let row = sqlx::query("SELECT * FROM organizations WHERE slug = $1")
        .bind(slug)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| org_from_row(&r)))
}

pub async fn find_org_by_id<'e, E: PgExecutor<'e>>(exec: E, id: Uuid) -> Result<Option<Organization>> {
    let row = sqlx::query("SELECT * FROM organizations WHERE id = $1")
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| org_from_row(&r)))
}

/// Finds the organization where `user_id` holds the OWNER membership, i.e.
/// the org auto-created for them on first login/commerce event.
pub async fn find_owned_org<'e, E: PgExecutor<'e>>(exec: E, user_id: &str) -> Result<Option<Organization>> {
    let row = sqlx::query(
        "SELECT o.* FROM organizations o \
         JOIN memberships m ON m.org_id = o.id \
         WHERE m.user_id = $1 AND m.role = 'OWNER' \
         ORDER BY o.created_at ASC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(exec)
    .await?;
    Ok(row.map(|r| org_from_row(&r)))
}

pub async fn insert_org<'e, E: PgExecutor<'e>>(exec: E, org: &Organization) -> Result<()> {
    sqlx::query(
        "INSERT INTO organizations (id, name, slug, owner_id, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(org.id)
    .bind(&org.name)
    .bind(&org.slug)
    .bind(&org.owner_id)
    .bind(org.created_at)
    .bind(org.updated_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn insert_project<'e, E: PgExecutor<'e>>(exec: E, project: &Project) -> Result<()> {
    sqlx::query(
        "INSERT INTO projects (id, org_id, name, slug, is_default, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(project.id)
    .bind(project.org_id)
    .bind(&project.name)
    .bind(&project.slug)
    .bind(project.is_default)
    .bind(project.created_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn find_default_project<'e, E: PgExecutor<'e>>(exec: E, org_id: Uuid) -> Result<Option<Project>> {
    let row = sqlx::query("SELECT * FROM projects WHERE org_id = $1 AND is_default = true LIMIT 1")
        .bind(org_id)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| project_from_row(&r)))
}

pub async fn insert_membership<'e, E: PgExecutor<'e>>(exec: E, membership: &Membership) -> Result<()> {
    sqlx::query(
        "INSERT INTO memberships (id, org_id, user_id, role, teams, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(membership.id)
    .bind(membership.org_id)
    .bind(&membership.user_id)
    .bind(role_to_str(membership.role))
    .bind(serde_json::to_value(&membership.teams).unwrap_or(Value::Array(vec![])))
    .bind(membership.created_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn find_membership<'e, E: PgExecutor<'e>>(
    exec: E,
    org_id: Uuid,
    user_id: &str,
) -> Result<Option<Membership>> {
    let row = sqlx::query("SELECT * FROM memberships WHERE org_id = $1 AND user_id = $2")
        .bind(org_id)
        .bind(user_id)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| membership_from_row(&r)))
}

/// Builds a fresh `Organization`/default `Project`/OWNER `Membership` triple
/// in memory; callers persist them inside the caller's transaction alongside
/// wallet creation (see `billing::resolve_workspace`).
pub fn new_workspace(name: String, slug: String, owner_id: String) -> (Organization, Project, Membership) {
    let now = Utc::now();
    let org = Organization {
        id: Uuid::new_v4(),
        name,
        slug,
        owner_id: owner_id.clone(),
        created_at: now,
        updated_at: now,
    };
    let project = Project {
        id: Uuid::new_v4(),
        org_id: org.id,
        name: "Default".to_string(),
        slug: "default".to_string(),
        is_default: true,
        created_at: now,
    };
    let membership = Membership {
        id: Uuid::new_v4(),
        org_id: org.id,
        user_id: owner_id,
        role: Role::Owner,
        teams: vec![],
        created_at: now,
    };
    (org, project, membership)
}

pub fn map_err_not_found(e: StoreError, what: &str) -> StoreError {
    match e {
        StoreError::Query(sqlx::Error::RowNotFound) => StoreError::NotFound(what.to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmp_domain::entities::org::{slugify, workspace_name_for_email};

    #[test]
    fn new_workspace_has_consistent_ids() {
        let (org, project, membership) = new_workspace(
            workspace_name_for_email("ada@example.com"),
            slugify("ada@example.com"),
            "ada@example.com".to_string(),
        );
        assert_eq!(project.org_id, org.id);
        assert_eq!(membership.org_id, org.id);
        assert_eq!(membership.role, Role::Owner);
        assert!(project.is_default);
    }
}
