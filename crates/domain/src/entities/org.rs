//! Organizations, projects, and memberships.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Viewer,
}

impl Role {
    /// OWNER and ADMIN may mutate wallet top-ups and org settings.
    pub fn can_manage_wallet(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub slug: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: Uuid,
    pub org_id: Uuid,
    pub user_id: String,
    pub role: Role,
    pub teams: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Derives an org slug from a display name: lowercase, non-alphanumerics to
/// hyphens, collapsed and trimmed.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for ch in name.chars().flat_map(|c| c.to_lowercase()) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Workspace name for an auto-created organization, derived from the
/// local part of an email address.
pub fn workspace_name_for_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    format!("{}'s Workspace", local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Acme Corp"), "acme-corp");
        assert_eq!(slugify("  Weird!! Name__"), "weird-name");
        assert_eq!(slugify("already-slug"), "already-slug");
    }

    #[test]
    fn workspace_name_uses_local_part() {
        assert_eq!(workspace_name_for_email("ada@example.com"), "ada's Workspace");
        assert_eq!(workspace_name_for_email("no-at-sign"), "no-at-sign's Workspace");
    }

    #[test]
    fn role_wallet_permissions() {
        assert!(Role::Owner.can_manage_wallet());
        assert!(Role::Admin.can_manage_wallet());
        assert!(!Role::Member.can_manage_wallet());
        assert!(!Role::Viewer.can_manage_wallet());
    }
}
