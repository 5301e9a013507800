//! Connector bindings: named links from a project to an external API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConnectorBindingStatus {
    Active,
    Revoked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorBinding {
    pub id: Uuid,
    pub org_id: Uuid,
    pub project_id: Uuid,
    pub connector_id: String,
    /// Dispatch kind for the Connector Gateway: `http`, `mcp`, or `oauth2`.
    pub connector_type: String,
    pub display_name: String,
    pub secret_path: String,
    /// Non-secret dispatch config (tool routes, server/token URLs); shape
    /// depends on `connector_type`.
    pub config: serde_json::Value,
    pub status: ConnectorBindingStatus,
    pub created_at: DateTime<Utc>,
}

/// `{mount}/{org_id}/{project_id}/{connector_id}/{binding_id}`.
pub fn secret_path(mount: &str, org_id: Uuid, project_id: Uuid, connector_id: &str, binding_id: Uuid) -> String {
    format!("{mount}/{org_id}/{project_id}/{connector_id}/{binding_id}")
}

/// Masks a secret value for display: first two and last two characters kept,
/// the middle replaced by stars; very short values collapse to `****`.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    let stars = "*".repeat(chars.len() - 4);
    format!("{head}{stars}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_path_template() {
        let org = Uuid::nil();
        let project = Uuid::nil();
        let binding = Uuid::nil();
        let path = secret_path("secret/cmp", org, project, "slack", binding);
        assert!(path.starts_with("secret/cmp/"));
        assert!(path.ends_with(&binding.to_string()));
    }

    #[test]
    fn mask_secret_short_values() {
        assert_eq!(mask_secret(""), "****");
        assert_eq!(mask_secret("ab"), "****");
        assert_eq!(mask_secret("abcd"), "****");
    }

    #[test]
    fn mask_secret_long_values() {
        assert_eq!(mask_secret("sk-ABCDEFGHIJ"), "sk*********IJ");
        assert_eq!(mask_secret("abcdefgh"), "ab****gh");
    }
}
