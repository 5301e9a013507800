//! Instances and API keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceState {
    Requested,
    Provisioning,
    Active,
    Paused,
    Terminated,
}

impl InstanceState {
    /// REQUESTED -> PROVISIONING -> ACTIVE; ACTIVE <-> PAUSED; any -> TERMINATED.
    pub fn can_transition_to(self, next: InstanceState) -> bool {
        use InstanceState::*;
        match (self, next) {
            (_, Terminated) => true,
            (Requested, Provisioning) => true,
            (Provisioning, Active) => true,
            (Active, Paused) => true,
            (Paused, Active) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub id: Uuid,
    pub offering_version_id: Uuid,
    pub org_id: Uuid,
    pub project_id: Uuid,
    pub plan_id: Uuid,
    pub name: String,
    pub state: InstanceState,
    pub overrides: Value,
    pub effective_config: Value,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: Uuid,
    pub instance_id: Uuid,
    pub name: String,
    pub prefix: String,
    pub hash: String,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub const API_KEY_PREFIX: &str = "cmp_sk_";

impl ApiKey {
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.map(|exp| exp > now).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_state_transitions() {
        assert!(InstanceState::Requested.can_transition_to(InstanceState::Provisioning));
        assert!(InstanceState::Provisioning.can_transition_to(InstanceState::Active));
        assert!(InstanceState::Active.can_transition_to(InstanceState::Paused));
        assert!(InstanceState::Paused.can_transition_to(InstanceState::Active));
        assert!(InstanceState::Active.can_transition_to(InstanceState::Terminated));
        assert!(!InstanceState::Requested.can_transition_to(InstanceState::Active));
        assert!(!InstanceState::Terminated.can_transition_to(InstanceState::Active));
    }

    #[test]
    fn api_key_usable_respects_expiry_and_active_flag() {
        let now = Utc::now();
        let mut key = ApiKey {
            id: Uuid::nil(),
            instance_id: Uuid::nil(),
            name: "k".into(),
            prefix: "abc".into(),
            hash: "hash".into(),
            last_used_at: None,
            expires_at: None,
            is_active: true,
            created_at: now,
        };
        assert!(key.is_usable(now));
        key.is_active = false;
        assert!(!key.is_usable(now));
        key.is_active = true;
        key.expires_at = Some(now - chrono::Duration::seconds(1));
        assert!(!key.is_usable(now));
    }
}
