//! Idempotency records: one row per externally-visible, retry-protected
//! side effect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    pub key: String,
    pub response: Value,
    pub created_at: DateTime<Utc>,
}

pub fn provision_key(order_id: &str, offering_id: &str) -> String {
    format!("provision:{order_id}:{offering_id}")
}

pub fn credits_key(order_id: &str) -> String {
    format!("credits:{order_id}")
}

pub fn trial_key(user_id: &str, offering_id: &str) -> String {
    format!("trial:{user_id}:{offering_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_and_stable() {
        assert_eq!(provision_key("O-42", "agent-x"), "provision:O-42:agent-x");
        assert_eq!(credits_key("O-42"), "credits:O-42");
        assert_eq!(trial_key("u1", "agent-x"), "trial:u1:agent-x");
    }
}
