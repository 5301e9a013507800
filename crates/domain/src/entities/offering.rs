//! Catalog entities: offerings, immutable versions, and plans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OfferingCategory {
    Agent,
    App,
    Assistant,
    Automation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OfferingStatus {
    Draft,
    Published,
    Paused,
    Eos,
    Eol,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offering {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub category: OfferingCategory,
    pub status: OfferingStatus,
    pub commerce_product_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Offering {
    /// Public catalog listings only ever show PUBLISHED offerings.
    pub fn is_publicly_listed(&self) -> bool {
        self.status == OfferingStatus::Published
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferingVersion {
    pub id: Uuid,
    pub offering_id: Uuid,
    pub version_label: String,
    /// Object-store key plus a 64-hex digest, e.g. `flows/agent-x/v3:ab12...`.
    pub artifact_ref: String,
    pub capabilities: Vec<String>,
    pub defaults: Value,
    pub status: OfferingStatus,
    pub created_at: DateTime<Utc>,
}

impl OfferingVersion {
    /// I6: a version whose status is no longer DRAFT is frozen.
    pub fn is_mutable(&self) -> bool {
        self.status == OfferingStatus::Draft
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillingPeriod {
    Monthly,
    Yearly,
    OneTime,
    Usage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: Uuid,
    pub offering_id: Uuid,
    pub name: String,
    pub slug: String,
    pub billing_period: BillingPeriod,
    pub price_credits: i64,
    pub included_credits: i64,
    pub limits: Value,
    pub is_default: bool,
    pub is_trial: bool,
    pub commerce_variant_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Picks the cheapest plan of an offering by `price_credits`, breaking ties
/// by creation order (earliest first) for determinism.
pub fn cheapest_plan(plans: &[Plan]) -> Option<&Plan> {
    plans
        .iter()
        .min_by(|a, b| a.price_credits.cmp(&b.price_credits).then(a.created_at.cmp(&b.created_at)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn plan(price: i64, label: &str) -> Plan {
        Plan {
            id: Uuid::nil(),
            offering_id: Uuid::nil(),
            name: label.to_string(),
            slug: label.to_string(),
            billing_period: BillingPeriod::Monthly,
            price_credits: price,
            included_credits: 0,
            limits: Value::Null,
            is_default: false,
            is_trial: false,
            commerce_variant_id: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn cheapest_plan_picks_lowest_price() {
        let plans = vec![plan(500, "pro"), plan(0, "free"), plan(100, "starter")];
        assert_eq!(cheapest_plan(&plans).unwrap().slug, "free");
    }

    #[test]
    fn cheapest_plan_none_when_empty() {
        assert!(cheapest_plan(&[]).is_none());
    }

    #[test]
    fn offering_publicly_listed_only_when_published() {
        let mut o = Offering {
            id: Uuid::nil(),
            name: "Agent X".into(),
            slug: "agent-x".into(),
            category: OfferingCategory::Agent,
            status: OfferingStatus::Draft,
            commerce_product_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!o.is_publicly_listed());
        o.status = OfferingStatus::Published;
        assert!(o.is_publicly_listed());
    }
}
