//! The transactional orchestration layer: authorize/settle, provisioning,
//! top-ups, workspace resolution, and trial start. Everything here runs
//! against a single wallet-scoped or idempotency-scoped transaction per
//! the concurrency model.

use crate::connection::Database;
use crate::error::{Result, StoreError};
use crate::repositories::{idempotency, instance as instance_repo, offering, org, wallet as wallet_repo};
use chrono::Utc;
use cmp_domain::entities::idempotency::IdempotencyRecord;
use cmp_domain::entities::instance::{ApiKey, Instance, InstanceState};
use cmp_domain::entities::org::{slugify, workspace_name_for_email, Organization, Project};
use cmp_domain::entities::wallet::{LedgerEntry, LedgerEntryType, Reservation, ReservationStatus, Wallet};
use cmp_domain::pricing::{price, Usage};
use cmp_domain::{api_key, config_merge, DEFAULT_RUN_BUDGET, TRIAL_CREDITS};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizeResult {
    pub allowed: bool,
    pub reservation_id: Uuid,
    pub budget: i64,
    pub balance: i64,
}

/// §4.1.1. Runs inside a single serializable, wallet-scoped transaction.
pub async fn authorize(db: &Database, instance_id: Uuid, requested_budget: Option<i64>) -> Result<AuthorizeResult> {
    let instance = instance_repo::find_instance_by_id(db.pool(), instance_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("instance {instance_id}")))?;
    let budget = requested_budget.filter(|b| *b > 0).unwrap_or(DEFAULT_RUN_BUDGET);

    let mut tx = db.pool().begin().await?;
    let wallet = wallet_repo::find_wallet_by_org(&mut *tx, instance.org_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("wallet for org {}", instance.org_id)))?;
    let wallet = wallet_repo::lock_wallet_for_update(&mut tx, wallet.id).await?;
    let pending = wallet_repo::sum_pending_reservations(&mut tx, wallet.id).await?;
    let available = wallet.balance - pending;
    let now = Utc::now();

    let result = if available < budget {
        let reservation = Reservation {
            id: Uuid::new_v4(),
            wallet_id: wallet.id,
            instance_id,
            amount: 0,
            status: ReservationStatus::Cancelled,
            created_at: now,
            settled_at: None,
        };
        wallet_repo::insert_reservation(&mut tx, &reservation).await?;
        AuthorizeResult {
            allowed: false,
            reservation_id: reservation.id,
            budget,
            balance: wallet.balance,
        }
    } else {
        let reservation = Reservation {
            id: Uuid::new_v4(),
            wallet_id: wallet.id,
            instance_id,
            amount: budget,
            status: ReservationStatus::Pending,
            created_at: now,
            settled_at: None,
        };
        wallet_repo::insert_reservation(&mut tx, &reservation).await?;
        AuthorizeResult {
            allowed: true,
            reservation_id: reservation.id,
            budget,
            balance: wallet.balance,
        }
    };
    tx.commit().await?;

    if !result.allowed {
        tracing::warn!(instance_id = %instance_id, budget, available, "authorize denied: insufficient credits");
    }
    Ok(result)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleResult {
    pub debited: i64,
    pub balance: i64,
    pub ledger_entry_id: Uuid,
    pub status: String,
}

/// §4.1.2. Idempotent once the reservation has left PENDING.
pub async fn settle(
    db: &Database,
    reservation_id: Uuid,
    _instance_id: Uuid,
    usage: Option<Usage>,
) -> Result<SettleResult> {
    let reservation = wallet_repo::find_reservation(db.pool(), reservation_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("reservation {reservation_id}")))?;

    if reservation.status != ReservationStatus::Pending {
        tracing::debug!(reservation_id = %reservation_id, "settle: idempotent replay");
        let wallet = wallet_repo::find_wallet_by_id(db.pool(), reservation.wallet_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("wallet {}", reservation.wallet_id)))?;
        let entry = wallet_repo::find_ledger_entry_by_reference(db.pool(), &reservation_id.to_string()).await?;
        return Ok(SettleResult {
            debited: 0,
            balance: wallet.balance,
            ledger_entry_id: entry.map(|e| e.id).unwrap_or(Uuid::nil()),
            status: "settled".to_string(),
        });
    }

    let usage = usage.unwrap_or_default();
    let debited = price(&usage).min(reservation.amount);
    let now = Utc::now();

    let mut tx = db.pool().begin().await?;
    let wallet = wallet_repo::lock_wallet_for_update(&mut tx, reservation.wallet_id).await?;
    let new_balance = wallet.balance - debited;
    wallet_repo::set_balance(&mut tx, wallet.id, new_balance, now).await?;

    let entry = LedgerEntry {
        id: Uuid::new_v4(),
        wallet_id: wallet.id,
        amount: -debited,
        entry_type: LedgerEntryType::Usage,
        reference_id: reservation_id.to_string(),
        instance_id: Some(reservation.instance_id),
        metadata: json!({ "usage": usage }),
        created_at: now,
    };
    wallet_repo::insert_ledger_entry(&mut tx, &entry).await?;
    wallet_repo::mark_reservation_settled(&mut tx, reservation_id, now).await?;
    tx.commit().await?;

    Ok(SettleResult {
        debited,
        balance: new_balance,
        ledger_entry_id: entry.id,
        status: "settled".to_string(),
    })
}

/// Idempotent on `idempotency_key` alone, independent of any order.
pub async fn wallet_topup(db: &Database, wallet_id: Uuid, credits_amount: i64, idempotency_key: &str) -> Result<Wallet> {
    if let Some(record) = idempotency::find_by_key(db.pool(), idempotency_key).await? {
        tracing::debug!(key = idempotency_key, "wallet_topup: idempotent replay");
        let balance: i64 = record.response["new_balance"].as_i64().unwrap_or(0);
        let mut wallet = wallet_repo::find_wallet_by_id(db.pool(), wallet_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("wallet {wallet_id}")))?;
        wallet.balance = balance;
        return Ok(wallet);
    }

    let now = Utc::now();
    let mut tx = db.pool().begin().await?;
    let wallet = wallet_repo::lock_wallet_for_update(&mut tx, wallet_id).await?;
    let new_balance = wallet.balance + credits_amount;
    wallet_repo::set_balance(&mut tx, wallet.id, new_balance, now).await?;

    let entry = LedgerEntry {
        id: Uuid::new_v4(),
        wallet_id: wallet.id,
        amount: credits_amount,
        entry_type: LedgerEntryType::Topup,
        reference_id: idempotency_key.to_string(),
        instance_id: None,
        metadata: json!({}),
        created_at: now,
    };
    wallet_repo::insert_ledger_entry(&mut tx, &entry).await?;

    let record = IdempotencyRecord {
        key: idempotency_key.to_string(),
        response: json!({ "wallet_id": wallet.id, "credits_added": credits_amount, "new_balance": new_balance }),
        created_at: now,
    };
    idempotency::insert_if_absent(&mut tx, &record).await?;
    tx.commit().await?;

    let mut wallet = wallet;
    wallet.balance = new_balance;
    Ok(wallet)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCreditsResult {
    pub wallet_id: Uuid,
    pub credits_added: i64,
    pub new_balance: i64,
}

/// §4.1.4.
pub async fn add_credits(db: &Database, order_id: &str, user_email: &str, credit_amount: i64) -> Result<AddCreditsResult> {
    let key = cmp_domain::entities::idempotency::credits_key(order_id);
    if let Some(record) = idempotency::find_by_key(db.pool(), &key).await? {
        tracing::debug!(key = %key, "add_credits: idempotent replay");
        return Ok(serde_json::from_value(record.response)?);
    }

    let (_org, _project, wallet) = resolve_workspace(db, user_email).await?;
    let now = Utc::now();

    let mut tx = db.pool().begin().await?;
    let wallet = wallet_repo::lock_wallet_for_update(&mut tx, wallet.id).await?;
    let new_balance = wallet.balance + credit_amount;
    wallet_repo::set_balance(&mut tx, wallet.id, new_balance, now).await?;

    let entry = LedgerEntry {
        id: Uuid::new_v4(),
        wallet_id: wallet.id,
        amount: credit_amount,
        entry_type: LedgerEntryType::Topup,
        reference_id: key.clone(),
        instance_id: None,
        metadata: json!({ "source": "commerce", "order_id": order_id }),
        created_at: now,
    };
    wallet_repo::insert_ledger_entry(&mut tx, &entry).await?;

    let result = AddCreditsResult {
        wallet_id: wallet.id,
        credits_added: credit_amount,
        new_balance,
    };
    let record = IdempotencyRecord {
        key,
        response: serde_json::to_value(&result)?,
        created_at: now,
    };
    idempotency::insert_if_absent(&mut tx, &record).await?;
    tx.commit().await?;

    Ok(result)
}

/// §4.1.5. Resolve-or-create the workspace owned by `user_email` (or any
/// stable provider user identifier).
pub async fn resolve_workspace(db: &Database, user_email: &str) -> Result<(Organization, Project, Wallet)> {
    if let Some(existing_org) = org::find_owned_org(db.pool(), user_email).await? {
        let project = org::find_default_project(db.pool(), existing_org.id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("default project for org {}", existing_org.id)))?;
        let wallet = wallet_repo::find_wallet_by_org(db.pool(), existing_org.id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("wallet for org {}", existing_org.id)))?;
        return Ok((existing_org, project, wallet));
    }

    let (new_org, project, membership) = org::new_workspace(
        workspace_name_for_email(user_email),
        slugify(user_email),
        user_email.to_string(),
    );
    let now = Utc::now();
    let wallet = Wallet {
        id: Uuid::new_v4(),
        org_id: new_org.id,
        balance: TRIAL_CREDITS,
        currency: "CREDITS".to_string(),
        created_at: now,
        updated_at: now,
    };

    let mut tx = db.pool().begin().await?;
    org::insert_org(&mut *tx, &new_org).await?;
    org::insert_project(&mut *tx, &project).await?;
    org::insert_membership(&mut *tx, &membership).await?;
    wallet_repo::insert_wallet(&mut *tx, &wallet).await?;
    let grant = LedgerEntry {
        id: Uuid::new_v4(),
        wallet_id: wallet.id,
        amount: TRIAL_CREDITS,
        entry_type: LedgerEntryType::TrialGrant,
        reference_id: format!("workspace:{}", new_org.id),
        instance_id: None,
        metadata: json!({ "reason": "workspace_created" }),
        created_at: now,
    };
    wallet_repo::insert_ledger_entry(&mut tx, &grant).await?;
    tx.commit().await?;

    Ok((new_org, project, wallet))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionInstanceRequest {
    pub order_id: String,
    pub user_email: String,
    pub offering_id: String,
    pub plan_id: String,
    pub metadata: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionResult {
    pub instance_id: Uuid,
    pub api_key: Option<String>,
    pub status: String,
}

/// §4.1.3.
pub async fn provision_instance(db: &Database, req: ProvisionInstanceRequest) -> Result<ProvisionResult> {
    let key = cmp_domain::entities::idempotency::provision_key(&req.order_id, &req.offering_id);
    if let Some(record) = idempotency::find_by_key(db.pool(), &key).await? {
        tracing::debug!(key = %key, "provision_instance: idempotent replay");
        return Ok(serde_json::from_value(record.response)?);
    }

    let (org, project, _wallet) = resolve_workspace(db, &req.user_email).await?;

    let cp_offering_slug = req.metadata.get("cp_offering_id").and_then(Value::as_str);
    let product_name = req.metadata.get("product_name").and_then(Value::as_str);
    let offering = offering::find_offering_for_provisioning(
        db.pool(),
        cp_offering_slug,
        Some(req.offering_id.as_str()),
        product_name,
    )
    .await?
    .ok_or_else(|| StoreError::NotFound(format!("offering for product {}", req.offering_id)))?;

    let version = offering::newest_version(db.pool(), offering.id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("version for offering {}", offering.id)))?;

    let plan = match offering::find_plan_by_variant(db.pool(), offering.id, &req.plan_id).await? {
        Some(plan) => plan,
        None => offering::find_cheapest_plan(db.pool(), offering.id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("plan for offering {}", offering.id)))?,
    };

    let effective_config = config_merge::effective_config(&version.defaults, &plan.limits, &json!({}));
    let now = Utc::now();
    let instance = Instance {
        id: Uuid::new_v4(),
        offering_version_id: version.id,
        org_id: org.id,
        project_id: project.id,
        plan_id: plan.id,
        name: format!("{} instance", offering.name),
        state: InstanceState::Active,
        overrides: json!({}),
        effective_config,
        idempotency_key: Some(key.clone()),
        created_at: now,
        updated_at: now,
    };

    let generated = api_key::generate();
    let api_key_row = ApiKey {
        id: Uuid::new_v4(),
        instance_id: instance.id,
        name: format!("Default Key — Order {}", req.order_id),
        prefix: generated.prefix.clone(),
        hash: generated.hash.clone(),
        last_used_at: None,
        expires_at: None,
        is_active: true,
        created_at: now,
    };

    let result = ProvisionResult {
        instance_id: instance.id,
        api_key: Some(generated.full_key.clone()),
        status: "active".to_string(),
    };

    let mut tx = db.pool().begin().await?;
    instance_repo::insert_instance(&mut *tx, &instance).await?;
    instance_repo::insert_api_key(&mut *tx, &api_key_row).await?;
    let record = IdempotencyRecord {
        key,
        response: serde_json::to_value(&result)?,
        created_at: now,
    };
    idempotency::insert_if_absent(&mut tx, &record).await?;
    tx.commit().await?;

    Ok(result)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialResult {
    pub instance_id: Uuid,
    pub api_key: String,
    pub status: String,
    /// `TRIAL_CREDITS` on the call that actually grants the trial wallet
    /// balance, 0 on an idempotent replay of an already-started trial.
    pub trial_credits_granted: i64,
}

/// §4.1.6.
pub async fn start_trial(db: &Database, user_id: &str, product_slug: &str) -> Result<TrialResult> {
    let (org, project, wallet) = resolve_workspace(db, user_id).await?;

    let offering = offering::find_offering_for_trial(db.pool(), product_slug)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("offering {product_slug}")))?;
    let version = offering::newest_version(db.pool(), offering.id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("version for offering {}", offering.id)))?;
    let plan = offering::find_cheapest_plan(db.pool(), offering.id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("plan for offering {}", offering.id)))?;

    let key = cmp_domain::entities::idempotency::trial_key(user_id, &offering.id.to_string());
    if let Some(existing) = instance_repo::find_instance_by_idempotency_key(db.pool(), &key).await? {
        let keys = instance_repo::list_api_keys_for_instance(db.pool(), existing.id).await?;
        let api_key_display = keys.first().map(|k| k.prefix.clone()).unwrap_or_default();
        return Ok(TrialResult {
            instance_id: existing.id,
            api_key: api_key_display,
            status: "active".to_string(),
            trial_credits_granted: 0,
        });
    }

    let now = Utc::now();
    let effective_config = config_merge::effective_config(&version.defaults, &plan.limits, &json!({}));
    let instance = Instance {
        id: Uuid::new_v4(),
        offering_version_id: version.id,
        org_id: org.id,
        project_id: project.id,
        plan_id: plan.id,
        name: format!("{} trial", offering.name),
        state: InstanceState::Active,
        overrides: json!({}),
        effective_config,
        idempotency_key: Some(key),
        created_at: now,
        updated_at: now,
    };
    let generated = api_key::generate();
    let api_key_row = ApiKey {
        id: Uuid::new_v4(),
        instance_id: instance.id,
        name: "Trial Key".to_string(),
        prefix: generated.prefix.clone(),
        hash: generated.hash.clone(),
        last_used_at: None,
        expires_at: None,
        is_active: true,
        created_at: now,
    };

    let mut tx = db.pool().begin().await?;
    instance_repo::insert_instance(&mut *tx, &instance).await?;
    instance_repo::insert_api_key(&mut *tx, &api_key_row).await?;

    let trial_credits_granted = if wallet.balance == 0 {
        let wallet_locked = wallet_repo::lock_wallet_for_update(&mut tx, wallet.id).await?;
        let new_balance = wallet_locked.balance + TRIAL_CREDITS;
        wallet_repo::set_balance(&mut tx, wallet.id, new_balance, now).await?;
        let grant = LedgerEntry {
            id: Uuid::new_v4(),
            wallet_id: wallet.id,
            amount: TRIAL_CREDITS,
            entry_type: LedgerEntryType::TrialGrant,
            reference_id: format!("trial:{}", instance.id),
            instance_id: Some(instance.id),
            metadata: json!({}),
            created_at: now,
        };
        wallet_repo::insert_ledger_entry(&mut tx, &grant).await?;
        TRIAL_CREDITS
    } else {
        0
    };
    tx.commit().await?;

    Ok(TrialResult {
        instance_id: instance.id,
        api_key: generated.full_key,
        status: "active".to_string(),
        trial_credits_granted,
    })
}

/// §4.1.7. Returns `None` on any failure to validate rather than an error —
/// validation is a lookup, not a fallible operation.
pub async fn validate_api_key(db: &Database, candidate: &str) -> Result<Option<Instance>> {
    if !api_key::looks_like_api_key(candidate) {
        return Ok(None);
    }
    let prefix = api_key::prefix_of(candidate);
    let hash = api_key::hash_key(candidate);
    let candidates = instance_repo::find_active_api_keys_by_prefix(db.pool(), &prefix).await?;
    let now = Utc::now();

    for key in candidates {
        if key.hash == hash && key.is_usable(now) {
            let Some(instance) = instance_repo::find_instance_by_id(db.pool(), key.instance_id).await? else {
                continue;
            };
            if instance.state != InstanceState::Active {
                continue;
            }
            instance_repo::touch_last_used(db.pool(), key.id, now).await?;
            return Ok(Some(instance));
        }
    }
    Ok(None)
}
