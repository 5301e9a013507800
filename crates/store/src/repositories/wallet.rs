//! Wallets, ledger entries, and reservations — the wallet-scoped critical
//! section described in SPEC_FULL.md §5.

use crate::error::Result;
use chrono::{DateTime, Utc};
use cmp_domain::entities::wallet::{LedgerEntry, LedgerEntryType, Reservation, ReservationStatus, Wallet};
use sqlx::{PgExecutor, Row};
use uuid::Uuid;

fn entry_type_to_str(t: LedgerEntryType) -> &'static str {
    match t {
        LedgerEntryType::Topup => "TOPUP",
        LedgerEntryType::Usage => "USAGE",
        LedgerEntryType::Refund => "REFUND",
        LedgerEntryType::TrialGrant => "TRIAL_GRANT",
        LedgerEntryType::Reservation => "RESERVATION",
        LedgerEntryType::Settlement => "SETTLEMENT",
    }
}

fn entry_type_from_str(s: &str) -> LedgerEntryType {
    match s {
        "USAGE" => LedgerEntryType::Usage,
        "REFUND" => LedgerEntryType::Refund,
        "TRIAL_GRANT" => LedgerEntryType::TrialGrant,
        "RESERVATION" => LedgerEntryType::Reservation,
        "SETTLEMENT" => LedgerEntryType::Settlement,
        _ => LedgerEntryType::Topup,
    }
}

fn reservation_status_to_str(s: ReservationStatus) -> &'static str {
    match s {
        ReservationStatus::Pending => "PENDING",
        ReservationStatus::Settled => "SETTLED",
        ReservationStatus::Expired => "EXPIRED",
        ReservationStatus::Cancelled => "CANCELLED",
    }
}

fn reservation_status_from_str(s: &str) -> ReservationStatus {
    match s {
        "SETTLED" => ReservationStatus::Settled,
        "EXPIRED" => ReservationStatus::Expired,
        "CANCELLED" => ReservationStatus::Cancelled,
        _ => ReservationStatus::Pending,
    }
}

fn wallet_from_row(row: &sqlx::postgres::PgRow) -> Wallet {
    Wallet {
        id: row.get("id"),
        org_id: row.get("org_id"),
        balance: row.get("balance"),
        currency: row.get("currency"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn ledger_from_row(row: &sqlx::postgres::PgRow) -> LedgerEntry {
    LedgerEntry {
        id: row.get("id"),
        wallet_id: row.get("wallet_id"),
        amount: row.get("amount"),
        entry_type: entry_type_from_str(row.get::<String, _>("entry_type").as_str()),
        reference_id: row.get("reference_id"),
        instance_id: row.get("instance_id"),
        metadata: row.get("metadata"),
        created_at: row.get("created_at"),
    }
}

fn reservation_from_row(row: &sqlx::postgres::PgRow) -> Reservation {
    Reservation {
        id: row.get("id"),
        wallet_id: row.get("wallet_id"),
        instance_id: row.get("instance_id"),
        amount: row.get("amount"),
        status: reservation_status_from_str(row.get::<String, _>("status").as_str()),
        created_at: row.get("created_at"),
        settled_at: row.get("settled_at"),
    }
}

pub async fn insert_wallet<'e, E: PgExecutor<'e>>(exec: E, wallet: &Wallet) -> Result<()> {
    sqlx::query(
        "INSERT INTO wallets (id, org_id, balance, currency, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(wallet.id)
    .bind(wallet.org_id)
    .bind(wallet.balance)
    .bind(&wallet.currency)
    .bind(wallet.created_at)
    .bind(wallet.updated_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn find_wallet_by_org<'e, E: PgExecutor<'e>>(exec: E, org_id: Uuid) -> Result<Option<Wallet>> {
    let row = sqlx::query("SELECT * FROM wallets WHERE org_id = $1")
        .bind(org_id)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| wallet_from_row(&r)))
}

pub async fn find_wallet_by_id<'e, E: PgExecutor<'e>>(exec: E, id: Uuid) -> Result<Option<Wallet>> {
    let row = sqlx::query("SELECT * FROM wallets WHERE id = $1")
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| wallet_from_row(&r)))
}

/// `SELECT ... FOR UPDATE`: the row lock that makes the wallet section of
/// §5 serializable. Must be called inside an open transaction.
pub async fn lock_wallet_for_update(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    wallet_id: Uuid,
) -> Result<Wallet> {
    let row = sqlx::query("SELECT * FROM wallets WHERE id = $1 FOR UPDATE")
        .bind(wallet_id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(wallet_from_row(&row))
}

pub async fn set_balance(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    wallet_id: Uuid,
    balance: i64,
    now: DateTime<Utc>,
) -> Result<()> {
    sqlx::query("UPDATE wallets SET balance = $1, updated_at = $2 WHERE id = $3")
        .bind(balance)
        .bind(now)
        .bind(wallet_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn insert_ledger_entry(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    entry: &LedgerEntry,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO ledger_entries (id, wallet_id, amount, entry_type, reference_id, instance_id, metadata, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(entry.id)
    .bind(entry.wallet_id)
    .bind(entry.amount)
    .bind(entry_type_to_str(entry.entry_type))
    .bind(&entry.reference_id)
    .bind(entry.instance_id)
    .bind(&entry.metadata)
    .bind(entry.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn find_ledger_entry_by_reference<'e, E: PgExecutor<'e>>(
    exec: E,
    reference_id: &str,
) -> Result<Option<LedgerEntry>> {
    let row = sqlx::query("SELECT * FROM ledger_entries WHERE reference_id = $1 ORDER BY created_at DESC LIMIT 1")
        .bind(reference_id)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| ledger_from_row(&r)))
}

pub async fn list_ledger_for_wallet<'e, E: PgExecutor<'e>>(exec: E, wallet_id: Uuid) -> Result<Vec<LedgerEntry>> {
    let rows = sqlx::query("SELECT * FROM ledger_entries WHERE wallet_id = $1 ORDER BY created_at DESC")
        .bind(wallet_id)
        .fetch_all(exec)
        .await?;
    Ok(rows.iter().map(ledger_from_row).collect())
}

pub async fn sum_pending_reservations(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    wallet_id: Uuid,
) -> Result<i64> {
    let row = sqlx::query(
        "SELECT COALESCE(SUM(amount), 0)::BIGINT AS total FROM reservations WHERE wallet_id = $1 AND status = 'PENDING'",
    )
    .bind(wallet_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row.get("total"))
}

pub async fn insert_reservation(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    reservation: &Reservation,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO reservations (id, wallet_id, instance_id, amount, status, created_at, settled_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(reservation.id)
    .bind(reservation.wallet_id)
    .bind(reservation.instance_id)
    .bind(reservation.amount)
    .bind(reservation_status_to_str(reservation.status))
    .bind(reservation.created_at)
    .bind(reservation.settled_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn find_reservation<'e, E: PgExecutor<'e>>(exec: E, id: Uuid) -> Result<Option<Reservation>> {
    let row = sqlx::query("SELECT * FROM reservations WHERE id = $1")
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| reservation_from_row(&r)))
}

pub async fn mark_reservation_settled(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<()> {
    sqlx::query("UPDATE reservations SET status = 'SETTLED', settled_at = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
