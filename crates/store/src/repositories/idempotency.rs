//! Idempotency records. A row existing for a key means the side effect it
//! names has already run; callers replay the stored `response` instead of
//! repeating it.

use crate::error::Result;
use cmp_domain::entities::idempotency::IdempotencyRecord;
use sqlx::{PgExecutor, Row};

fn record_from_row(row: &sqlx::postgres::PgRow) -> IdempotencyRecord {
    IdempotencyRecord {
        key: row.get("key"),
        response: row.get("response"),
        created_at: row.get("created_at"),
    }
}

pub async fn find_by_key<'e, E: PgExecutor<'e>>(exec: E, key: &str) -> Result<Option<IdempotencyRecord>> {
    let row = sqlx::query("SELECT * FROM idempotency_records WHERE key = $1")
        .bind(key)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|r| record_from_row(&r)))
}

/// Insert-if-absent. Relies on `key` being the primary key: a concurrent
/// racer gets a unique-violation, which `StoreError` classifies as Conflict
/// so callers can re-read and replay instead of retrying the insert.
pub async fn insert_if_absent<'e, E: PgExecutor<'e>>(exec: E, record: &IdempotencyRecord) -> Result<()> {
    sqlx::query("INSERT INTO idempotency_records (key, response, created_at) VALUES ($1, $2, $3)")
        .bind(&record.key)
        .bind(&record.response)
        .bind(record.created_at)
        .execute(exec)
        .await?;
    Ok(())
}
