//! Shared domain types for the credit marketplace platform: entities,
//! pricing, the `effective_config` merge, API-key generation, and the
//! cross-service error taxonomy.
//!
//! This crate has no I/O of its own; `cmp-store` and `cmp-client` build on
//! top of it for persistence and transport respectively.

pub mod api_key;
pub mod config_merge;
pub mod entities;
pub mod error;
pub mod pricing;

/// Fallback run budget (in credits) used by `authorize` when the caller did
/// not request a specific budget, or requested zero/negative.
pub const DEFAULT_RUN_BUDGET: i64 = 10;

/// Credits granted to a freshly created wallet (workspace auto-creation,
/// trial bootstrap).
pub const TRIAL_CREDITS: i64 = 100;

/// Idempotency-store TTL horizon used by the Provisioner's in-memory replay
/// guard (§4.2); defense in depth on top of the Control Plane's own
/// idempotency rows.
pub const IDEMPOTENCY_TTL_SECS: i64 = 24 * 60 * 60;
