//! Error types for the store.

use cmp_domain::error::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migration(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("insufficient credits")]
    InsufficientCredits,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Conflict(_) => ErrorKind::Conflict,
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::InsufficientCredits => ErrorKind::InsufficientCredits,
            StoreError::Query(e) => classify_sqlx(e),
            StoreError::Connection(_) | StoreError::Migration(_) | StoreError::Config(_)
            | StoreError::Serialization(_) => ErrorKind::Internal,
        }
    }

    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;
        match self {
            StoreError::Connection(_) | StoreError::Migration(_) => Level::ERROR,
            StoreError::Config(_) | StoreError::Serialization(_) => Level::ERROR,
            StoreError::Query(_) => Level::WARN,
            StoreError::NotFound(_) => Level::DEBUG,
            StoreError::Conflict(_) | StoreError::Validation(_) => Level::WARN,
            StoreError::InsufficientCredits => Level::INFO,
        }
    }
}

fn classify_sqlx(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::RowNotFound => ErrorKind::NotFound,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => ErrorKind::Conflict,
        _ => ErrorKind::Internal,
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
