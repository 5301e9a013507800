//! Error type for the Control Plane client SDK.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("upstream error: {endpoint}, status {status}, body: {body}")]
    Upstream {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("jwks: key id {0} not found after refresh")]
    UnknownKid(String),

    #[error("jwt validation failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("request timed out after {0}s")]
    Timeout(u64),
}

impl ClientError {
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;
        match self {
            ClientError::Request(_) | ClientError::Timeout(_) => Level::WARN,
            ClientError::Upstream { status, .. } if *status >= 500 => Level::WARN,
            ClientError::Upstream { .. } => Level::INFO,
            ClientError::Decode(_) => Level::ERROR,
            ClientError::UnknownKid(_) | ClientError::Jwt(_) => Level::WARN,
        }
    }

    /// Mirrors the indexer's retry policy: network-level failures and 5xx
    /// upstream responses are worth retrying, 4xx are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Request(e) => e.is_timeout() || e.is_connect(),
            ClientError::Timeout(_) => true,
            ClientError::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
