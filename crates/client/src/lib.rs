//! SDK for talking to the Control Plane's service-to-service endpoints,
//! plus the shared JWKS cache used by every service that validates OIDC
//! bearer tokens.

pub mod client;
pub mod error;
pub mod jwks;
pub mod retry;
pub mod types;

pub use client::ControlPlaneClient;
pub use error::{ClientError, Result};
pub use jwks::JwksCache;
