pub mod connector;
pub mod idempotency;
pub mod instance;
pub mod offering;
pub mod org;
pub mod wallet;
