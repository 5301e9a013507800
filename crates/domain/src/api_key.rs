//! Generation and hashing for `cmp_sk_…` API keys (§3, §4.1.7).

use crate::entities::instance::API_KEY_PREFIX;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// A freshly minted key: the full secret (shown to the caller exactly once)
/// plus the `prefix`/`hash` pair that gets persisted.
pub struct GeneratedKey {
    pub full_key: String,
    pub prefix: String,
    pub hash: String,
}

const PREFIX_LEN: usize = 12;

/// `cmp_sk_<32 bytes of URL-safe base64 entropy>`.
pub fn generate() -> GeneratedKey {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let entropy = URL_SAFE_NO_PAD.encode(bytes);
    let full_key = format!("{API_KEY_PREFIX}{entropy}");
    let prefix = full_key.chars().take(PREFIX_LEN).collect();
    let hash = hash_key(&full_key);
    GeneratedKey {
        full_key,
        prefix,
        hash,
    }
}

/// SHA-256 of the full key, rendered as 64 lowercase hex characters.
pub fn hash_key(full_key: &str) -> String {
    let digest = Sha256::digest(full_key.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn prefix_of(full_key: &str) -> String {
    full_key.chars().take(PREFIX_LEN).collect()
}

/// Cheap pre-check before hitting the store: does `candidate` even look like
/// one of our keys?
pub fn looks_like_api_key(candidate: &str) -> bool {
    candidate.starts_with(API_KEY_PREFIX) && candidate.len() > API_KEY_PREFIX.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_key_has_expected_shape() {
        let key = generate();
        assert!(key.full_key.starts_with(API_KEY_PREFIX));
        assert_eq!(key.prefix.len(), PREFIX_LEN);
        assert_eq!(key.hash.len(), 64);
        assert_eq!(key.hash, hash_key(&key.full_key));
    }

    #[test]
    fn two_generated_keys_differ() {
        let a = generate();
        let b = generate();
        assert_ne!(a.full_key, b.full_key);
    }

    #[test]
    fn looks_like_api_key_rejects_foreign_strings() {
        assert!(looks_like_api_key("cmp_sk_abc123"));
        assert!(!looks_like_api_key("Bearer eyJhbGciOi"));
        assert!(!looks_like_api_key("cmp_sk_"));
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash_key("cmp_sk_same"), hash_key("cmp_sk_same"));
        assert_ne!(hash_key("cmp_sk_a"), hash_key("cmp_sk_b"));
    }
}
