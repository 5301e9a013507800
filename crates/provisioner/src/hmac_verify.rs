//! Webhook signature verification (§4.2 step 1). Constant-time compare via
//! `Mac::verify_slice`; an empty configured secret skips verification
//! entirely, which is a development-mode escape hatch and always logged.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub fn verify(secret: &str, body: &[u8], signature_hex: &str) -> bool {
    if secret.is_empty() {
        tracing::warn!("webhook signature verification skipped: no secret configured");
        return true;
    }
    let Ok(signature) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_matching_signature() {
        let body = b"{\"order_id\":\"o-1\"}";
        let sig = sign("shared-secret", body);
        assert!(verify("shared-secret", body, &sig));
    }

    #[test]
    fn rejects_tampered_body() {
        let sig = sign("shared-secret", b"original");
        assert!(!verify("shared-secret", b"tampered", &sig));
    }

    #[test]
    fn rejects_wrong_secret() {
        let sig = sign("shared-secret", b"body");
        assert!(!verify("other-secret", b"body", &sig));
    }

    #[test]
    fn empty_secret_skips_verification() {
        assert!(verify("", b"anything", "not-even-hex"));
    }

    #[test]
    fn rejects_non_hex_signature() {
        assert!(!verify("shared-secret", b"body", "not-hex!!"));
    }
}
