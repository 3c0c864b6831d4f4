//! Webhook subscription handshake and payload signatures.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Header Meta puts the payload signature in.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

type HmacSha256 = Hmac<Sha256>;

/// Check a `GET` subscription request.
///
/// Returns the challenge to echo back when `mode` is `subscribe` and the
/// token matches, `None` otherwise. An unset expected token never matches.
pub fn verify_subscription(
    mode: Option<&str>,
    token: Option<&str>,
    challenge: Option<&str>,
    expected_token: &str,
) -> Option<String> {
    if expected_token.is_empty() {
        return None;
    }
    if mode == Some("subscribe") && token == Some(expected_token) {
        return Some(challenge.unwrap_or_default().to_string());
    }
    None
}

/// Verify an `X-Hub-Signature-256` header (`sha256=<hex>`) against the raw body.
pub fn verify_signature(app_secret: &str, signature_header: Option<&str>, body: &[u8]) -> bool {
    let signature = signature_header.unwrap_or("").trim();
    let signature = signature
        .strip_prefix("sha256=")
        .unwrap_or(signature)
        .trim();
    if signature.is_empty() {
        return false;
    }
    let Ok(signature_bytes) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(app_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature_bytes).is_ok()
}

/// Compute the header value Meta would send for `body`.
pub fn sign(app_secret: &str, body: &[u8]) -> String {
    // HMAC accepts keys of any length.
    let mut mac = match HmacSha256::new_from_slice(app_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_accepts_matching_token() {
        let challenge =
            verify_subscription(Some("subscribe"), Some("secret"), Some("12345"), "secret");
        assert_eq!(challenge.as_deref(), Some("12345"));
    }

    #[test]
    fn test_subscription_rejects() {
        assert!(verify_subscription(Some("subscribe"), Some("wrong"), Some("1"), "secret").is_none());
        assert!(verify_subscription(Some("unsubscribe"), Some("secret"), Some("1"), "secret").is_none());
        assert!(verify_subscription(None, None, None, "secret").is_none());
        assert!(verify_subscription(Some("subscribe"), Some(""), Some("1"), "").is_none());
    }

    #[test]
    fn test_signature_round_trip() {
        let body = br#"{"object":"page"}"#;
        let header = sign("app-secret", body);
        assert!(header.starts_with("sha256="));
        assert!(verify_signature("app-secret", Some(&header), body));
        // Header without the prefix is tolerated.
        assert!(verify_signature(
            "app-secret",
            header.strip_prefix("sha256="),
            body
        ));
    }

    #[test]
    fn test_signature_mismatch() {
        let body = br#"{"object":"page"}"#;
        let header = sign("app-secret", body);
        assert!(!verify_signature("other-secret", Some(&header), body));
        assert!(!verify_signature("app-secret", Some(&header), b"tampered"));
        assert!(!verify_signature("app-secret", None, body));
        assert!(!verify_signature("app-secret", Some("sha256=zz"), body));
    }
}
