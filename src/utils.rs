//! Shared helpers: identifier generation and validation.
//!
//! Identifiers follow the collector's wire format: a type prefix plus a
//! URL-safe base64 encoding of random bytes (no padding).

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;

/// URL-safe random token with at least `bytes` bytes of entropy
pub fn random_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill(buf.as_mut_slice());
    URL_SAFE_NO_PAD.encode(&buf)
}

/// New site identifier: `site_` prefix signals the token type
pub fn new_site_id() -> String {
    format!("site_{}", random_token(12))
}

/// New hit identifier
pub fn new_hit_id() -> String {
    format!("h_{}", random_token(16))
}

/// Identifiers are URL-safe tokens; reject anything else before it reaches
/// a storage key position.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_token_is_url_safe() {
        let token = random_token(12);
        assert!(token.len() >= 16); // 12 bytes -> 16 base64 chars
        assert!(
            token
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        );
    }

    #[test]
    fn test_site_id_prefix() {
        let id = new_site_id();
        assert!(id.starts_with("site_"));
        assert!(is_valid_id(&id));
    }

    #[test]
    fn test_hit_id_prefix() {
        let id = new_hit_id();
        assert!(id.starts_with("h_"));
        assert!(is_valid_id(&id));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = random_token(16);
        let b = random_token(16);
        assert_ne!(a, b);
    }

    #[test]
    fn test_is_valid_id_rejects_bad_input() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("has space"));
        assert!(!is_valid_id("semi;colon"));
        assert!(!is_valid_id(&"x".repeat(65)));
    }
}
