//! Widget API key generation.

use rand::RngCore;

/// Prefix carried by every widget API key.
pub const WIDGET_KEY_PREFIX: &str = "wgt_";

/// Number of random bytes in a widget API key (hex-encoded to 48 chars).
const WIDGET_KEY_BYTES: usize = 24;

/// Generates a new widget API key: `wgt_` followed by 48 lowercase hex chars.
pub fn generate_widget_api_key() -> String {
    let mut bytes = [0u8; WIDGET_KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}{}", WIDGET_KEY_PREFIX, hex::encode(bytes))
}

/// Extracts the display prefix from a widget API key (first 8 hex chars after
/// "wgt_"), used for identification in logs without exposing the full key.
pub fn extract_key_prefix(key: &str) -> Option<&str> {
    if key.starts_with(WIDGET_KEY_PREFIX) && key.len() >= WIDGET_KEY_PREFIX.len() + 8 {
        Some(&key[..WIDGET_KEY_PREFIX.len() + 8])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::is_valid_widget_api_key;

    #[test]
    fn test_generated_key_format() {
        let key = generate_widget_api_key();
        assert_eq!(key.len(), 4 + 48);
        assert!(key.starts_with("wgt_"));
        assert!(key[4..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generated_key_passes_format_check() {
        for _ in 0..16 {
            assert!(is_valid_widget_api_key(&generate_widget_api_key()));
        }
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let a = generate_widget_api_key();
        let b = generate_widget_api_key();
        assert_ne!(a, b);
    }

    #[test]
    fn test_extract_key_prefix() {
        let key = format!("wgt_{}", "ab".repeat(24));
        assert_eq!(extract_key_prefix(&key), Some("wgt_abababab"));
    }

    #[test]
    fn test_extract_key_prefix_rejects_short_or_foreign_keys() {
        assert_eq!(extract_key_prefix("wgt_ab"), None);
        assert_eq!(extract_key_prefix("pk_abcdefgh"), None);
        assert_eq!(extract_key_prefix(""), None);
    }
}
