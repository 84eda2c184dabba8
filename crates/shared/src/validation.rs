//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Maximum length of a single chat message in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Maximum number of entries in a widget domain allow-list.
pub const MAX_ALLOWED_DOMAINS: usize = 20;

lazy_static! {
    /// Widget API key format: `wgt_` followed by exactly 48 lowercase hex chars.
    pub static ref WIDGET_API_KEY_RE: Regex = Regex::new(r"^wgt_[a-f0-9]{48}$").unwrap();

    /// CSS hex color, short or long form.
    static ref HEX_COLOR_RE: Regex = Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();
}

/// Checks a widget API key against the canonical format.
pub fn is_valid_widget_api_key(key: &str) -> bool {
    WIDGET_API_KEY_RE.is_match(key)
}

/// Validates a CSS hex color value (e.g. `#14b8a6`).
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_RE.is_match(color) {
        Ok(())
    } else {
        let mut err = ValidationError::new("hex_color");
        err.message = Some("Color must be a hex value like #14b8a6".into());
        Err(err)
    }
}

/// Validates a widget screen position.
pub fn validate_position(position: &str) -> Result<(), ValidationError> {
    match position {
        "bottom-right" | "bottom-left" => Ok(()),
        _ => {
            let mut err = ValidationError::new("position");
            err.message = Some("Position must be bottom-right or bottom-left".into());
            Err(err)
        }
    }
}

/// Validates a widget chat backend type.
pub fn validate_chat_type(chat_type: &str) -> Result<(), ValidationError> {
    match chat_type {
        "retell" | "webhook" => Ok(()),
        _ => {
            let mut err = ValidationError::new("chat_type");
            err.message = Some("Chat type must be retell or webhook".into());
            Err(err)
        }
    }
}

/// Validates a chat message: non-empty after trimming and within the length cap.
/// The cap counts characters, not bytes, so multi-byte text is not penalized.
pub fn validate_chat_message(message: &str) -> Result<(), ValidationError> {
    if message.trim().is_empty() {
        let mut err = ValidationError::new("message_empty");
        err.message = Some("Message must not be empty".into());
        return Err(err);
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        let mut err = ValidationError::new("message_too_long");
        err.message = Some("Message must be at most 4000 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a domain allow-list: bounded size, entries non-empty and free of
/// scheme or path components (bare host names like `example.com`).
pub fn validate_allowed_domains(domains: &[String]) -> Result<(), ValidationError> {
    if domains.len() > MAX_ALLOWED_DOMAINS {
        let mut err = ValidationError::new("too_many_domains");
        err.message = Some("At most 20 allowed domains".into());
        return Err(err);
    }
    for domain in domains {
        let trimmed = domain.trim();
        if trimmed.is_empty() || trimmed.contains("://") || trimmed.contains('/') {
            let mut err = ValidationError::new("domain_entry");
            err.message = Some("Domains must be bare host names like example.com".into());
            return Err(err);
        }
    }
    Ok(())
}

/// Validates that a webhook URL uses HTTPS.
pub fn validate_https_url(url: &str) -> Result<(), ValidationError> {
    if url.starts_with("https://") {
        Ok(())
    } else {
        let mut err = ValidationError::new("https_required");
        err.message = Some("URL must use HTTPS protocol".into());
        Err(err)
    }
}
