//! Widget API key extractor.
//!
//! Extracts and format-checks the `api_key` query parameter for the public
//! widget endpoints. Rejection happens before the handler body runs, so a
//! malformed key can never reach a repository.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use shared::validation::is_valid_widget_api_key;

#[derive(Debug, Deserialize)]
struct WidgetKeyParams {
    api_key: Option<String>,
}

/// A syntactically valid widget API key taken from the query string.
///
/// Validity here means format only (`wgt_` + 48 hex chars); existence is
/// checked by the handler against the database.
#[derive(Debug, Clone)]
pub struct WidgetApiKey(pub String);

impl WidgetApiKey {
    /// Format-check a raw key. Shared with the body-carried keys on the
    /// proxy endpoints, which cannot use the query extractor.
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        if is_valid_widget_api_key(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ApiError::Validation("Invalid api_key format".to_string()))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for WidgetApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<WidgetKeyParams>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation("api_key parameter is required".to_string()))?;

        let raw = params
            .api_key
            .ok_or_else(|| ApiError::Validation("api_key parameter is required".to_string()))?;

        Self::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_key() {
        let key = format!("wgt_{}", "ab".repeat(24));
        let parsed = WidgetApiKey::parse(&key).unwrap();
        assert_eq!(parsed.0, key);
    }

    #[test]
    fn test_parse_rejects_bad_format() {
        assert!(WidgetApiKey::parse("").is_err());
        assert!(WidgetApiKey::parse("wgt_short").is_err());
        assert!(WidgetApiKey::parse(&format!("sk_{}", "ab".repeat(24))).is_err());
        // Uppercase hex is outside the canonical format.
        assert!(WidgetApiKey::parse(&format!("wgt_{}", "AB".repeat(24))).is_err());
    }

    #[test]
    fn test_parse_rejection_is_validation_error() {
        let err = WidgetApiKey::parse("nope").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
