//! Voice call DTOs for the call-creation proxy endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `POST /retell-create-call`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateCallRequest {
    /// Widget API key; absent for demo or globally-configured traffic.
    pub api_key: Option<String>,

    /// When set, the demo settings tier participates in credential resolution.
    #[serde(default)]
    pub is_demo: bool,
}

/// Response body for `POST /retell-create-call`.
///
/// The access token is consumed by the browser-side SDK to open the realtime
/// audio session directly with the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateCallResponse {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_call_request_empty_body() {
        let request: CreateCallRequest = serde_json::from_str("{}").unwrap();
        assert!(request.api_key.is_none());
        assert!(!request.is_demo);
    }

    #[test]
    fn test_create_call_request_demo() {
        let request: CreateCallRequest = serde_json::from_str(r#"{"is_demo": true}"#).unwrap();
        assert!(request.is_demo);
    }

    #[test]
    fn test_create_call_response_serialization() {
        let response = CreateCallResponse {
            access_token: "tok_123".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"access_token":"tok_123"}"#);
    }
}
