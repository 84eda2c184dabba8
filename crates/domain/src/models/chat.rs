//! Text chat DTOs for the chat proxy endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::validation::validate_chat_message;

/// Backend a widget's chat messages are routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    /// Provider-hosted chat agent (the default).
    #[default]
    Retell,
    /// Customer-supplied webhook endpoint.
    Webhook,
}

impl ChatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retell => "retell",
            Self::Webhook => "webhook",
        }
    }
}

impl std::fmt::Display for ChatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChatType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "retell" => Ok(Self::Retell),
            "webhook" => Ok(Self::Webhook),
            other => Err(format!("unknown chat type: {}", other)),
        }
    }
}

/// Request body for `POST /retell-text-chat`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ChatRequest {
    /// Widget API key; absent for demo or globally-configured traffic.
    pub api_key: Option<String>,

    /// When set, the demo settings tier participates in credential resolution.
    #[serde(default)]
    pub is_demo: bool,

    #[validate(custom(function = "validate_chat_message"))]
    pub message: String,

    /// Continuation token for an existing chat session.
    pub chat_id: Option<String>,
}

/// Response body for `POST /retell-text-chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChatResponse {
    /// Latest agent reply (empty string when the provider returned none).
    pub response: String,
    /// Session token the client echoes back to continue the conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_type_round_trip() {
        assert_eq!("retell".parse::<ChatType>().unwrap(), ChatType::Retell);
        assert_eq!("webhook".parse::<ChatType>().unwrap(), ChatType::Webhook);
        assert!("imap".parse::<ChatType>().is_err());
        assert_eq!(ChatType::Webhook.to_string(), "webhook");
    }

    #[test]
    fn test_chat_type_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ChatType::Retell).unwrap(), "\"retell\"");
        let parsed: ChatType = serde_json::from_str("\"webhook\"").unwrap();
        assert_eq!(parsed, ChatType::Webhook);
    }

    #[test]
    fn test_chat_request_minimal() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(request.message, "hi");
        assert!(request.api_key.is_none());
        assert!(!request.is_demo);
        assert!(request.chat_id.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_chat_request_null_chat_id() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"message": "hi", "chat_id": null}"#).unwrap();
        assert!(request.chat_id.is_none());
    }

    #[test]
    fn test_chat_request_rejects_oversized_message() {
        let message = "x".repeat(4001);
        let request = ChatRequest {
            api_key: None,
            is_demo: false,
            message,
            chat_id: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_chat_response_omits_missing_chat_id() {
        let response = ChatResponse {
            response: "hello".to_string(),
            chat_id: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("chat_id"));
    }
}
