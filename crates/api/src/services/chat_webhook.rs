//! Customer chat webhook relay.
//!
//! Widgets configured with `chat_type = "webhook"` route chat turns to a
//! customer-supplied endpoint instead of the provider. The relay posts
//! `{message, chat_id}` and passes the reply's `response`/`chat_id` fields
//! back verbatim. Deliveries are unsigned and never retried.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use domain::models::ChatResponse;

use crate::services::retell::ProviderError;

/// Webhook delivery timeout in seconds.
const WEBHOOK_TIMEOUT_SECS: u64 = 5;

/// Cap on logged webhook response bodies.
const MAX_LOGGED_BODY_BYTES: usize = 2048;

#[derive(Debug, Serialize)]
struct WebhookChatPayload<'a> {
    message: &'a str,
    /// Serialized as `null` on the first turn so the receiver always sees
    /// the field.
    chat_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct WebhookChatReply {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    chat_id: Option<String>,
}

/// Relay for customer chat webhooks.
#[derive(Clone)]
pub struct ChatWebhookRelay {
    http: Client,
}

impl ChatWebhookRelay {
    pub fn new() -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { http }
    }

    /// Post one chat turn to the customer endpoint and relay the reply.
    pub async fn relay(
        &self,
        webhook_url: &str,
        message: &str,
        chat_id: Option<&str>,
    ) -> Result<ChatResponse, ProviderError> {
        debug!(webhook_url = %webhook_url, "Relaying chat turn to customer webhook");

        let response = self
            .http
            .post(webhook_url)
            .json(&WebhookChatPayload { message, chat_id })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(MAX_LOGGED_BODY_BYTES);
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let reply: WebhookChatReply = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        Ok(ChatResponse {
            response: reply.response.unwrap_or_default(),
            chat_id: reply.chat_id,
        })
    }
}

impl Default for ChatWebhookRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_null_chat_id() {
        let payload = WebhookChatPayload {
            message: "hi",
            chat_id: None,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"message":"hi","chat_id":null}"#);
    }

    #[test]
    fn test_payload_serializes_continuation_token() {
        let payload = WebhookChatPayload {
            message: "again",
            chat_id: Some("sess-42"),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"message":"again","chat_id":"sess-42"}"#);
    }

    #[test]
    fn test_reply_parses_partial_bodies() {
        let reply: WebhookChatReply = serde_json::from_str(r#"{"response": "hello"}"#).unwrap();
        assert_eq!(reply.response.as_deref(), Some("hello"));
        assert!(reply.chat_id.is_none());

        let reply: WebhookChatReply = serde_json::from_str("{}").unwrap();
        assert!(reply.response.is_none());
    }

    async fn spawn_webhook(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/hook", addr)
    }

    #[tokio::test]
    async fn test_relay_round_trip() {
        use axum::{routing::post, Json, Router};

        let app = Router::new().route(
            "/hook",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["message"], "hi");
                assert_eq!(body["chat_id"], serde_json::Value::Null);
                Json(serde_json::json!({ "response": "echo: hi", "chat_id": "sess-1" }))
            }),
        );
        let url = spawn_webhook(app).await;

        let relay = ChatWebhookRelay::new();
        let response = relay.relay(&url, "hi", None).await.unwrap();
        assert_eq!(response.response, "echo: hi");
        assert_eq!(response.chat_id.as_deref(), Some("sess-1"));
    }

    #[tokio::test]
    async fn test_relay_surfaces_upstream_failure() {
        use axum::{http::StatusCode, routing::post, Router};

        let app = Router::new().route(
            "/hook",
            post(|| async { (StatusCode::BAD_GATEWAY, "backend down") }),
        );
        let url = spawn_webhook(app).await;

        let relay = ChatWebhookRelay::new();
        let err = relay.relay(&url, "hi", Some("sess-1")).await.unwrap_err();
        match err {
            ProviderError::Upstream { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "backend down");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }
}
