//! Provider (Retell) API client.
//!
//! Thin typed wrapper over the provider's REST endpoints. Upstream failures
//! carry the vendor status and body for server-side logs; the API layer
//! converts them to a generic 500 so vendor error text never reaches a
//! browser.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::error::ApiError;

/// Cap on logged upstream response bodies.
const MAX_LOGGED_BODY_BYTES: usize = 2048;

/// Errors from provider calls.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct AgentRequest<'a> {
    agent_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateWebCallResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CreateChatResponse {
    chat_id: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    chat_id: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    messages: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Client for the provider REST API.
#[derive(Clone)]
pub struct RetellClient {
    http: Client,
    base_url: String,
}

impl RetellClient {
    /// Create a new provider client.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a web call session; returns the access token the browser-side
    /// SDK uses to open the realtime audio channel.
    pub async fn create_web_call(
        &self,
        provider_api_key: &str,
        agent_id: &str,
    ) -> Result<String, ProviderError> {
        debug!(agent_id = %agent_id, "Creating web call");
        let response: CreateWebCallResponse = self
            .post_json(
                "/v2/create-web-call",
                provider_api_key,
                &AgentRequest { agent_id },
            )
            .await?;
        Ok(response.access_token)
    }

    /// Create a chat session; returns its continuation token.
    pub async fn create_chat(
        &self,
        provider_api_key: &str,
        agent_id: &str,
    ) -> Result<String, ProviderError> {
        debug!(agent_id = %agent_id, "Creating chat session");
        let response: CreateChatResponse = self
            .post_json("/create-chat", provider_api_key, &AgentRequest { agent_id })
            .await?;
        Ok(response.chat_id)
    }

    /// Send one message to an existing chat session and return the latest
    /// agent reply (empty string when the provider returned none).
    pub async fn create_chat_completion(
        &self,
        provider_api_key: &str,
        chat_id: &str,
        content: &str,
    ) -> Result<String, ProviderError> {
        debug!(chat_id = %chat_id, "Sending chat completion");
        let response: ChatCompletionResponse = self
            .post_json(
                "/create-chat-completion",
                provider_api_key,
                &ChatCompletionRequest { chat_id, content },
            )
            .await?;
        Ok(latest_agent_message(&response.messages))
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        provider_api_key: &str,
        body: &B,
    ) -> Result<R, ProviderError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(provider_api_key)
            .json(body)
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

        response
            .json::<R>()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }
}

/// Content of the last message with `role == "agent"`, or an empty string.
pub fn latest_agent_message(messages: &[ChatTurn]) -> String {
    messages
        .iter()
        .rev()
        .find(|m| m.role == "agent")
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_agent_message_picks_last() {
        let messages = vec![
            ChatTurn {
                role: "agent".to_string(),
                content: "first".to_string(),
            },
            ChatTurn {
                role: "user".to_string(),
                content: "question".to_string(),
            },
            ChatTurn {
                role: "agent".to_string(),
                content: "second".to_string(),
            },
        ];
        assert_eq!(latest_agent_message(&messages), "second");
    }

    #[test]
    fn test_latest_agent_message_empty_when_no_agent_turn() {
        let messages = vec![ChatTurn {
            role: "user".to_string(),
            content: "hello".to_string(),
        }];
        assert_eq!(latest_agent_message(&messages), "");
        assert_eq!(latest_agent_message(&[]), "");
    }

    #[test]
    fn test_completion_response_tolerates_missing_fields() {
        let parsed: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.messages.is_empty());

        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"messages": [{"role": "agent"}]}"#).unwrap();
        assert_eq!(parsed.messages[0].content, "");
    }

    #[test]
    fn test_upstream_error_display_carries_status() {
        let err = ProviderError::Upstream {
            status: 502,
            body: "bad gateway".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("502"));
        assert!(text.contains("bad gateway"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = RetellClient::new("https://api.retellai.com/", 5);
        assert_eq!(client.base_url, "https://api.retellai.com");
    }

    async fn spawn_provider(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_create_web_call_round_trip() {
        use axum::{http::HeaderMap, routing::post, Json, Router};

        let app = Router::new().route(
            "/v2/create-web-call",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                assert_eq!(
                    headers.get("authorization").unwrap().to_str().unwrap(),
                    "Bearer key_env"
                );
                assert_eq!(body["agent_id"], "agent_voice");
                Json(serde_json::json!({ "access_token": "tok_abc" }))
            }),
        );
        let base = spawn_provider(app).await;

        let client = RetellClient::new(&base, 5);
        let token = client.create_web_call("key_env", "agent_voice").await.unwrap();
        assert_eq!(token, "tok_abc");
    }

    #[tokio::test]
    async fn test_chat_completion_round_trip() {
        use axum::{routing::post, Json, Router};

        let app = Router::new().route(
            "/create-chat-completion",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["chat_id"], "sess-1");
                assert_eq!(body["content"], "hi");
                Json(serde_json::json!({
                    "messages": [
                        { "role": "user", "content": "hi" },
                        { "role": "agent", "content": "hello there" }
                    ]
                }))
            }),
        );
        let base = spawn_provider(app).await;

        let client = RetellClient::new(&base, 5);
        let reply = client
            .create_chat_completion("key_env", "sess-1", "hi")
            .await
            .unwrap();
        assert_eq!(reply, "hello there");
    }

    #[tokio::test]
    async fn test_upstream_failure_keeps_vendor_body_server_side() {
        use axum::{http::StatusCode, routing::post, Router};

        let app = Router::new().route(
            "/create-chat",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
        );
        let base = spawn_provider(app).await;

        let client = RetellClient::new(&base, 5);
        let err = client.create_chat("key_bad", "agent_chat").await.unwrap_err();
        match err {
            ProviderError::Upstream { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }

        // The ApiError the browser sees is generic.
        let api_error: ApiError = ProviderError::Upstream {
            status: 401,
            body: "invalid api key".to_string(),
        }
        .into();
        assert!(matches!(api_error, ApiError::Upstream(_)));
    }
}
