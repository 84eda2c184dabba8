//! Text chat proxy.

use axum::{extract::State, Json};
use tracing::info;
use validator::Validate;

use domain::models::{ChatRequest, ChatResponse};
use domain::services::config_resolution::{resolve_provider, AgentKind};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::WidgetApiKey;
use crate::middleware::metrics::record_chat_turn;
use crate::routes::calls::{check_rate_limit, load_widget};
use crate::services::resolution::resolution_input_for;

/// POST /retell-text-chat
///
/// Single-turn chat proxy. Message validation runs before any lookup or
/// outbound call, so an oversized message can never reach the provider or a
/// customer webhook. Widgets configured for a webhook backend get their
/// turns relayed verbatim; everything else goes to the provider, creating a
/// session first when the request carries no continuation token.
pub async fn text_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    request.validate()?;

    let api_key = match request.api_key.as_deref() {
        Some(raw) => Some(WidgetApiKey::parse(raw)?),
        None => None,
    };

    check_rate_limit(&state, api_key.as_ref(), request.is_demo)?;

    let widget = load_widget(&state, api_key.as_ref()).await?;

    // Empty continuation tokens behave like a fresh session.
    let chat_id = request.chat_id.as_deref().filter(|id| !id.is_empty());

    // Customer webhook backend: relay and return, no provider involvement.
    if let Some(ref w) = widget {
        if w.uses_chat_webhook() {
            let webhook_url = w.webhook_url.as_deref().unwrap_or_default();
            let response = state
                .chat_relay
                .relay(webhook_url, &request.message, chat_id)
                .await?;
            record_chat_turn("webhook");
            return Ok(Json(response));
        }
    }

    let input = resolution_input_for(&state.pool, &state.config, widget.as_ref(), request.is_demo)
        .await?;
    let resolved = resolve_provider(&input, AgentKind::Chat)?;

    let chat_id = match chat_id {
        Some(id) => id.to_string(),
        None => {
            info!(agent_id_tier = %resolved.agent_id_tier, "Creating chat session");
            state
                .retell
                .create_chat(&resolved.api_key, &resolved.agent_id)
                .await?
        }
    };

    let reply = state
        .retell
        .create_chat_completion(&resolved.api_key, &chat_id, &request.message)
        .await?;

    record_chat_turn("retell");

    Ok(Json(ChatResponse {
        response: reply,
        chat_id: Some(chat_id),
    }))
}
