//! Voice call creation proxy.

use axum::{extract::State, Json};
use tracing::info;

use domain::models::{CreateCallRequest, CreateCallResponse, WidgetConfig};
use domain::services::config_resolution::{resolve_provider, AgentKind};
use persistence::repositories::WidgetConfigRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::WidgetApiKey;
use crate::middleware::metrics::record_call_created;
use crate::middleware::rate_limit::RateLimiterState;
use crate::services::resolution::resolution_input_for;

/// POST /retell-create-call
///
/// Resolves provider credentials for the widget (or demo/global tiers) and
/// creates a web call session with the provider. The browser receives only
/// the session access token.
pub async fn create_call(
    State(state): State<AppState>,
    Json(request): Json<CreateCallRequest>,
) -> Result<Json<CreateCallResponse>, ApiError> {
    let api_key = match request.api_key.as_deref() {
        Some(raw) => Some(WidgetApiKey::parse(raw)?),
        None => None,
    };

    check_rate_limit(&state, api_key.as_ref(), request.is_demo)?;

    let widget = load_widget(&state, api_key.as_ref()).await?;

    let input = resolution_input_for(&state.pool, &state.config, widget.as_ref(), request.is_demo)
        .await?;
    let resolved = resolve_provider(&input, AgentKind::Voice)?;

    info!(
        api_key_tier = %resolved.api_key_tier,
        agent_id_tier = %resolved.agent_id_tier,
        "Creating web call"
    );

    let access_token = state
        .retell
        .create_web_call(&resolved.api_key, &resolved.agent_id)
        .await?;

    record_call_created(&resolved.api_key_tier.to_string());

    Ok(Json(CreateCallResponse { access_token }))
}

/// Rate limit check shared with the chat proxy.
pub(crate) fn check_rate_limit(
    state: &AppState,
    api_key: Option<&WidgetApiKey>,
    is_demo: bool,
) -> Result<(), ApiError> {
    if let Some(ref limiter) = state.rate_limiter {
        let bucket = RateLimiterState::bucket_for(api_key.map(|k| k.0.as_str()), is_demo);
        limiter.check(bucket).map_err(|_| ApiError::RateLimited)?;
    }
    Ok(())
}

/// Widget lookup shared with the chat proxy: a well-formed but unknown key
/// is 404; no key means no widget tier.
pub(crate) async fn load_widget(
    state: &AppState,
    api_key: Option<&WidgetApiKey>,
) -> Result<Option<WidgetConfig>, ApiError> {
    match api_key {
        Some(key) => {
            let repo = WidgetConfigRepository::new(state.pool.clone());
            let widget = repo
                .find_by_api_key(&key.0)
                .await?
                .ok_or_else(|| ApiError::NotFound("Widget configuration not found".to_string()))?
                .into_model();
            Ok(Some(widget))
        }
        None => Ok(None),
    }
}
