//! Embeddable widget script endpoint.

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::extractors::WidgetApiKey;
use crate::middleware::metrics::record_embed_served;
use crate::services::embed::{render_embed_script, EmbedScriptProps};

/// GET /widget-embed?api_key=
///
/// Serves the self-installing widget script. No database access: the script
/// fetches its own configuration at runtime, so a stale cached copy can
/// never pin stale display settings. The key format is still enforced by
/// the extractor so malformed keys get a 400 instead of a cacheable script.
pub async fn get_widget_embed(State(state): State<AppState>, key: WidgetApiKey) -> Response {
    let script = render_embed_script(&EmbedScriptProps {
        api_key: key.0,
        base_url: state.config.widget.public_base_url.clone(),
    });

    record_embed_served();

    let cache_control = format!(
        "public, max-age={}",
        state.config.widget.embed_cache_max_age_secs
    );

    let mut response = script.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/javascript"),
    );
    if let Ok(value) = HeaderValue::from_str(&cache_control) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    response
}
