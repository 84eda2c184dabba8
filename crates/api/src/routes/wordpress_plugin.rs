//! WordPress plugin download endpoint.

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};

use persistence::repositories::WidgetConfigRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::WidgetApiKey;
use crate::services::wordpress::build_plugin_zip;

/// GET /wordpress-plugin?api_key=
///
/// Packages a WordPress plugin zip that enqueues the embed script for this
/// widget. The widget must exist; its name/title brands the plugin.
pub async fn get_wordpress_plugin(
    State(state): State<AppState>,
    key: WidgetApiKey,
) -> Result<Response, ApiError> {
    let repo = WidgetConfigRepository::new(state.pool.clone());
    let widget = repo
        .find_by_api_key(&key.0)
        .await?
        .ok_or_else(|| ApiError::NotFound("Widget configuration not found".to_string()))?
        .into_model();

    let plugin_name = widget.title.as_deref().unwrap_or(&widget.name);
    let embed_url = format!("{}/widget-embed", state.config.widget.public_base_url);

    let bytes = build_plugin_zip(plugin_name, &key.0, &embed_url)?;

    let mut response = bytes.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/zip"),
    );
    response.headers_mut().insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"ai-chat-widget.zip\""),
    );
    Ok(response)
}
