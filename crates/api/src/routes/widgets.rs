//! Dashboard widget CRUD endpoints (service-key gated).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::{CreateWidgetRequest, UpdateWidgetRequest, WidgetConfig};
use persistence::repositories::WidgetConfigRepository;
use shared::crypto::{extract_key_prefix, generate_widget_api_key};
use shared::pagination::{PageInfo, PageParams};

use crate::app::AppState;
use crate::error::ApiError;

/// Query parameters for listing widgets.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListWidgetsQuery {
    pub owner_id: Uuid,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Response for listing widgets.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListWidgetsResponse {
    pub widgets: Vec<WidgetConfig>,
    pub page_info: PageInfo,
}

/// POST /api/v1/widgets
///
/// Creates a widget with a server-generated API key. The full configuration
/// (including the key) is returned; this surface is owner-only.
pub async fn create_widget(
    State(state): State<AppState>,
    Json(request): Json<CreateWidgetRequest>,
) -> Result<(StatusCode, Json<WidgetConfig>), ApiError> {
    request.validate()?;

    let api_key = generate_widget_api_key();
    let repo = WidgetConfigRepository::new(state.pool.clone());
    let widget = repo.create(&request, &api_key).await?.into_model();

    info!(
        widget_id = %widget.id,
        key_prefix = extract_key_prefix(&widget.api_key).unwrap_or("unknown"),
        "Widget created"
    );

    Ok((StatusCode::CREATED, Json(widget)))
}

/// GET /api/v1/widgets?owner_id=&page=&per_page=
pub async fn list_widgets(
    State(state): State<AppState>,
    Query(query): Query<ListWidgetsQuery>,
) -> Result<Json<ListWidgetsResponse>, ApiError> {
    let params = PageParams {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(shared::pagination::DEFAULT_PER_PAGE),
    };

    let repo = WidgetConfigRepository::new(state.pool.clone());
    let entities = repo
        .list_by_owner(query.owner_id, params.limit(), params.offset())
        .await?;
    let total = repo.count_by_owner(query.owner_id).await?;

    Ok(Json(ListWidgetsResponse {
        widgets: entities.into_iter().map(|e| e.into_model()).collect(),
        page_info: PageInfo::new(params, total),
    }))
}

/// GET /api/v1/widgets/:id
pub async fn get_widget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WidgetConfig>, ApiError> {
    let repo = WidgetConfigRepository::new(state.pool.clone());
    let widget = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Widget not found".to_string()))?
        .into_model();
    Ok(Json(widget))
}

/// PATCH /api/v1/widgets/:id
pub async fn update_widget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWidgetRequest>,
) -> Result<Json<WidgetConfig>, ApiError> {
    request.validate()?;

    let repo = WidgetConfigRepository::new(state.pool.clone());
    let widget = repo
        .update(id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Widget not found".to_string()))?
        .into_model();

    info!(widget_id = %widget.id, "Widget updated");

    Ok(Json(widget))
}

/// DELETE /api/v1/widgets/:id
pub async fn delete_widget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = WidgetConfigRepository::new(state.pool.clone());
    if repo.delete(id).await? {
        info!(widget_id = %id, "Widget deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Widget not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_deserialization() {
        let query: ListWidgetsQuery = serde_json::from_str(
            r#"{"owner_id": "550e8400-e29b-41d4-a716-446655440000", "page": 2}"#,
        )
        .unwrap();
        assert_eq!(query.page, Some(2));
        assert!(query.per_page.is_none());
    }
}
