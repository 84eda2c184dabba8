//! Widget configuration repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::WidgetConfigEntity;
use domain::models::{CreateWidgetRequest, UpdateWidgetRequest};

const WIDGET_COLUMNS: &str = r#"id, owner_id, name, api_key, title, greeting,
    primary_color, secondary_color, background_color, text_color, button_text_color,
    position, enable_voice, enable_chat, retell_api_key, voice_agent_id, chat_agent_id,
    allowed_domains, chat_type, webhook_url, attribution_text, attribution_link,
    created_at, updated_at"#;

/// Repository for widget configuration rows.
#[derive(Clone)]
pub struct WidgetConfigRepository {
    pool: PgPool,
}

impl WidgetConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look a widget up by its public API key.
    pub async fn find_by_api_key(
        &self,
        api_key: &str,
    ) -> Result<Option<WidgetConfigEntity>, sqlx::Error> {
        sqlx::query_as::<_, WidgetConfigEntity>(&format!(
            "SELECT {} FROM widget_configs WHERE api_key = $1",
            WIDGET_COLUMNS
        ))
        .bind(api_key)
        .fetch_optional(&self.pool)
        .await
    }

    /// Look a widget up by its ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<WidgetConfigEntity>, sqlx::Error> {
        sqlx::query_as::<_, WidgetConfigEntity>(&format!(
            "SELECT {} FROM widget_configs WHERE id = $1",
            WIDGET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List widgets for an owner, newest first.
    pub async fn list_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WidgetConfigEntity>, sqlx::Error> {
        sqlx::query_as::<_, WidgetConfigEntity>(&format!(
            "SELECT {} FROM widget_configs WHERE owner_id = $1
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            WIDGET_COLUMNS
        ))
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Count widgets for an owner.
    pub async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM widget_configs WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Insert a new widget with a server-generated API key.
    pub async fn create(
        &self,
        request: &CreateWidgetRequest,
        api_key: &str,
    ) -> Result<WidgetConfigEntity, sqlx::Error> {
        sqlx::query_as::<_, WidgetConfigEntity>(&format!(
            r#"
            INSERT INTO widget_configs (
                owner_id, name, api_key, title, greeting,
                primary_color, secondary_color, background_color, text_color, button_text_color,
                position, enable_voice, enable_chat,
                retell_api_key, voice_agent_id, chat_agent_id,
                allowed_domains, chat_type, webhook_url,
                attribution_text, attribution_link
            )
            VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                COALESCE($11, 'bottom-right'), $12, $13,
                $14, $15, $16,
                $17, COALESCE($18, 'retell'), $19,
                $20, $21
            )
            RETURNING {}
            "#,
            WIDGET_COLUMNS
        ))
        .bind(request.owner_id)
        .bind(&request.name)
        .bind(api_key)
        .bind(&request.title)
        .bind(&request.greeting)
        .bind(&request.primary_color)
        .bind(&request.secondary_color)
        .bind(&request.background_color)
        .bind(&request.text_color)
        .bind(&request.button_text_color)
        .bind(&request.position)
        .bind(request.enable_voice)
        .bind(request.enable_chat)
        .bind(&request.retell_api_key)
        .bind(&request.voice_agent_id)
        .bind(&request.chat_agent_id)
        .bind(&request.allowed_domains)
        .bind(&request.chat_type)
        .bind(&request.webhook_url)
        .bind(&request.attribution_text)
        .bind(&request.attribution_link)
        .fetch_one(&self.pool)
        .await
    }

    /// Partial update; absent fields keep their current values.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateWidgetRequest,
    ) -> Result<Option<WidgetConfigEntity>, sqlx::Error> {
        sqlx::query_as::<_, WidgetConfigEntity>(&format!(
            r#"
            UPDATE widget_configs
            SET
                name = COALESCE($2, name),
                title = COALESCE($3, title),
                greeting = COALESCE($4, greeting),
                primary_color = COALESCE($5, primary_color),
                secondary_color = COALESCE($6, secondary_color),
                background_color = COALESCE($7, background_color),
                text_color = COALESCE($8, text_color),
                button_text_color = COALESCE($9, button_text_color),
                position = COALESCE($10, position),
                enable_voice = COALESCE($11, enable_voice),
                enable_chat = COALESCE($12, enable_chat),
                retell_api_key = COALESCE($13, retell_api_key),
                voice_agent_id = COALESCE($14, voice_agent_id),
                chat_agent_id = COALESCE($15, chat_agent_id),
                allowed_domains = COALESCE($16, allowed_domains),
                chat_type = COALESCE($17, chat_type),
                webhook_url = COALESCE($18, webhook_url),
                attribution_text = COALESCE($19, attribution_text),
                attribution_link = COALESCE($20, attribution_link),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            WIDGET_COLUMNS
        ))
        .bind(id)
        .bind(&request.name)
        .bind(&request.title)
        .bind(&request.greeting)
        .bind(&request.primary_color)
        .bind(&request.secondary_color)
        .bind(&request.background_color)
        .bind(&request.text_color)
        .bind(&request.button_text_color)
        .bind(&request.position)
        .bind(request.enable_voice)
        .bind(request.enable_chat)
        .bind(&request.retell_api_key)
        .bind(&request.voice_agent_id)
        .bind(&request.chat_agent_id)
        .bind(&request.allowed_domains)
        .bind(&request.chat_type)
        .bind(&request.webhook_url)
        .bind(&request.attribution_text)
        .bind(&request.attribution_link)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a widget. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM widget_configs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
