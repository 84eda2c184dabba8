//! Widget configuration entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{ChatType, WidgetConfig, WidgetPosition};

/// Database row mapping for the widget_configs table.
#[derive(Debug, Clone, FromRow)]
pub struct WidgetConfigEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub api_key: String,
    pub title: Option<String>,
    pub greeting: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub button_text_color: Option<String>,
    pub position: String,
    pub enable_voice: bool,
    pub enable_chat: bool,
    pub retell_api_key: Option<String>,
    pub voice_agent_id: Option<String>,
    pub chat_agent_id: Option<String>,
    pub allowed_domains: Option<Vec<String>>,
    pub chat_type: String,
    pub webhook_url: Option<String>,
    pub attribution_text: Option<String>,
    pub attribution_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WidgetConfigEntity {
    /// Convert the row into the domain model. Unknown enum values fall back
    /// to the defaults rather than failing the request; the columns are
    /// CHECK-constrained so this only matters across schema evolution.
    pub fn into_model(self) -> WidgetConfig {
        WidgetConfig {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            api_key: self.api_key,
            title: self.title,
            greeting: self.greeting,
            primary_color: self.primary_color,
            secondary_color: self.secondary_color,
            background_color: self.background_color,
            text_color: self.text_color,
            button_text_color: self.button_text_color,
            position: self.position.parse::<WidgetPosition>().unwrap_or_default(),
            enable_voice: self.enable_voice,
            enable_chat: self.enable_chat,
            retell_api_key: self.retell_api_key,
            voice_agent_id: self.voice_agent_id,
            chat_agent_id: self.chat_agent_id,
            allowed_domains: self.allowed_domains,
            chat_type: self.chat_type.parse::<ChatType>().unwrap_or_default(),
            webhook_url: self.webhook_url,
            attribution_text: self.attribution_text,
            attribution_link: self.attribution_link,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entity() -> WidgetConfigEntity {
        WidgetConfigEntity {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Support".to_string(),
            api_key: format!("wgt_{}", "cd".repeat(24)),
            title: None,
            greeting: None,
            primary_color: None,
            secondary_color: None,
            background_color: None,
            text_color: None,
            button_text_color: None,
            position: "bottom-left".to_string(),
            enable_voice: true,
            enable_chat: true,
            retell_api_key: None,
            voice_agent_id: None,
            chat_agent_id: None,
            allowed_domains: None,
            chat_type: "webhook".to_string(),
            webhook_url: Some("https://customer.example.com/chat".to_string()),
            attribution_text: None,
            attribution_link: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_into_model_parses_enums() {
        let model = sample_entity().into_model();
        assert_eq!(model.position, WidgetPosition::BottomLeft);
        assert_eq!(model.chat_type, ChatType::Webhook);
    }

    #[test]
    fn test_into_model_defaults_unknown_values() {
        let mut entity = sample_entity();
        entity.position = "floating".to_string();
        entity.chat_type = "carrier-pigeon".to_string();
        let model = entity.into_model();
        assert_eq!(model.position, WidgetPosition::BottomRight);
        assert_eq!(model.chat_type, ChatType::Retell);
    }
}
