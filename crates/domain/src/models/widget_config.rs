//! Widget configuration domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{
    validate_allowed_domains, validate_chat_type, validate_hex_color, validate_https_url,
    validate_position,
};

use crate::models::chat::ChatType;

/// Screen corner the widget is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetPosition {
    #[default]
    BottomRight,
    BottomLeft,
}

impl WidgetPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
        }
    }
}

impl std::fmt::Display for WidgetPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WidgetPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bottom-right" => Ok(Self::BottomRight),
            "bottom-left" => Ok(Self::BottomLeft),
            other => Err(format!("unknown widget position: {}", other)),
        }
    }
}

/// Per-tier provider credential fields. Used for the widget-level overrides,
/// the demo/global settings rows and the environment defaults alike, so the
/// resolution service can treat all tiers uniformly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOverrides {
    pub provider_api_key: Option<String>,
    pub voice_agent_id: Option<String>,
    pub chat_agent_id: Option<String>,
}

/// Represents a configured widget instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WidgetConfig {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    /// Unique key identifying this widget: `wgt_` + 48 hex chars.
    pub api_key: String,
    pub title: Option<String>,
    pub greeting: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub button_text_color: Option<String>,
    pub position: WidgetPosition,
    pub enable_voice: bool,
    pub enable_chat: bool,
    /// Widget-level provider credential overrides (all optional; missing
    /// fields fall through to demo/global/environment tiers).
    pub retell_api_key: Option<String>,
    pub voice_agent_id: Option<String>,
    pub chat_agent_id: Option<String>,
    /// Domain allow-list; `None` or empty means any domain may load the widget.
    pub allowed_domains: Option<Vec<String>>,
    pub chat_type: ChatType,
    /// Customer endpoint receiving chat messages when `chat_type` is webhook.
    pub webhook_url: Option<String>,
    pub attribution_text: Option<String>,
    pub attribution_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WidgetConfig {
    /// The widget tier of the provider credential fallback chain.
    pub fn provider_overrides(&self) -> ProviderOverrides {
        ProviderOverrides {
            provider_api_key: self.retell_api_key.clone(),
            voice_agent_id: self.voice_agent_id.clone(),
            chat_agent_id: self.chat_agent_id.clone(),
        }
    }

    /// Whether chat messages for this widget are relayed to a customer
    /// webhook instead of the provider.
    pub fn uses_chat_webhook(&self) -> bool {
        self.chat_type == ChatType::Webhook && self.webhook_url.is_some()
    }
}

/// Sanitized subset of a widget configuration, safe to serve to any browser.
/// Provider credentials, agent IDs, the webhook URL and the allow-list itself
/// are deliberately absent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicWidgetConfig {
    pub id: Uuid,
    pub name: String,
    pub title: Option<String>,
    pub greeting: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub button_text_color: Option<String>,
    pub position: WidgetPosition,
    pub enable_voice: bool,
    pub enable_chat: bool,
    pub chat_type: ChatType,
    pub attribution_text: Option<String>,
    pub attribution_link: Option<String>,
}

impl From<WidgetConfig> for PublicWidgetConfig {
    fn from(w: WidgetConfig) -> Self {
        Self {
            id: w.id,
            name: w.name,
            title: w.title,
            greeting: w.greeting,
            primary_color: w.primary_color,
            secondary_color: w.secondary_color,
            background_color: w.background_color,
            text_color: w.text_color,
            button_text_color: w.button_text_color,
            position: w.position,
            enable_voice: w.enable_voice,
            enable_chat: w.enable_chat,
            chat_type: w.chat_type,
            attribution_text: w.attribution_text,
            attribution_link: w.attribution_link,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Request payload for creating a widget.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateWidgetRequest {
    pub owner_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 100, message = "Title must be at most 100 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 500, message = "Greeting must be at most 500 characters"))]
    pub greeting: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub primary_color: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub secondary_color: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub background_color: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub text_color: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub button_text_color: Option<String>,

    #[validate(custom(function = "validate_position"))]
    pub position: Option<String>,

    #[serde(default = "default_true")]
    pub enable_voice: bool,

    #[serde(default = "default_true")]
    pub enable_chat: bool,

    pub retell_api_key: Option<String>,
    pub voice_agent_id: Option<String>,
    pub chat_agent_id: Option<String>,

    #[validate(custom(function = "validate_allowed_domains"))]
    pub allowed_domains: Option<Vec<String>>,

    #[validate(custom(function = "validate_chat_type"))]
    pub chat_type: Option<String>,

    #[validate(custom(function = "validate_https_url"))]
    pub webhook_url: Option<String>,

    #[validate(length(max = 100, message = "Attribution text must be at most 100 characters"))]
    pub attribution_text: Option<String>,

    #[validate(length(max = 500, message = "Attribution link must be at most 500 characters"))]
    pub attribution_link: Option<String>,
}

/// Request payload for updating a widget (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateWidgetRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Title must be at most 100 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 500, message = "Greeting must be at most 500 characters"))]
    pub greeting: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub primary_color: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub secondary_color: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub background_color: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub text_color: Option<String>,

    #[validate(custom(function = "validate_hex_color"))]
    pub button_text_color: Option<String>,

    #[validate(custom(function = "validate_position"))]
    pub position: Option<String>,

    pub enable_voice: Option<bool>,
    pub enable_chat: Option<bool>,

    pub retell_api_key: Option<String>,
    pub voice_agent_id: Option<String>,
    pub chat_agent_id: Option<String>,

    #[validate(custom(function = "validate_allowed_domains"))]
    pub allowed_domains: Option<Vec<String>>,

    #[validate(custom(function = "validate_chat_type"))]
    pub chat_type: Option<String>,

    #[validate(custom(function = "validate_https_url"))]
    pub webhook_url: Option<String>,

    #[validate(length(max = 100, message = "Attribution text must be at most 100 characters"))]
    pub attribution_text: Option<String>,

    #[validate(length(max = 500, message = "Attribution link must be at most 500 characters"))]
    pub attribution_link: Option<String>,
}
