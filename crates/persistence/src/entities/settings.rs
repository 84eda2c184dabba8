//! Demo and global settings entities (singleton rows).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{DemoSettings, GlobalSettings};

/// Database row mapping for the demo_settings table (always `id = 1`).
#[derive(Debug, Clone, FromRow)]
pub struct DemoSettingsEntity {
    pub id: i16,
    pub retell_api_key: Option<String>,
    pub voice_agent_id: Option<String>,
    pub chat_agent_id: Option<String>,
    pub attribution_text: Option<String>,
    pub attribution_link: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl DemoSettingsEntity {
    pub fn into_model(self) -> DemoSettings {
        DemoSettings {
            retell_api_key: self.retell_api_key,
            voice_agent_id: self.voice_agent_id,
            chat_agent_id: self.chat_agent_id,
            attribution_text: self.attribution_text,
            attribution_link: self.attribution_link,
            updated_at: self.updated_at,
        }
    }
}

/// Database row mapping for the global_settings table (always `id = 1`).
#[derive(Debug, Clone, FromRow)]
pub struct GlobalSettingsEntity {
    pub id: i16,
    pub retell_api_key: Option<String>,
    pub voice_agent_id: Option<String>,
    pub chat_agent_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl GlobalSettingsEntity {
    pub fn into_model(self) -> GlobalSettings {
        GlobalSettings {
            retell_api_key: self.retell_api_key,
            voice_agent_id: self.voice_agent_id,
            chat_agent_id: self.chat_agent_id,
            updated_at: self.updated_at,
        }
    }
}
