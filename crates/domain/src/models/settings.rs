//! Demo and global settings tiers.
//!
//! Both are singleton database rows with a stable identifier, read through
//! explicit repository lookups. They supply fallback provider credentials
//! when a widget does not carry its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::widget_config::ProviderOverrides;

/// Settings backing demo traffic (`is_demo` requests).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DemoSettings {
    pub retell_api_key: Option<String>,
    pub voice_agent_id: Option<String>,
    pub chat_agent_id: Option<String>,
    pub attribution_text: Option<String>,
    pub attribution_link: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl DemoSettings {
    /// The demo tier of the provider credential fallback chain.
    pub fn provider_overrides(&self) -> ProviderOverrides {
        ProviderOverrides {
            provider_api_key: self.retell_api_key.clone(),
            voice_agent_id: self.voice_agent_id.clone(),
            chat_agent_id: self.chat_agent_id.clone(),
        }
    }
}

/// Account-wide default settings, the lowest database-backed tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GlobalSettings {
    pub retell_api_key: Option<String>,
    pub voice_agent_id: Option<String>,
    pub chat_agent_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl GlobalSettings {
    /// The global tier of the provider credential fallback chain.
    pub fn provider_overrides(&self) -> ProviderOverrides {
        ProviderOverrides {
            provider_api_key: self.retell_api_key.clone(),
            voice_agent_id: self.voice_agent_id.clone(),
            chat_agent_id: self.chat_agent_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_settings_overrides() {
        let settings = DemoSettings {
            retell_api_key: Some("key_demo".to_string()),
            voice_agent_id: None,
            chat_agent_id: Some("agent_demo_chat".to_string()),
            attribution_text: None,
            attribution_link: None,
            updated_at: Utc::now(),
        };
        let tier = settings.provider_overrides();
        assert_eq!(tier.provider_api_key.as_deref(), Some("key_demo"));
        assert_eq!(tier.voice_agent_id, None);
        assert_eq!(tier.chat_agent_id.as_deref(), Some("agent_demo_chat"));
    }

    #[test]
    fn test_global_settings_overrides() {
        let settings = GlobalSettings {
            retell_api_key: None,
            voice_agent_id: Some("agent_global_voice".to_string()),
            chat_agent_id: None,
            updated_at: Utc::now(),
        };
        let tier = settings.provider_overrides();
        assert_eq!(tier.provider_api_key, None);
        assert_eq!(tier.voice_agent_id.as_deref(), Some("agent_global_voice"));
    }
}
