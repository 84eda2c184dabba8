//! Provider credential resolution.
//!
//! Resolves the effective provider API key and agent ID for a request from a
//! chain of configuration tiers:
//! 1. Widget-level overrides (the row matching the request's API key)
//! 2. Demo settings (only when the request is marked as demo traffic)
//! 3. Global settings
//! 4. Environment defaults
//!
//! Fields resolve independently: a widget may carry its own provider API key
//! while its agent ID falls through to the global tier. The winning tier is
//! recorded per field for log correlation; resolution failures carry no
//! configuration detail because the API layer surfaces them generically.

use serde::Serialize;
use thiserror::Error;

use crate::models::widget_config::ProviderOverrides;

/// Which kind of agent a request needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Voice,
    Chat,
}

/// Configuration tier a resolved field came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigTier {
    Widget,
    Demo,
    Global,
    Environment,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Widget => write!(f, "widget"),
            Self::Demo => write!(f, "demo"),
            Self::Global => write!(f, "global"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// Input tiers for a resolution, highest priority first.
#[derive(Debug, Clone, Default)]
pub struct ResolutionInput {
    /// Widget-level overrides, when the request carried a widget API key.
    pub widget: Option<ProviderOverrides>,
    /// Demo settings, when the request was marked as demo traffic.
    pub demo: Option<ProviderOverrides>,
    /// Global settings row, when present.
    pub global: Option<ProviderOverrides>,
    /// Environment-variable defaults, always consulted last.
    pub environment: ProviderOverrides,
}

/// Effective provider credentials with per-field provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub api_key: String,
    pub agent_id: String,
    pub api_key_tier: ConfigTier,
    pub agent_id_tier: ConfigTier,
}

/// Resolution failure. Deliberately does not describe which tiers were
/// consulted; callers translate this to a generic "service not configured".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("no provider API key configured at any tier")]
    MissingApiKey,
    #[error("no {0} agent configured at any tier")]
    MissingAgentId(&'static str),
}

/// Resolve effective provider credentials for the given agent kind.
pub fn resolve_provider(
    input: &ResolutionInput,
    kind: AgentKind,
) -> Result<ResolvedProvider, ResolutionError> {
    let (api_key, api_key_tier) =
        first_some(input, |tier| tier.provider_api_key.as_deref()).ok_or(ResolutionError::MissingApiKey)?;

    let (agent_id, agent_id_tier) = match kind {
        AgentKind::Voice => first_some(input, |tier| tier.voice_agent_id.as_deref())
            .ok_or(ResolutionError::MissingAgentId("voice"))?,
        AgentKind::Chat => first_some(input, |tier| tier.chat_agent_id.as_deref())
            .ok_or(ResolutionError::MissingAgentId("chat"))?,
    };

    Ok(ResolvedProvider {
        api_key: api_key.to_string(),
        agent_id: agent_id.to_string(),
        api_key_tier,
        agent_id_tier,
    })
}

/// Walk the tiers in priority order and return the first non-null value of a
/// single field, together with the tier that supplied it.
fn first_some<'a, F>(input: &'a ResolutionInput, field: F) -> Option<(&'a str, ConfigTier)>
where
    F: Fn(&'a ProviderOverrides) -> Option<&'a str>,
{
    let tiers = [
        (input.widget.as_ref(), ConfigTier::Widget),
        (input.demo.as_ref(), ConfigTier::Demo),
        (input.global.as_ref(), ConfigTier::Global),
        (Some(&input.environment), ConfigTier::Environment),
    ];

    for (overrides, tier) in tiers {
        if let Some(value) = overrides.and_then(&field) {
            if !value.is_empty() {
                return Some((value, tier));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(
        api_key: Option<&str>,
        voice: Option<&str>,
        chat: Option<&str>,
    ) -> ProviderOverrides {
        ProviderOverrides {
            provider_api_key: api_key.map(String::from),
            voice_agent_id: voice.map(String::from),
            chat_agent_id: chat.map(String::from),
        }
    }

    #[test]
    fn test_resolve_empty_input_fails() {
        let input = ResolutionInput::default();
        assert_eq!(
            resolve_provider(&input, AgentKind::Voice),
            Err(ResolutionError::MissingApiKey)
        );
    }

    #[test]
    fn test_environment_defaults_win_when_alone() {
        let input = ResolutionInput {
            environment: overrides(Some("key_env"), Some("agent_env_voice"), None),
            ..Default::default()
        };
        let resolved = resolve_provider(&input, AgentKind::Voice).unwrap();
        assert_eq!(resolved.api_key, "key_env");
        assert_eq!(resolved.agent_id, "agent_env_voice");
        assert_eq!(resolved.api_key_tier, ConfigTier::Environment);
        assert_eq!(resolved.agent_id_tier, ConfigTier::Environment);
    }

    #[test]
    fn test_widget_tier_wins_over_all() {
        let input = ResolutionInput {
            widget: Some(overrides(Some("key_widget"), Some("agent_widget"), None)),
            demo: Some(overrides(Some("key_demo"), Some("agent_demo"), None)),
            global: Some(overrides(Some("key_global"), Some("agent_global"), None)),
            environment: overrides(Some("key_env"), Some("agent_env"), None),
        };
        let resolved = resolve_provider(&input, AgentKind::Voice).unwrap();
        assert_eq!(resolved.api_key, "key_widget");
        assert_eq!(resolved.agent_id, "agent_widget");
        assert_eq!(resolved.api_key_tier, ConfigTier::Widget);
    }

    #[test]
    fn test_demo_beats_global_beats_environment() {
        let input = ResolutionInput {
            widget: None,
            demo: Some(overrides(Some("key_demo"), None, None)),
            global: Some(overrides(Some("key_global"), Some("agent_global"), None)),
            environment: overrides(Some("key_env"), Some("agent_env"), None),
        };
        let resolved = resolve_provider(&input, AgentKind::Voice).unwrap();
        assert_eq!(resolved.api_key, "key_demo");
        assert_eq!(resolved.api_key_tier, ConfigTier::Demo);
        // Demo has no voice agent, so the agent falls through to global.
        assert_eq!(resolved.agent_id, "agent_global");
        assert_eq!(resolved.agent_id_tier, ConfigTier::Global);
    }

    #[test]
    fn test_fields_resolve_independently() {
        // A widget supplies its own API key but no agent; the agent must come
        // from a lower tier without dragging the API key down with it.
        let input = ResolutionInput {
            widget: Some(overrides(Some("key_widget"), None, None)),
            demo: None,
            global: Some(overrides(Some("key_global"), Some("agent_global_voice"), None)),
            environment: overrides(Some("key_env"), Some("agent_env_voice"), None),
        };
        let resolved = resolve_provider(&input, AgentKind::Voice).unwrap();
        assert_eq!(resolved.api_key, "key_widget");
        assert_eq!(resolved.api_key_tier, ConfigTier::Widget);
        assert_eq!(resolved.agent_id, "agent_global_voice");
        assert_eq!(resolved.agent_id_tier, ConfigTier::Global);
    }

    #[test]
    fn test_agent_kind_selects_field() {
        let input = ResolutionInput {
            widget: Some(overrides(
                Some("key_widget"),
                Some("agent_voice"),
                Some("agent_chat"),
            )),
            ..Default::default()
        };
        assert_eq!(
            resolve_provider(&input, AgentKind::Voice).unwrap().agent_id,
            "agent_voice"
        );
        assert_eq!(
            resolve_provider(&input, AgentKind::Chat).unwrap().agent_id,
            "agent_chat"
        );
    }

    #[test]
    fn test_missing_agent_for_requested_kind() {
        let input = ResolutionInput {
            global: Some(overrides(Some("key_global"), Some("agent_voice"), None)),
            ..Default::default()
        };
        assert_eq!(
            resolve_provider(&input, AgentKind::Chat),
            Err(ResolutionError::MissingAgentId("chat"))
        );
    }

    #[test]
    fn test_empty_string_treated_as_absent() {
        // Dashboard form submissions can persist empty strings; they must not
        // shadow lower tiers.
        let input = ResolutionInput {
            widget: Some(overrides(Some(""), None, None)),
            global: Some(overrides(Some("key_global"), Some("agent_global"), None)),
            ..Default::default()
        };
        let resolved = resolve_provider(&input, AgentKind::Voice).unwrap();
        assert_eq!(resolved.api_key, "key_global");
        assert_eq!(resolved.api_key_tier, ConfigTier::Global);
    }

    #[test]
    fn test_demo_tier_skipped_when_absent() {
        let input = ResolutionInput {
            widget: None,
            demo: None,
            global: Some(overrides(Some("key_global"), Some("agent_global"), None)),
            environment: overrides(Some("key_env"), Some("agent_env"), None),
        };
        let resolved = resolve_provider(&input, AgentKind::Voice).unwrap();
        assert_eq!(resolved.api_key_tier, ConfigTier::Global);
    }

    #[test]
    fn test_config_tier_display() {
        assert_eq!(ConfigTier::Widget.to_string(), "widget");
        assert_eq!(ConfigTier::Demo.to_string(), "demo");
        assert_eq!(ConfigTier::Global.to_string(), "global");
        assert_eq!(ConfigTier::Environment.to_string(), "environment");
    }

    #[test]
    fn test_resolution_error_messages_are_generic() {
        // Error text must not leak tier contents.
        let err = ResolutionError::MissingApiKey.to_string();
        assert!(!err.contains("key_"));
        let err = ResolutionError::MissingAgentId("voice").to_string();
        assert!(err.contains("voice"));
        assert!(!err.contains("agent_"));
    }
}
