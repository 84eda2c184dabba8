//! Assembles credential-resolution inputs from the configuration tiers.
//!
//! The widget tier comes from the caller (already loaded for other checks);
//! demo and global tiers are read here, and the environment tier comes from
//! server configuration. The demo tier participates only when the request is
//! marked as demo traffic.

use sqlx::PgPool;

use domain::models::WidgetConfig;
use domain::services::config_resolution::ResolutionInput;
use persistence::repositories::SettingsRepository;

use crate::config::Config;
use crate::error::ApiError;

/// Build the tier chain for one proxy request.
pub async fn resolution_input_for(
    pool: &PgPool,
    config: &Config,
    widget: Option<&WidgetConfig>,
    is_demo: bool,
) -> Result<ResolutionInput, ApiError> {
    let settings_repo = SettingsRepository::new(pool.clone());

    let demo = if is_demo {
        settings_repo
            .get_demo()
            .await?
            .map(|entity| entity.into_model().provider_overrides())
    } else {
        None
    };

    let global = settings_repo
        .get_global()
        .await?
        .map(|entity| entity.into_model().provider_overrides());

    Ok(ResolutionInput {
        widget: widget.map(|w| w.provider_overrides()),
        demo,
        global,
        environment: config.provider.environment_tier(),
    })
}
