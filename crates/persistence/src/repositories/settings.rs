//! Demo and global settings repository.
//!
//! Both tables hold a single well-known row (`id = 1`, CHECK-constrained),
//! seeded by migration. Reads go through this repository so callers receive
//! an explicit, injectable lookup rather than process-global state.

use sqlx::PgPool;

use crate::entities::{DemoSettingsEntity, GlobalSettingsEntity};

/// Stable identifier of the singleton settings rows.
const SINGLETON_ID: i16 = 1;

/// Repository for the settings tiers.
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the demo settings row.
    pub async fn get_demo(&self) -> Result<Option<DemoSettingsEntity>, sqlx::Error> {
        sqlx::query_as::<_, DemoSettingsEntity>(
            r#"
            SELECT id, retell_api_key, voice_agent_id, chat_agent_id,
                   attribution_text, attribution_link, updated_at
            FROM demo_settings
            WHERE id = $1
            "#,
        )
        .bind(SINGLETON_ID)
        .fetch_optional(&self.pool)
        .await
    }

    /// Fetch the global settings row.
    pub async fn get_global(&self) -> Result<Option<GlobalSettingsEntity>, sqlx::Error> {
        sqlx::query_as::<_, GlobalSettingsEntity>(
            r#"
            SELECT id, retell_api_key, voice_agent_id, chat_agent_id, updated_at
            FROM global_settings
            WHERE id = $1
            "#,
        )
        .bind(SINGLETON_ID)
        .fetch_optional(&self.pool)
        .await
    }
}
