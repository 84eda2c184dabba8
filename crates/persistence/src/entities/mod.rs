//! Database entity definitions (row mappings).

pub mod settings;
pub mod team;
pub mod widget_config;

pub use settings::{DemoSettingsEntity, GlobalSettingsEntity};
pub use team::{TeamEntity, TeamMemberEntity};
pub use widget_config::WidgetConfigEntity;
