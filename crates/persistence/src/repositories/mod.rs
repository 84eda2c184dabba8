//! Repository implementations.

pub mod settings;
pub mod team;
pub mod widget_config;

pub use settings::SettingsRepository;
pub use team::TeamRepository;
pub use widget_config::WidgetConfigRepository;
