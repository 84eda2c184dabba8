//! Request extractors.

pub mod widget_key;

pub use widget_key::WidgetApiKey;
