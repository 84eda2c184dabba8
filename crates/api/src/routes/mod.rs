//! HTTP route handlers.

pub mod calls;
pub mod chat;
pub mod health;
pub mod teams;
pub mod widget_config;
pub mod widget_embed;
pub mod widgets;
pub mod wordpress_plugin;
