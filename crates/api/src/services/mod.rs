//! Outbound services and generators.

pub mod chat_webhook;
pub mod embed;
pub mod resolution;
pub mod retell;
pub mod wordpress;

pub use chat_webhook::ChatWebhookRelay;
pub use retell::RetellClient;
