//! Domain layer for the Widget Platform backend.
//!
//! This crate contains:
//! - Domain models (WidgetConfig, settings tiers, teams, chat/call DTOs)
//! - Business logic services (credential resolution, widget call flow)

pub mod models;
pub mod services;
