//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, ServerConfig, BotConfig, ApiConfig)
//! - [`defaults`]: serde default values
//! - [`validation`]: startup checks that report every problem at once

mod defaults;
mod types;
mod validation;

pub use types::{ApiConfig, BotConfig, Config, ConfigError, PASSWORD_ENV, ServerConfig};
pub use validation::{ValidationError, validate};
