//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a [`SettingHandler`] that validates input and
//! edits a [`Config`] in memory; [`apply_set`] and [`apply_unset`] wrap the
//! load and save around it.

pub mod error;
pub mod handlers;

pub use error::SettingError;

use crate::core::config::data::Config;
use handlers::{auto_load_tasks_handler, BaseUrlHandler};

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the configuration value, returning the message to display.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Unset (clear) the configuration value, returning the message to display.
    fn unset(&self, config: &mut Config) -> String;
}

/// Registry of all available setting handlers, in display order.
pub struct SettingRegistry {
    handlers: Vec<Box<dyn SettingHandler>>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        Self {
            handlers: vec![Box::new(BaseUrlHandler), Box::new(auto_load_tasks_handler())],
        }
    }

    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.key() == key)
            .map(|handler| handler.as_ref())
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.key()).collect()
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads the config, applies `set`, and saves it.
pub fn apply_set(key: &str, args: &[String]) -> Result<String, SettingError> {
    let registry = SettingRegistry::new();
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;

    let mut config = Config::load().map_err(|e| SettingError::ConfigError(e.to_string()))?;
    let message = handler.set(args, &mut config)?;
    config
        .save()
        .map_err(|e| SettingError::ConfigError(e.to_string()))?;
    Ok(message)
}

/// Loads the config, applies `unset`, and saves it.
pub fn apply_unset(key: &str) -> Result<String, SettingError> {
    let registry = SettingRegistry::new();
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;

    let mut config = Config::load().map_err(|e| SettingError::ConfigError(e.to_string()))?;
    let message = handler.unset(&mut config);
    config
        .save()
        .map_err(|e| SettingError::ConfigError(e.to_string()))?;
    Ok(message)
}
