//! Handlers for each configuration key.

use super::{SettingError, SettingHandler};
use crate::core::config::data::Config;
use crate::utils::url::{is_http_url, normalize_base_url};

pub struct BaseUrlHandler;

impl SettingHandler for BaseUrlHandler {
    fn key(&self) -> &'static str {
        "base-url"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = args.join(" ");
        if input.trim().is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set the backend address, specify its URL:",
                example: "taskchat set base-url http://localhost:8000",
            });
        }
        if !is_http_url(&input) {
            return Err(SettingError::InvalidUrl(input));
        }

        let url = normalize_base_url(&input);
        config.base_url = Some(url.clone());
        Ok(format!("✅ Set base-url to: {url}"))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.base_url = None;
        "✅ Unset base-url".to_string()
    }
}

/// Data-driven handler for boolean (on/off) settings.
pub struct BooleanHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    default_display: &'static str,
    set_field: fn(&mut Config, Option<bool>),
}

impl SettingHandler for BooleanHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let input = args.join(" ");
        let value = parse_bool(&input).ok_or(SettingError::InvalidBoolean(input))?;
        (self.set_field)(config, Some(value));
        Ok(format!("✅ Set {} to: {}", self.key, format_bool(value)))
    }

    fn unset(&self, config: &mut Config) -> String {
        (self.set_field)(config, None);
        format!(
            "✅ Unset {} (will use default: {})",
            self.key, self.default_display
        )
    }
}

/// Create a handler for the `auto-load-tasks` setting.
pub fn auto_load_tasks_handler() -> BooleanHandler {
    BooleanHandler {
        key: "auto-load-tasks",
        hint: "To load tasks when chat starts, specify on or off:",
        example: "taskchat set auto-load-tasks off",
        default_display: "on",
        set_field: |c, v| c.auto_load_tasks = v,
    }
}

/// Accepts on/off, true/false, yes/no (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
