//! Shared constants used across the application

use std::time::Duration;

/// Backend address used when neither the command line, the environment, nor
/// the config file provides one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Wall-clock budget applied to every backend request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const CHAT_ENDPOINT: &str = "walker/task_manager";
pub const TASK_LIST_ENDPOINT: &str = "walker/get_all_tasks";

/// Environment variable that overrides the configured backend address.
pub const BASE_URL_ENV: &str = "TASKCHAT_BASE_URL";

/// Environment variable that relocates the config directory.
pub const CONFIG_DIR_ENV: &str = "TASKCHAT_CONFIG_DIR";
