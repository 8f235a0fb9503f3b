use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::constants::{BASE_URL_ENV, DEFAULT_BASE_URL};
use crate::utils::url::normalize_base_url;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend address (e.g., "http://localhost:8000")
    pub base_url: Option<String>,
    /// Load the task list once when the interactive prompt starts
    pub auto_load_tasks: Option<bool>,
}

/// Where the effective backend address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrlSource {
    Flag,
    Environment,
    ConfigFile,
    Default,
}

impl BaseUrlSource {
    pub fn describe(self) -> &'static str {
        match self {
            BaseUrlSource::Flag => "--base-url",
            BaseUrlSource::Environment => BASE_URL_ENV,
            BaseUrlSource::ConfigFile => "config file",
            BaseUrlSource::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBaseUrl {
    pub url: String,
    pub source: BaseUrlSource,
}

impl Config {
    /// Picks the backend address: flag, then environment, then config file,
    /// then the built-in default. Blank values are skipped.
    pub fn resolve_base_url(&self, flag: Option<&str>) -> ResolvedBaseUrl {
        let env = std::env::var(BASE_URL_ENV).ok();
        self.resolve_base_url_with(flag, env.as_deref())
    }

    pub(crate) fn resolve_base_url_with(
        &self,
        flag: Option<&str>,
        env: Option<&str>,
    ) -> ResolvedBaseUrl {
        let candidates = [
            (flag, BaseUrlSource::Flag),
            (env, BaseUrlSource::Environment),
            (self.base_url.as_deref(), BaseUrlSource::ConfigFile),
        ];

        candidates
            .into_iter()
            .find_map(|(value, source)| {
                let url = normalize_base_url(value?);
                (!url.is_empty()).then_some(ResolvedBaseUrl { url, source })
            })
            .unwrap_or_else(|| ResolvedBaseUrl {
                url: DEFAULT_BASE_URL.to_string(),
                source: BaseUrlSource::Default,
            })
    }

    pub fn auto_load_tasks(&self) -> bool {
        self.auto_load_tasks.unwrap_or(true)
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/taskchat/config.toml` → `~/.config/taskchat/config.toml`
/// - Windows: paths are shown unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
