//! URL utilities for consistent URL handling
//!
//! The backend address comes from flags, the environment, or the config file,
//! and any of those may carry trailing slashes. These helpers keep endpoint
//! URLs free of double slashes.

/// Normalize a base URL by trimming whitespace and trailing slashes
///
/// # Examples
///
/// ```
/// use taskchat::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// assert_eq!(normalize_base_url(" http://localhost:8000/// "), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Construct a complete endpoint URL from a base URL and endpoint path
///
/// # Examples
///
/// ```
/// use taskchat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000", "walker/task_manager"),
///     "http://localhost:8000/walker/task_manager"
/// );
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/walker/get_all_tasks"),
///     "http://localhost:8000/walker/get_all_tasks"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Returns true when the URL uses a scheme reqwest can talk to.
pub fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://") || url.starts_with("https://")
}
