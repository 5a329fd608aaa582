// Helper functions shared by the session and the command handlers

use reqwest::header::{HeaderMap, HeaderValue, COOKIE, REFERER};
use std::time::Duration;
use tracing::{debug, warn};

use super::errors::SessionError;
use super::models::SessionConfig;
use super::resolver::segments;

/// Build the HTTP client every session request goes through
pub fn build_http_client(
    config: &SessionConfig,
    cookie_header: &str,
) -> Result<reqwest::Client, SessionError> {
    let mut headers = HeaderMap::new();
    let mut cookie = HeaderValue::from_str(cookie_header)
        .map_err(|_| SessionError::InvalidHeader("cookie".to_string()))?;
    cookie.set_sensitive(true);
    headers.insert(COOKIE, cookie);
    headers.insert(REFERER, HeaderValue::from_static("https://115.com/"));

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_seconds));

    if let Some(proxy_url) = config.proxy.as_deref() {
        match reqwest::Proxy::all(proxy_url) {
            Ok(proxy) => {
                debug!("[Http] using proxy {}", proxy_url);
                builder = builder.proxy(proxy);
            }
            Err(e) => {
                warn!("[Http] invalid proxy URL {}: {}", proxy_url, e);
                return Err(SessionError::Http(e));
            }
        }
    }

    Ok(builder.build()?)
}

/// Split "name.ext" into ("name", Some("ext")) with the extension lower-cased.
/// Names without a dot have no extension.
pub fn split_extension(name: &str) -> (&str, Option<String>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext.to_lowercase())),
        None => (name, None),
    }
}

/// Last path segment without its final extension: "/a/b.c.mkv" -> "b.c"
pub fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').find(|s| !s.is_empty()).unwrap_or("");
    split_extension(name).0
}

/// Directory part of a path, cleaned: "/a//b/c.mkv" -> "/a/b", "/c.mkv" -> "/"
pub fn parent_dir(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    let dir = match trimmed.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => return ".".to_string(),
    };
    let joined = segments(dir).collect::<Vec<_>>().join("/");
    if path.starts_with('/') {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}
