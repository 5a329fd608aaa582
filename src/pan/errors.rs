// Error types for the 115 session and the path/stream core

use thiserror::Error;

/// Failure of a single backend round trip.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Connection, TLS, timeout or non-2xx status
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered but refused the call (`state == false`)
    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },

    /// Response body was not the JSON we expect
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A header value (cookie, user agent) contains illegal characters
    #[error("invalid header value: {0}")]
    InvalidHeader(String),
}

impl SessionError {
    /// Build an API error, falling back to a generic message when the backend sent none.
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "request rejected".to_string()
        } else {
            message
        };
        Self::Api { code, message }
    }
}

/// Terminal error of one CLI invocation.
#[derive(Debug, Error)]
pub enum PanError {
    /// Cookie file missing, unreadable or malformed
    #[error("failed to initialise client: {0}")]
    Credentials(String),

    /// Client construction or login check failed
    #[error("failed to initialise client: {0}")]
    SessionInit(#[source] SessionError),

    /// Listing a directory's children failed
    #[error("failed to list directory {directory}: {source}")]
    List {
        directory: String,
        #[source]
        source: SessionError,
    },

    /// A path segment has no matching subdirectory
    #[error("path not found: no directory named '{segment}'")]
    PathNotFound { segment: String },

    /// Malformed path, e.g. a bare file name with no '/'
    #[error("invalid file path: {0}")]
    InvalidPath(String),

    /// The named file is absent from the resolved directory
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// Download link issuance failed for the `play` action
    #[error("failed to get download link: {0}")]
    DownloadLink(#[source] SessionError),

    /// Neither the source link nor the adaptive manifest produced a URL
    #[error("no playable streams found")]
    NoStreamsFound,

    /// Missing or unrecognised CLI input
    #[error("{0}")]
    Usage(String),
}
