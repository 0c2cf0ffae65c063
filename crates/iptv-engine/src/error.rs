use reqwest::StatusCode;

/// Failure to retrieve a playlist document.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Server returned status code {status} for {url}")]
    Status { url: String, status: StatusCode },

    #[error("Invalid proxy configuration: {0}")]
    ProxyError(String),

    /// Both the direct and the proxied attempt failed.
    #[error("direct fetch failed: {direct}; proxy fetch failed: {proxy}")]
    Exhausted {
        direct: Box<FetchError>,
        proxy: Box<FetchError>,
    },
}

/// Saved-source persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No saved source at index {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors reported by a media sink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    /// The environment refused to start playback without a user gesture.
    #[error("autoplay blocked: {0}")]
    AutoplayBlocked(String),

    #[error("sink error: {0}")]
    Sink(String),
}
