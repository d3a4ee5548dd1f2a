//! Error types for content lookups

/// Error from a Content Source lookup
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// Server returned an error status.
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading a local snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No entity with this id.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    /// A redirect pointed outside the allowed image locations.
    #[error("redirect to disallowed URL: {url}")]
    Disallowed { url: String },

    /// Redirect chain longer than the image fetcher follows.
    #[error("too many redirects")]
    TooManyRedirects,
}
