//! Feed error types.

/// Errors that can occur when loading feed data.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No API key configured
    #[error("missing API key: set TRANZY_API_KEY or FEED_DIR")]
    MissingApiKey,

    /// Authentication failed
    #[error("unauthorized: check TRANZY_API_KEY and AGENCY_ID")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status} on {section}: {message}")]
    Api {
        section: &'static str,
        status: u16,
        message: String,
    },

    /// Failed to parse response or file JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Cache or snapshot file operation failed
    #[error("cache error: {message}")]
    Cache { message: String },
}
