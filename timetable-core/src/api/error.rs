//! Timetable API error types.

/// Errors from fetching timetable data.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Response parsed but did not form a valid line
    #[error("invalid data: {0}")]
    Conversion(#[from] super::convert::ConversionError),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The line does not exist for this mode
    #[error("line not found")]
    NotFound,

    /// Rate limited by the API
    #[error("rate limited by timetable API")]
    RateLimited,

    /// Invalid API key or unauthorized
    #[error("unauthorized (invalid API key)")]
    Unauthorized,
}

impl ApiError {
    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http(_) | ApiError::RateLimited => true,
            ApiError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
