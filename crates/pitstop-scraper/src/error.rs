use thiserror::Error;

/// Errors returned by the award API client.
#[derive(Debug, Error)]
pub enum ScraperError {
    /// Network, timeout, or non-2xx status from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("JSON decode error for {url}: {source}")]
    Decode {
        url: String,
        /// Start of the offending body, for diagnostics.
        body_snippet: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
