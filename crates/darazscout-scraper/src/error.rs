use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("completion API error: {reason}")]
    Llm { reason: String },

    #[error("model reply for {context} is not valid JSON: {source}")]
    ExtractionFormat {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed extraction: {reason}")]
    MalformedExtraction { reason: String },

    #[error("CSV export error: {0}")]
    Export(#[from] csv::Error),
}

impl ScraperError {
    /// `true` for failures reaching the target page (transport, HTTP status,
    /// bad URL), as opposed to failures in the completion or decoding steps.
    #[must_use]
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            ScraperError::Http(_)
                | ScraperError::RateLimited { .. }
                | ScraperError::NotFound { .. }
                | ScraperError::UnexpectedStatus { .. }
                | ScraperError::InvalidUrl { .. }
        )
    }
}
