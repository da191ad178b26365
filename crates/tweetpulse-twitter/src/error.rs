use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned by the search client and its retry helper.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429. `reset_at` comes from the `x-rate-limit-reset` header.
    #[error("rate limited by search provider{}", reset_suffix(.reset_at.as_ref()))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    /// The provider kept rate-limiting until the retry budget ran out.
    #[error("still rate limited after {attempts} attempts")]
    RateLimitExhausted { attempts: u32 },

    /// HTTP 401/403: bearer token rejected.
    #[error("search provider rejected credentials (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Any other non-2xx status, or a 2xx body carrying only `errors`.
    #[error("search provider error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The caller cancelled while a rate-limit cooldown was in progress.
    #[error("search cancelled during rate-limit cooldown")]
    Cancelled,
}

fn reset_suffix(reset_at: Option<&DateTime<Utc>>) -> String {
    reset_at.map_or_else(String::new, |t| {
        format!(" (resets at {})", t.format("%Y-%m-%d %H:%M:%S UTC"))
    })
}
