//! HTTP client for the Twitter/X API v2 recent-search endpoint.
//!
//! Wraps `reqwest` with bearer-token auth, typed response deserialization, and
//! status classification. A 429 becomes [`SearchError::RateLimited`] carrying
//! the provider's reset time; retrying is left to [`crate::retry`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode, Url};

use crate::error::SearchError;
use crate::types::{ApiProblem, Post, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com/";
const SEARCH_RECENT_PATH: &str = "2/tweets/search/recent";
const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";

/// Smallest `max_results` the recent-search endpoint accepts.
pub const MIN_PAGE_SIZE: u32 = 10;
/// Largest `max_results` the recent-search endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Client for the recent-search endpoint.
///
/// Use [`TwitterClient::new`] for production or
/// [`TwitterClient::with_base_url`] to point at a mock server in tests.
pub struct TwitterClient {
    client: Client,
    bearer_token: String,
    base_url: Url,
}

impl std::fmt::Debug for TwitterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterClient")
            .field("base_url", &self.base_url.as_str())
            .field("bearer_token", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl TwitterClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        bearer_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SearchError> {
        Self::with_base_url(bearer_token, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SearchError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        bearer_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replaces.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SearchError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            bearer_token: bearer_token.to_owned(),
            base_url,
        })
    }

    /// Fetches up to `max_results` most-recent posts matching `query`.
    ///
    /// The outbound `max_results` is clamped into the endpoint's accepted
    /// range; the returned list is truncated to the caller's bound and keeps
    /// provider order. No match yields an empty `Vec`.
    ///
    /// # Errors
    ///
    /// - [`SearchError::RateLimited`] on HTTP 429.
    /// - [`SearchError::Unauthorized`] on HTTP 401/403.
    /// - [`SearchError::Api`] on any other non-2xx status, or a 2xx body with
    ///   only an `errors` array.
    /// - [`SearchError::Http`] on network failure.
    /// - [`SearchError::Deserialize`] if the body does not match the expected shape.
    pub async fn search_recent(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<Post>, SearchError> {
        let url = self.build_search_url(query, max_results)?;
        tracing::debug!(query, max_results, "searching recent posts");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let reset_at = parse_rate_limit_reset(response.headers());
            tracing::warn!(query, reset_at = ?reset_at, "search provider rate limit hit");
            return Err(SearchError::RateLimited { reset_at });
        }

        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SearchError::Unauthorized {
                status: status.as_u16(),
                message: problem_message(&body),
            });
        }
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: problem_message(&body),
            });
        }

        let envelope: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
                context: format!("search_recent(query={query})"),
                source: e,
            })?;

        if envelope.data.is_empty() {
            if let Some(problem) = envelope.errors.first() {
                return Err(SearchError::Api {
                    status: status.as_u16(),
                    message: problem.describe(),
                });
            }
        }

        let reported = envelope.meta.map_or(0, |m| m.result_count);
        let posts: Vec<Post> = envelope
            .data
            .into_iter()
            .take(max_results as usize)
            .map(Post::from)
            .collect();

        tracing::info!(query, reported, returned = posts.len(), "search completed");
        Ok(posts)
    }

    /// Builds the recent-search URL with percent-encoded query parameters.
    fn build_search_url(&self, query: &str, max_results: u32) -> Result<Url, SearchError> {
        let mut url =
            self.base_url
                .join(SEARCH_RECENT_PATH)
                .map_err(|e| SearchError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("max_results", &page_size(max_results).to_string())
            .append_pair("tweet.fields", "text,lang");
        Ok(url)
    }
}

/// Clamps a caller's result bound into the endpoint's accepted range.
pub(crate) fn page_size(max_results: u32) -> u32 {
    max_results.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// Reads `x-rate-limit-reset` (Unix seconds) as a UTC timestamp.
pub(crate) fn parse_rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let raw = headers.get(RATE_LIMIT_RESET_HEADER)?.to_str().ok()?;
    let secs = raw.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// Extracts a human-readable message from a v2 problem body, falling back to
/// the raw body text.
fn problem_message(body: &str) -> String {
    match serde_json::from_str::<ApiProblem>(body) {
        Ok(problem) if problem.title.is_some() || problem.detail.is_some() => problem.describe(),
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.chars().take(200).collect(),
    }
}
