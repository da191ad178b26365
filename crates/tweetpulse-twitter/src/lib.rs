//! Client for the Twitter/X API v2 recent-search endpoint.
//!
//! [`TwitterClient::search_recent`] performs a single request and reports a
//! 429 as [`SearchError::RateLimited`]. Callers that want the cooldown-and-retry
//! behavior wrap it with [`retry_on_rate_limit`] and a [`RetryPolicy`].

pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::{TwitterClient, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
pub use error::SearchError;
pub use retry::{retry_on_rate_limit, RetryPolicy};
pub use types::Post;
