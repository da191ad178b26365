//! Where the pipeline gets its posts from.

use async_trait::async_trait;
use tweetpulse_twitter::{Post, SearchError, TwitterClient};

/// A query-able source of recent posts.
///
/// A single call is one attempt; rate-limit retries are driven by the
/// pipeline, so implementations should surface [`SearchError::RateLimited`]
/// rather than wait themselves.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Post>, SearchError>;
}

#[async_trait]
impl PostSource for TwitterClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Post>, SearchError> {
        self.search_recent(query, max_results).await
    }
}
