//! Sentiment pipeline orchestration.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tweetpulse_core::AppConfig;
use tweetpulse_twitter::{retry_on_rate_limit, RetryPolicy, TwitterClient};

use crate::classifier::{Classifier, ClassifierSettings, LazyClassifier};
use crate::error::PipelineError;
use crate::source::PostSource;
use crate::types::{RunOutcome, RunResult};

/// Default number of posts requested per run.
pub const DEFAULT_MAX_RESULTS: u32 = 20;

/// Search, classify, tally.
///
/// Holds its collaborators behind trait objects so the same controller runs
/// against the live Twitter/TEI pair or against stubs.
pub struct SentimentPipeline {
    source: Arc<dyn PostSource>,
    classifier: Arc<dyn Classifier>,
    retry: RetryPolicy,
    max_results: u32,
}

impl SentimentPipeline {
    #[must_use]
    pub fn new(source: Arc<dyn PostSource>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            source,
            classifier,
            retry: RetryPolicy::default(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Wires the live Twitter client and a lazily-connected TEI classifier.
    ///
    /// Nothing is contacted here; the classifier connects on first use.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Search`] if the Twitter client cannot be built.
    /// - [`PipelineError::Classify`] if the label map override is malformed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let source = TwitterClient::with_base_url(
            &config.twitter_bearer_token,
            config.request_timeout_secs,
            &config.user_agent,
            &config.twitter_base_url,
        )?;
        let classifier = LazyClassifier::new(ClassifierSettings::from_app_config(config)?);
        let retry = RetryPolicy::new(
            config.rate_limit_max_attempts,
            Duration::from_secs(config.rate_limit_cooldown_secs),
            Duration::from_secs(config.rate_limit_max_cooldown_secs),
        );

        Ok(Self::new(Arc::new(source), Arc::new(classifier))
            .with_retry_policy(retry)
            .with_max_results(config.max_results))
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    /// Runs one query with the configured defaults and no cancellation.
    ///
    /// # Errors
    ///
    /// See [`SentimentPipeline::run_with`].
    pub async fn run(&self, query: &str) -> Result<RunOutcome, PipelineError> {
        self.run_with(query, self.max_results, &CancellationToken::new())
            .await
    }

    /// Runs the full pipeline for one query.
    ///
    /// 1. Search for up to `max_results` recent posts, cooling down and
    ///    retrying while the source reports a rate limit.
    /// 2. If nothing matched, stop with [`RunOutcome::NoResults`]; the
    ///    classifier is never touched.
    /// 3. Classify every post text in one batch, in fetch order.
    /// 4. Pair and tally into a [`RunResult`].
    ///
    /// # Errors
    ///
    /// - [`PipelineError::EmptyQuery`] for a blank query. A non-blank query is
    ///   sent to the source exactly as given.
    /// - [`PipelineError::Search`] for a search failure, an exhausted
    ///   rate-limit budget, or cancellation during a cooldown.
    /// - [`PipelineError::Classify`] if the batch cannot be classified.
    pub async fn run_with(
        &self,
        query: &str,
        max_results: u32,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, PipelineError> {
        if query.trim().is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        tracing::info!(query, max_results, "fetching tweets");
        let posts = retry_on_rate_limit(&self.retry, cancel, || {
            self.source.search(query, max_results)
        })
        .await
        .inspect_err(|e| tracing::error!(query, error = %e, "tweet search failed"))?;

        if posts.is_empty() {
            tracing::info!(query, "no tweets found");
            return Ok(RunOutcome::NoResults {
                query: query.to_string(),
            });
        }

        tracing::info!(query, count = posts.len(), "analyzing sentiment");
        let texts: Vec<String> = posts.iter().map(|p| p.text.clone()).collect();
        let classifications = self
            .classifier
            .classify(&texts)
            .await
            .inspect_err(|e| tracing::error!(query, error = %e, "sentiment analysis failed"))?;

        let result = RunResult::new(query, posts, classifications)?;
        let tally = result.tally();
        tracing::info!(
            query,
            total = tally.total(),
            positive = tally.positive,
            neutral = tally.neutral,
            negative = tally.negative,
            "analysis completed"
        );
        Ok(RunOutcome::Completed(result))
    }
}
