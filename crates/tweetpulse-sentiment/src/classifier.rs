//! Sentiment classification via a TEI (Text Embeddings Inference) server.
//!
//! [`TeiClassifier`] talks to a TEI instance serving a sequence-classification
//! model: `GET /info` at connect time, `POST /predict` per batch.
//! [`LazyClassifier`] defers that connection to the first non-empty call and
//! then reuses the same instance for the life of the process.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tweetpulse_core::AppConfig;

use crate::error::ClassifyError;
use crate::labels::LabelMap;
use crate::types::Classification;

/// Seam between the pipeline and whatever model produces labels.
///
/// Implementations return exactly one [`Classification`] per input, in input
/// order, or an error for the whole batch.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, texts: &[String]) -> Result<Vec<Classification>, ClassifyError>;
}

/// Connection settings for [`TeiClassifier`].
#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub url: String,
    pub timeout_secs: u64,
    /// Max texts per `/predict` call; TEI rejects batches above its
    /// `--max-client-batch-size` (32 by default).
    pub batch_size: usize,
    pub user_agent: String,
    pub labels: LabelMap,
}

impl ClassifierSettings {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 60,
            batch_size: 32,
            user_agent: "tweetpulse/0.1 (sentiment-analyzer)".to_string(),
            labels: LabelMap::default(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidLabelMap`] if `classifier_labels` is
    /// malformed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClassifyError> {
        let labels = match config.classifier_labels.as_deref() {
            Some(raw) => LabelMap::with_overrides(raw)?,
            None => LabelMap::default(),
        };
        Ok(Self {
            url: config.classifier_url.clone(),
            timeout_secs: config.classifier_timeout_secs,
            batch_size: config.classifier_batch_size,
            user_agent: config.user_agent.clone(),
            labels,
        })
    }
}

#[derive(Deserialize)]
struct TeiInfo {
    model_id: String,
    model_type: TeiModelType,
}

#[derive(Deserialize)]
struct TeiModelType {
    #[serde(default)]
    classifier: Option<TeiClassifierInfo>,
}

#[derive(Deserialize)]
struct TeiClassifierInfo {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    inputs: Vec<[&'a str; 1]>,
    truncate: bool,
}

#[derive(Deserialize)]
struct TeiErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct TeiScore {
    label: String,
    score: f32,
}

/// `/predict` answers a batch with nested lists, a single input with a flat one.
#[derive(Deserialize)]
#[serde(untagged)]
enum PredictResponse {
    Batch(Vec<Vec<TeiScore>>),
    Single(Vec<TeiScore>),
}

/// Classifier backed by a running TEI server.
pub struct TeiClassifier {
    client: reqwest::Client,
    predict_url: String,
    batch_size: usize,
    labels: LabelMap,
    model_id: String,
}

impl TeiClassifier {
    /// Connects to the TEI server and checks the served model.
    ///
    /// # Errors
    ///
    /// - [`ClassifyError::Http`] if the server cannot be reached.
    /// - [`ClassifyError::Unavailable`] on a non-2xx `/info` response.
    /// - [`ClassifyError::NotAClassifier`] if the model is not a classifier.
    /// - [`ClassifyError::UnknownLabel`] if the model declares a label the
    ///   label map cannot translate.
    pub async fn connect(settings: &ClassifierSettings) -> Result<Self, ClassifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&settings.user_agent)
            .build()?;
        let base = settings.url.trim_end_matches('/');

        let response = client.get(format!("{base}/info")).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClassifyError::Unavailable {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        let info: TeiInfo =
            serde_json::from_str(&body).map_err(|e| ClassifyError::Deserialize {
                context: "TEI /info".to_string(),
                source: e,
            })?;

        let Some(classifier) = info.model_type.classifier else {
            return Err(ClassifyError::NotAClassifier {
                model_id: info.model_id,
            });
        };
        settings
            .labels
            .verify(classifier.id2label.values().map(String::as_str))?;

        let mut declared: Vec<&str> = classifier.id2label.values().map(String::as_str).collect();
        declared.sort_unstable();
        tracing::info!(
            model_id = %info.model_id,
            labels = ?declared,
            "sentiment classifier loaded"
        );

        Ok(Self {
            client,
            predict_url: format!("{base}/predict"),
            batch_size: settings.batch_size.max(1),
            labels: settings.labels.clone(),
            model_id: info.model_id,
        })
    }

    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn predict_chunk(&self, chunk: &[String]) -> Result<Vec<Vec<TeiScore>>, ClassifyError> {
        let request = PredictRequest {
            inputs: chunk.iter().map(|t| [t.as_str()]).collect(),
            truncate: true,
        };
        let response = self
            .client
            .post(&self.predict_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClassifyError::Unavailable {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: PredictResponse =
            serde_json::from_str(&body).map_err(|e| ClassifyError::Deserialize {
                context: "TEI /predict".to_string(),
                source: e,
            })?;
        let scores = match parsed {
            PredictResponse::Batch(batch) => batch,
            PredictResponse::Single(single) => vec![single],
        };

        if scores.len() != chunk.len() {
            return Err(ClassifyError::LengthMismatch {
                expected: chunk.len(),
                got: scores.len(),
            });
        }
        Ok(scores)
    }
}

#[async_trait]
impl Classifier for TeiClassifier {
    /// Classifies `texts` in chunks of `batch_size`, keeping input order.
    ///
    /// The top-scoring label of each result is translated through the label
    /// map. Any chunk failure fails the whole call.
    async fn classify(&self, texts: &[String]) -> Result<Vec<Classification>, ClassifyError> {
        let mut results = Vec::with_capacity(texts.len());

        for (chunk_index, chunk) in texts.chunks(self.batch_size).enumerate() {
            let offset = chunk_index * self.batch_size;
            let scores = self.predict_chunk(chunk).await?;
            for (i, item) in scores.into_iter().enumerate() {
                let top = item
                    .into_iter()
                    .max_by(|a, b| a.score.total_cmp(&b.score))
                    .ok_or(ClassifyError::EmptyScores { index: offset + i })?;
                results.push(Classification {
                    label: self.labels.normalize(&top.label)?,
                    score: top.score,
                });
            }
        }

        tracing::debug!(
            model_id = %self.model_id,
            count = results.len(),
            "classified batch"
        );
        Ok(results)
    }
}

/// Load-once wrapper around [`TeiClassifier`].
///
/// The first non-empty [`Classifier::classify`] call connects; concurrent
/// first callers wait on the same initialization. A failed connection leaves
/// the cell empty so the next call tries again.
pub struct LazyClassifier {
    settings: ClassifierSettings,
    inner: OnceCell<TeiClassifier>,
}

impl LazyClassifier {
    #[must_use]
    pub fn new(settings: ClassifierSettings) -> Self {
        Self {
            settings,
            inner: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.initialized()
    }

    /// Returns the loaded classifier, connecting on first use.
    ///
    /// # Errors
    ///
    /// Propagates any [`TeiClassifier::connect`] failure.
    pub async fn get(&self) -> Result<&TeiClassifier, ClassifyError> {
        self.inner
            .get_or_try_init(|| async {
                tracing::info!(url = %self.settings.url, "loading sentiment classifier");
                TeiClassifier::connect(&self.settings).await
            })
            .await
    }
}

#[async_trait]
impl Classifier for LazyClassifier {
    async fn classify(&self, texts: &[String]) -> Result<Vec<Classification>, ClassifyError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.get().await?.classify(texts).await
    }
}

/// Longest slice of an upstream error body carried into [`ClassifyError`].
const MAX_ERROR_CHARS: usize = 200;

/// Pulls the `error` field out of a TEI error body, falling back to the
/// leading part of the raw text.
fn error_message(body: &str) -> String {
    let message = match serde_json::from_str::<TeiErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => return "empty response body".to_string(),
        Err(_) => body.to_string(),
    };
    message.chars().take(MAX_ERROR_CHARS).collect()
}
