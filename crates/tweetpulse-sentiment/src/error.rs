use thiserror::Error;
use tweetpulse_twitter::SearchError;

/// Failures from the sentiment classifier. A failed batch yields no results.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The classification server answered with a non-2xx status.
    #[error("classifier returned HTTP {status}: {message}")]
    Unavailable { status: u16, message: String },

    /// The served model is not a sequence classifier (e.g. an embedding model).
    #[error("model '{model_id}' is not a text classifier")]
    NotAClassifier { model_id: String },

    /// The model emitted a label the label map cannot translate.
    #[error("unrecognized sentiment label '{0}'")]
    UnknownLabel(String),

    #[error("invalid label map: {0}")]
    InvalidLabelMap(String),

    #[error("classifier returned {got} results for {expected} inputs")]
    LengthMismatch { expected: usize, got: usize },

    #[error("classifier returned no scores for input {index}")]
    EmptyScores { index: usize },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures that halt a pipeline run. No partial results accompany them.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("error fetching tweets: {0}")]
    Search(#[from] SearchError),

    #[error("error analyzing sentiment: {0}")]
    Classify(#[from] ClassifyError),
}

impl PipelineError {
    /// Stable machine-readable code used by the HTTP surface.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::EmptyQuery => "validation_error",
            PipelineError::Search(
                SearchError::RateLimitExhausted { .. } | SearchError::RateLimited { .. },
            ) => "rate_limited",
            PipelineError::Search(SearchError::Cancelled) => "cancelled",
            PipelineError::Search(_) => "upstream_error",
            PipelineError::Classify(_) => "classification_error",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_error_codes() {
        assert_eq!(PipelineError::EmptyQuery.code(), "validation_error");
        assert_eq!(
            PipelineError::Search(SearchError::RateLimitExhausted { attempts: 3 }).code(),
            "rate_limited"
        );
        assert_eq!(
            PipelineError::Search(SearchError::Api {
                status: 500,
                message: "boom".to_string()
            })
            .code(),
            "upstream_error"
        );
        assert_eq!(
            PipelineError::Classify(ClassifyError::UnknownLabel("LABEL_9".to_string())).code(),
            "classification_error"
        );
    }

    #[test]
    fn search_error_message_is_prefixed() {
        let err = PipelineError::Search(SearchError::RateLimitExhausted { attempts: 3 });
        assert_eq!(
            err.to_string(),
            "error fetching tweets: still rate limited after 3 attempts"
        );
    }
}
