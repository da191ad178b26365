//! Sentiment pipeline for tweetpulse.
//!
//! Fetches recent posts for a query through a [`PostSource`], classifies them
//! with a pretrained model served by a TEI server (see [`classifier`]), and
//! tallies the labels. [`SentimentPipeline::run`] returns a [`RunOutcome`]:
//! either `NoResults` or a `Completed` [`RunResult`] ready for presentation,
//! CSV export ([`export`]), and word-frequency views ([`words`]).

pub mod classifier;
pub mod error;
pub mod export;
pub mod labels;
pub mod pipeline;
pub mod source;
pub mod tally;
pub mod types;
pub mod words;

pub use classifier::{Classifier, ClassifierSettings, LazyClassifier, TeiClassifier};
pub use error::{ClassifyError, ExportError, PipelineError};
pub use labels::LabelMap;
pub use pipeline::SentimentPipeline;
pub use source::PostSource;
pub use tally::{tally, SentimentTally};
pub use types::{Classification, RunOutcome, RunResult, SentimentLabel};
pub use tweetpulse_twitter::{Post, RetryPolicy, SearchError, MAX_PAGE_SIZE};
