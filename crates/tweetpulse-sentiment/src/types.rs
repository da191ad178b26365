use serde::{Deserialize, Serialize};
use tweetpulse_twitter::Post;

use crate::error::ClassifyError;
use crate::tally::{tally, SentimentTally};

/// The fixed sentiment vocabulary every model label is translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// All labels in presentation order.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Neutral => "NEUTRAL",
            SentimentLabel::Negative => "NEGATIVE",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SentimentLabel {
    type Err = ClassifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Ok(SentimentLabel::Positive),
            "NEUTRAL" => Ok(SentimentLabel::Neutral),
            "NEGATIVE" => Ok(SentimentLabel::Negative),
            _ => Err(ClassifyError::UnknownLabel(s.to_string())),
        }
    }
}

/// One (label, confidence) pair for one post.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub label: SentimentLabel,
    /// Model confidence; expected in `[0, 1]` but not validated.
    pub score: f32,
}

/// Output of one completed pipeline run.
///
/// `posts[i]` and `classifications[i]` always describe the same post.
#[derive(Debug, Clone)]
pub struct RunResult {
    query: String,
    posts: Vec<Post>,
    classifications: Vec<Classification>,
    tally: SentimentTally,
}

impl RunResult {
    /// Pairs posts with their classifications and tallies them.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::LengthMismatch`] if the two sequences differ
    /// in length.
    pub fn new(
        query: impl Into<String>,
        posts: Vec<Post>,
        classifications: Vec<Classification>,
    ) -> Result<Self, ClassifyError> {
        if posts.len() != classifications.len() {
            return Err(ClassifyError::LengthMismatch {
                expected: posts.len(),
                got: classifications.len(),
            });
        }
        let tally = tally(&classifications);
        Ok(Self {
            query: query.into(),
            posts,
            classifications,
            tally,
        })
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    #[must_use]
    pub fn classifications(&self) -> &[Classification] {
        &self.classifications
    }

    #[must_use]
    pub fn tally(&self) -> &SentimentTally {
        &self.tally
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Aligned (post, classification) pairs in fetch order.
    pub fn rows(&self) -> impl Iterator<Item = (&Post, &Classification)> {
        self.posts.iter().zip(self.classifications.iter())
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.posts.iter().map(|p| p.text.as_str())
    }
}

/// Terminal state of a pipeline run that did not fail.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The search matched nothing; the classifier was not invoked.
    NoResults { query: String },
    Completed(RunResult),
}

impl RunOutcome {
    #[must_use]
    pub fn completed(self) -> Option<RunResult> {
        match self {
            RunOutcome::Completed(result) => Some(result),
            RunOutcome::NoResults { .. } => None,
        }
    }

    #[must_use]
    pub fn is_no_results(&self) -> bool {
        matches!(self, RunOutcome::NoResults { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(label: SentimentLabel, score: f32) -> Classification {
        Classification { label, score }
    }

    #[test]
    fn label_serializes_uppercase() {
        let json = serde_json::to_string(&SentimentLabel::Neutral).unwrap();
        assert_eq!(json, "\"NEUTRAL\"");
    }

    #[test]
    fn label_parses_case_insensitively() {
        assert_eq!(
            "positive".parse::<SentimentLabel>().unwrap(),
            SentimentLabel::Positive
        );
        assert_eq!(
            " Negative ".parse::<SentimentLabel>().unwrap(),
            SentimentLabel::Negative
        );
        assert!("mixed".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn run_result_rejects_misaligned_sequences() {
        let result = RunResult::new(
            "q",
            vec![Post::from_text("a"), Post::from_text("b")],
            vec![classification(SentimentLabel::Positive, 0.9)],
        );
        assert!(matches!(
            result,
            Err(ClassifyError::LengthMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn run_result_rows_stay_aligned() {
        let result = RunResult::new(
            "q",
            vec![Post::from_text("good"), Post::from_text("bad")],
            vec![
                classification(SentimentLabel::Positive, 0.9),
                classification(SentimentLabel::Negative, 0.8),
            ],
        )
        .unwrap();
        let rows: Vec<(&str, SentimentLabel)> = result
            .rows()
            .map(|(p, c)| (p.text.as_str(), c.label))
            .collect();
        assert_eq!(
            rows,
            [
                ("good", SentimentLabel::Positive),
                ("bad", SentimentLabel::Negative)
            ]
        );
        assert_eq!(result.tally().total(), 2);
    }
}
