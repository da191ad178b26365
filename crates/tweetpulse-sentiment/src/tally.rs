//! Per-label counting of classifications.

use serde::Serialize;

use crate::types::{Classification, SentimentLabel};

/// Count of classifications per label. All three labels are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentTally {
    #[serde(rename = "POSITIVE")]
    pub positive: usize,
    #[serde(rename = "NEUTRAL")]
    pub neutral: usize,
    #[serde(rename = "NEGATIVE")]
    pub negative: usize,
}

impl SentimentTally {
    #[must_use]
    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Fraction of the total carried by `label`. `0.0` when the tally is empty.
    #[must_use]
    pub fn share(&self, label: SentimentLabel) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let share = self.get(label) as f64 / total as f64;
        share
    }

    /// `(label, count)` pairs in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = (SentimentLabel, usize)> + '_ {
        SentimentLabel::ALL
            .into_iter()
            .map(move |label| (label, self.get(label)))
    }
}

/// Counts each label in `classifications`.
///
/// Labels that never occur count as `0`; the counts always sum to
/// `classifications.len()`.
#[must_use]
pub fn tally(classifications: &[Classification]) -> SentimentTally {
    let mut counts = SentimentTally::default();
    for c in classifications {
        match c.label {
            SentimentLabel::Positive => counts.positive += 1,
            SentimentLabel::Neutral => counts.neutral += 1,
            SentimentLabel::Negative => counts.negative += 1,
        }
    }
    counts
}
