//! Translation from model-specific label spellings to [`SentimentLabel`].
//!
//! The default map covers `cardiffnlp/twitter-roberta-base-sentiment`, which
//! emits `LABEL_0`/`LABEL_1`/`LABEL_2` for negative/neutral/positive, plus the
//! plain-word spellings used by most other sentiment heads. Lookups are
//! case-insensitive.

use std::collections::HashMap;

use crate::error::ClassifyError;
use crate::types::SentimentLabel;

const DEFAULT_ENTRIES: &[(&str, SentimentLabel)] = &[
    ("label_0", SentimentLabel::Negative),
    ("label_1", SentimentLabel::Neutral),
    ("label_2", SentimentLabel::Positive),
    ("negative", SentimentLabel::Negative),
    ("neg", SentimentLabel::Negative),
    ("neutral", SentimentLabel::Neutral),
    ("neu", SentimentLabel::Neutral),
    ("positive", SentimentLabel::Positive),
    ("pos", SentimentLabel::Positive),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    entries: HashMap<String, SentimentLabel>,
}

impl Default for LabelMap {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES
                .iter()
                .map(|&(raw, label)| (raw.to_string(), label))
                .collect(),
        }
    }
}

impl LabelMap {
    /// Default map extended (or overridden) by `RAW=LABEL` pairs separated by
    /// commas, e.g. `LABEL_0=NEGATIVE,LABEL_1=NEUTRAL,LABEL_2=POSITIVE`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidLabelMap`] for a malformed pair or a
    /// target outside the fixed vocabulary.
    pub fn with_overrides(raw: &str) -> Result<Self, ClassifyError> {
        let mut map = Self::default();
        for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (model_label, target) = pair.split_once('=').ok_or_else(|| {
                ClassifyError::InvalidLabelMap(format!("expected RAW=LABEL, got '{pair}'"))
            })?;
            let model_label = model_label.trim();
            if model_label.is_empty() {
                return Err(ClassifyError::InvalidLabelMap(format!(
                    "empty model label in '{pair}'"
                )));
            }
            let target = target
                .parse::<SentimentLabel>()
                .map_err(|_| ClassifyError::InvalidLabelMap(format!("unknown target in '{pair}'")))?;
            map.entries.insert(model_label.to_lowercase(), target);
        }
        Ok(map)
    }

    /// Translates one model label.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::UnknownLabel`] if the label is not mapped.
    pub fn normalize(&self, raw: &str) -> Result<SentimentLabel, ClassifyError> {
        self.entries
            .get(&raw.trim().to_lowercase())
            .copied()
            .ok_or_else(|| ClassifyError::UnknownLabel(raw.to_string()))
    }

    /// Checks that every label a model declares can be translated.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::UnknownLabel`] for the first unmapped label.
    pub fn verify<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> Result<(), ClassifyError> {
        for label in labels {
            self.normalize(label)?;
        }
        Ok(())
    }
}
