//! Wire types for the recent-search endpoint and the [`Post`] handed to callers.

use serde::{Deserialize, Serialize};

/// A single fetched post. Only `text` feeds the sentiment pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: Option<String>,
    pub text: String,
    pub lang: Option<String>,
}

impl Post {
    /// Builds a post from bare text, as used by non-Twitter sources and tests.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            lang: None,
        }
    }
}

/// Envelope of `GET /2/tweets/search/recent`.
///
/// `data` is absent when nothing matched; `errors` may appear alongside a 200.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub data: Vec<TweetItem>,
    #[serde(default)]
    pub meta: Option<SearchMeta>,
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchMeta {
    #[serde(default)]
    pub result_count: u32,
}

/// Problem object used by the v2 API both for error bodies and partial errors.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiProblem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiProblem {
    pub(crate) fn describe(&self) -> String {
        self.detail
            .as_deref()
            .or(self.message.as_deref())
            .or(self.title.as_deref())
            .unwrap_or("unknown error")
            .to_string()
    }
}

impl From<TweetItem> for Post {
    fn from(item: TweetItem) -> Self {
        Self {
            id: Some(item.id),
            text: item.text,
            lang: item.lang,
        }
    }
}
