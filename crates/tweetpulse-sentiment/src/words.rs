//! Word counts across fetched posts, as data for a word-cloud view.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use stop_words::{get, LANGUAGE};

/// Tweet boilerplate that carries no topical signal.
const NOISE_TOKENS: &[&str] = &["rt", "amp", "https", "http"];

const MIN_WORD_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

fn url_or_mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:https?://\S+|www\.\S+|@\w+)").expect("valid url/mention regex")
    })
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\p{L}\p{N}']+").expect("valid token regex"))
}

fn stop_words() -> &'static HashSet<String> {
    static WORDS: OnceLock<HashSet<String>> = OnceLock::new();
    WORDS.get_or_init(|| {
        get(LANGUAGE::English)
            .into_iter()
            .map(|w| w.to_lowercase())
            .collect()
    })
}

fn is_countable(word: &str) -> bool {
    word.chars().count() >= MIN_WORD_CHARS
        && !word.chars().all(|c| c.is_numeric())
        && !NOISE_TOKENS.contains(&word)
        && !stop_words().contains(word)
}

/// Counts lowercase words across `texts` and returns the `limit` most common.
///
/// URLs, `@mentions`, retweet markers, pure numbers, words shorter than three
/// characters, and English stop words are skipped. Ties are broken
/// alphabetically so the output is deterministic.
#[must_use]
pub fn word_frequencies<S: AsRef<str>>(texts: &[S], limit: usize) -> Vec<WordFrequency> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        let cleaned = url_or_mention_re().replace_all(text.as_ref(), " ");
        for token in token_re().find_iter(&cleaned) {
            let word = token.as_str().trim_matches('\'').to_lowercase();
            if is_countable(&word) {
                *counts.entry(word).or_insert(0) += 1;
            }
        }
    }

    let mut ranked: Vec<WordFrequency> = counts
        .into_iter()
        .map(|(word, count)| WordFrequency { word, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    ranked.truncate(limit);
    ranked
}
