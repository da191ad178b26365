use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tweetpulse_sentiment::{
    Classification, Classifier, ClassifyError, Post, PostSource, RunResult, SearchError,
    SentimentLabel,
};

use super::*;
use crate::analyze::render_summary;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["tweetpulse-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_analyze_with_defaults() {
    let cli = Cli::try_parse_from(["tweetpulse-cli", "analyze", "openai"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Analyze {
            ref query,
            max_results: None,
            csv: None,
            words: 15,
            samples: 5,
        }) if query == "openai"
    ));
}

#[test]
fn parses_analyze_with_all_options() {
    let cli = Cli::try_parse_from([
        "tweetpulse-cli",
        "analyze",
        "rust lang",
        "--max-results",
        "50",
        "--csv",
        "out.csv",
        "--words",
        "10",
        "--samples",
        "0",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Analyze {
            ref query,
            max_results: Some(50),
            csv: Some(ref path),
            words: 10,
            samples: 0,
        }) if query == "rust lang" && path.as_os_str() == "out.csv"
    ));
}

#[test]
fn analyze_requires_query() {
    assert!(Cli::try_parse_from(["tweetpulse-cli", "analyze"]).is_err());
}

#[test]
fn analyze_rejects_out_of_range_max_results() {
    assert!(Cli::try_parse_from(["tweetpulse-cli", "analyze", "q", "--max-results", "0"]).is_err());
    assert!(
        Cli::try_parse_from(["tweetpulse-cli", "analyze", "q", "--max-results", "101"]).is_err()
    );
}

fn openai_result() -> RunResult {
    RunResult::new(
        "openai",
        vec![
            Post::from_text("I love this!"),
            Post::from_text("It's okay."),
            Post::from_text("This is terrible."),
        ],
        vec![
            Classification {
                label: SentimentLabel::Positive,
                score: 0.95,
            },
            Classification {
                label: SentimentLabel::Neutral,
                score: 0.7,
            },
            Classification {
                label: SentimentLabel::Negative,
                score: 0.88,
            },
        ],
    )
    .unwrap()
}

#[test]
fn summary_lists_count_breakdown_and_samples() {
    let summary = render_summary(&openai_result(), 5, 2).unwrap();

    assert!(summary.starts_with("Fetched 3 tweets for \"openai\"."));
    assert!(summary.contains("POSITIVE"));
    assert!(summary.contains("33.3%"));
    assert!(summary.contains("Top words"));
    assert!(summary.contains("love (1)"));
    assert!(summary.contains("[POSITIVE 0.95] I love this!"));
    assert!(summary.contains("[NEUTRAL  0.70] It's okay."));
    assert!(!summary.contains("This is terrible."));
}

#[test]
fn summary_omits_optional_sections_when_disabled() {
    let summary = render_summary(&openai_result(), 0, 0).unwrap();

    assert!(!summary.contains("Top words"));
    assert!(!summary.contains("Sample tweets"));
    assert!(summary.contains("NEGATIVE"));
}

/// Returns three fixed posts for "openai" and nothing for anything else.
struct FixtureSource;

#[async_trait]
impl PostSource for FixtureSource {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Post>, SearchError> {
        if query != "openai" {
            return Ok(Vec::new());
        }
        Ok(["I love this!", "It's okay.", "This is terrible."]
            .into_iter()
            .take(max_results as usize)
            .map(Post::from_text)
            .collect())
    }
}

#[derive(Default)]
struct KeywordClassifier {
    calls: AtomicUsize,
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, texts: &[String]) -> Result<Vec<Classification>, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| Classification {
                label: if t.contains("love") {
                    SentimentLabel::Positive
                } else if t.contains("terrible") {
                    SentimentLabel::Negative
                } else {
                    SentimentLabel::Neutral
                },
                score: 0.5,
            })
            .collect())
    }
}

fn fixture_pipeline(classifier: Arc<KeywordClassifier>) -> SentimentPipeline {
    SentimentPipeline::new(Arc::new(FixtureSource), classifier)
}

fn analyze_args(query: &str, csv: Option<PathBuf>) -> AnalyzeArgs {
    AnalyzeArgs {
        query: query.to_string(),
        max_results: 20,
        csv,
        words: 5,
        samples: 3,
    }
}

#[tokio::test]
async fn run_analyze_reports_no_tweets_found() {
    let classifier = Arc::new(KeywordClassifier::default());
    let pipeline = fixture_pipeline(classifier.clone());
    let tempdir = TempDir::new().unwrap();
    let csv_path = tempdir.path().join("out.csv");
    let mut out = Vec::new();

    run_analyze(
        &pipeline,
        &analyze_args("zzz_no_match_xyz", Some(csv_path.clone())),
        &CancellationToken::new(),
        &mut out,
    )
    .await
    .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "No tweets found.\n");
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    assert!(!csv_path.exists());
}

#[tokio::test]
async fn run_analyze_writes_csv_and_reports_row_count() {
    let pipeline = fixture_pipeline(Arc::new(KeywordClassifier::default()));
    let tempdir = TempDir::new().unwrap();
    let csv_path = tempdir.path().join("out.csv");
    let mut out = Vec::new();

    run_analyze(
        &pipeline,
        &analyze_args("openai", Some(csv_path.clone())),
        &CancellationToken::new(),
        &mut out,
    )
    .await
    .unwrap();

    let report = String::from_utf8(out).unwrap();
    assert!(report.starts_with("Fetched 3 tweets for \"openai\"."));
    assert!(report.ends_with(&format!("wrote 3 rows to {}\n", csv_path.display())));

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        [
            "Tweet,Sentiment,Score",
            "I love this!,POSITIVE,0.5",
            "It's okay.,NEUTRAL,0.5",
            "This is terrible.,NEGATIVE,0.5",
        ]
    );
}

#[tokio::test]
async fn run_analyze_without_csv_prints_summary_only() {
    let pipeline = fixture_pipeline(Arc::new(KeywordClassifier::default()));
    let mut out = Vec::new();

    run_analyze(
        &pipeline,
        &analyze_args("openai", None),
        &CancellationToken::new(),
        &mut out,
    )
    .await
    .unwrap();

    let report = String::from_utf8(out).unwrap();
    assert!(report.contains("Sample tweets"));
    assert!(!report.contains("wrote"));
}

#[tokio::test]
async fn run_analyze_propagates_blank_query_error() {
    let pipeline = fixture_pipeline(Arc::new(KeywordClassifier::default()));
    let mut out = Vec::new();

    let err = run_analyze(
        &pipeline,
        &analyze_args("   ", None),
        &CancellationToken::new(),
        &mut out,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("query"), "unexpected error: {err}");
    assert!(out.is_empty());
}
