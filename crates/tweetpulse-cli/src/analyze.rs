//! `analyze` command: run the pipeline once and print a summary.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tweetpulse_sentiment::export::write_csv;
use tweetpulse_sentiment::words::word_frequencies;
use tweetpulse_sentiment::{RunOutcome, RunResult, SentimentPipeline};

/// Longest tweet excerpt printed in the samples section.
const SAMPLE_CHARS: usize = 100;

#[derive(Debug)]
pub(crate) struct AnalyzeArgs {
    pub query: String,
    pub max_results: u32,
    pub csv: Option<PathBuf>,
    pub words: usize,
    pub samples: usize,
}

/// Runs one analysis and writes the report to `out`.
///
/// # Errors
///
/// Returns an error if the pipeline fails, the CSV file cannot be written,
/// or `out` rejects the report.
pub(crate) async fn run_analyze(
    pipeline: &SentimentPipeline,
    args: &AnalyzeArgs,
    cancel: &CancellationToken,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let outcome = pipeline
        .run_with(&args.query, args.max_results, cancel)
        .await?;

    let result = match outcome {
        RunOutcome::NoResults { .. } => {
            writeln!(out, "No tweets found.")?;
            return Ok(());
        }
        RunOutcome::Completed(result) => result,
    };

    write!(out, "{}", render_summary(&result, args.words, args.samples)?)?;

    if let Some(path) = &args.csv {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        write_csv(&result, BufWriter::new(file))
            .with_context(|| format!("failed to write {}", path.display()))?;
        writeln!(out)?;
        writeln!(out, "wrote {} rows to {}", result.len(), path.display())?;
    }

    Ok(())
}

fn excerpt(text: &str) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() > SAMPLE_CHARS {
        format!(
            "{}...",
            single_line.chars().take(SAMPLE_CHARS).collect::<String>()
        )
    } else {
        single_line
    }
}

/// Text report: fetched count, breakdown with shares, top words, samples.
///
/// # Errors
///
/// Only fails if formatting itself fails.
pub(crate) fn render_summary(
    result: &RunResult,
    words: usize,
    samples: usize,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let tally = result.tally();

    writeln!(
        out,
        "Fetched {} tweets for \"{}\".",
        result.len(),
        result.query()
    )?;
    writeln!(out)?;
    writeln!(out, "{:<12}{:>7}{:>9}", "SENTIMENT", "COUNT", "SHARE")?;
    for (label, count) in tally.iter() {
        writeln!(
            out,
            "{:<12}{:>7}{:>8.1}%",
            label.as_str(),
            count,
            tally.share(label) * 100.0
        )?;
    }

    if words > 0 {
        let texts: Vec<&str> = result.texts().collect();
        let top = word_frequencies(&texts, words);
        if !top.is_empty() {
            writeln!(out)?;
            writeln!(out, "Top words")?;
            let line = top
                .iter()
                .map(|w| format!("{} ({})", w.word, w.count))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out, "  {line}")?;
        }
    }

    if samples > 0 {
        writeln!(out)?;
        writeln!(out, "Sample tweets")?;
        for (post, classification) in result.rows().take(samples) {
            writeln!(
                out,
                "  [{:<8} {:.2}] {}",
                classification.label.as_str(),
                classification.score,
                excerpt(&post.text)
            )?;
        }
    }

    Ok(out)
}
