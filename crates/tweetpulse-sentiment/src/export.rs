//! CSV export of a completed run.

use std::io;

use crate::error::ExportError;
use crate::types::RunResult;

/// Suggested download name for exported results.
pub const CSV_FILE_NAME: &str = "tweet_sentiments.csv";

pub const CSV_HEADER: [&str; 3] = ["Tweet", "Sentiment", "Score"];

/// Writes one `Tweet,Sentiment,Score` row per post, in fetch order.
///
/// # Errors
///
/// Returns [`ExportError`] if the underlying writer fails.
pub fn write_csv<W: io::Write>(result: &RunResult, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    for (post, classification) in result.rows() {
        csv_writer.write_record([
            post.text.as_str(),
            classification.label.as_str(),
            &classification.score.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders the export as UTF-8 bytes, e.g. for an HTTP download body.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization fails.
pub fn to_csv_bytes(result: &RunResult) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(result, &mut buf)?;
    Ok(buf)
}
