//! Query analysis handlers: JSON summary and CSV download.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tweetpulse_sentiment::export::{to_csv_bytes, CSV_FILE_NAME};
use tweetpulse_sentiment::words::{word_frequencies, WordFrequency};
use tweetpulse_sentiment::{
    PipelineError, RunOutcome, RunResult, SentimentLabel, SentimentTally, MAX_PAGE_SIZE,
};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Most frequent words returned alongside an analysis.
const WORD_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    #[serde(default)]
    pub query: String,
    pub max_results: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ExportQuery {
    #[serde(default)]
    pub query: String,
    pub max_results: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalyzeData {
    pub status: &'static str,
    pub query: String,
    pub tally: SentimentTally,
    pub shares: Shares,
    pub rows: Vec<AnalyzeRow>,
    pub words: Vec<WordFrequency>,
}

#[derive(Debug, Default, Serialize)]
pub(super) struct Shares {
    #[serde(rename = "POSITIVE")]
    pub positive: f64,
    #[serde(rename = "NEUTRAL")]
    pub neutral: f64,
    #[serde(rename = "NEGATIVE")]
    pub negative: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalyzeRow {
    pub tweet: String,
    pub sentiment: SentimentLabel,
    pub score: f32,
}

impl AnalyzeData {
    fn no_results(query: String) -> Self {
        Self {
            status: "no_results",
            query,
            tally: SentimentTally::default(),
            shares: Shares::default(),
            rows: Vec::new(),
            words: Vec::new(),
        }
    }

    fn completed(result: &RunResult) -> Self {
        let tally = *result.tally();
        let texts: Vec<&str> = result.texts().collect();
        Self {
            status: "completed",
            query: result.query().to_string(),
            tally,
            shares: Shares {
                positive: tally.share(SentimentLabel::Positive),
                neutral: tally.share(SentimentLabel::Neutral),
                negative: tally.share(SentimentLabel::Negative),
            },
            rows: result
                .rows()
                .map(|(post, c)| AnalyzeRow {
                    tweet: post.text.clone(),
                    sentiment: c.label,
                    score: c.score,
                })
                .collect(),
            words: word_frequencies(&texts, WORD_LIMIT),
        }
    }
}

fn validate_max_results(rid: &str, value: Option<u32>, default: u32) -> Result<u32, ApiError> {
    match value {
        None => Ok(default),
        Some(n) if (1..=MAX_PAGE_SIZE).contains(&n) => Ok(n),
        Some(n) => Err(ApiError::new(
            rid,
            "validation_error",
            format!("max_results must be between 1 and {MAX_PAGE_SIZE}, got {n}"),
        )),
    }
}

/// Malformed bodies and query strings get the same envelope as other bad input.
fn map_rejection(rid: &str, rejection: &impl std::fmt::Display) -> ApiError {
    ApiError::new(
        rid,
        "validation_error",
        format!("invalid request: {rejection}"),
    )
}

fn map_pipeline_error(rid: &str, error: &PipelineError) -> ApiError {
    if !matches!(error, PipelineError::EmptyQuery) {
        tracing::error!(request_id = %rid, code = error.code(), error = %error, "analysis failed");
    }
    ApiError::new(rid, error.code(), error.to_string())
}

async fn run_query(
    state: &AppState,
    rid: &str,
    query: &str,
    max_results: Option<u32>,
) -> Result<RunOutcome, ApiError> {
    let max_results = validate_max_results(rid, max_results, state.pipeline.max_results())?;
    state
        .pipeline
        .run_with(query, max_results, &state.shutdown.child_token())
        .await
        .map_err(|e| map_pipeline_error(rid, &e))
}

/// POST /api/v1/analyze: fetch, classify, and summarize posts for a query.
pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AnalyzeData>>, ApiError> {
    let Json(body) = body.map_err(|e| map_rejection(&req_id.0, &e))?;
    let outcome = run_query(&state, &req_id.0, &body.query, body.max_results).await?;

    let data = match outcome {
        RunOutcome::NoResults { query } => AnalyzeData::no_results(query),
        RunOutcome::Completed(result) => AnalyzeData::completed(&result),
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/analyze/export: the same analysis as a CSV attachment.
///
/// Nothing is offered for download when the query matched no posts.
pub(super) async fn export(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let rid = &req_id.0;
    let Query(params) = params.map_err(|e| map_rejection(rid, &e))?;
    let outcome = run_query(&state, rid, &params.query, params.max_results).await?;

    let result = match outcome {
        RunOutcome::Completed(result) => result,
        RunOutcome::NoResults { query } => {
            return Err(ApiError::new(
                rid,
                "no_results",
                format!("no tweets found for '{query}'"),
            ));
        }
    };

    let body = to_csv_bytes(&result).map_err(|e| {
        tracing::error!(request_id = %rid, error = %e, "CSV export failed");
        ApiError::new(rid, "internal_error", "failed to render CSV")
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_max_results_applies_default_and_bounds() {
        assert_eq!(validate_max_results("r", None, 20).unwrap(), 20);
        assert_eq!(validate_max_results("r", Some(1), 20).unwrap(), 1);
        assert_eq!(validate_max_results("r", Some(100), 20).unwrap(), 100);
        assert!(validate_max_results("r", Some(0), 20).is_err());
        assert!(validate_max_results("r", Some(101), 20).is_err());
    }

    #[test]
    fn no_results_data_has_zeroed_tally_and_shares() {
        let data = AnalyzeData::no_results("zzz".to_string());
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["status"], "no_results");
        assert_eq!(
            json["tally"],
            serde_json::json!({ "POSITIVE": 0, "NEUTRAL": 0, "NEGATIVE": 0 })
        );
        assert_eq!(json["shares"]["POSITIVE"], 0.0);
        assert!(json["rows"].as_array().unwrap().is_empty());
    }
}
