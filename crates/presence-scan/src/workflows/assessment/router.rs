use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;

use super::domain::{AnswerRecord, ScanSubmission};
use super::service::{SubmissionError, SubmissionOutcome, SubmissionService};

/// Disposition offered to browsers downloading the report.
pub const REPORT_DISPOSITION: &str = "attachment; filename=\"presence-audit.pdf\"";

/// Response header carrying the clamped total on report downloads.
pub const SCORE_HEADER: &str = "x-scan-score";

/// Body accepted by the preview endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    pub answers: AnswerRecord,
}

/// Router builder exposing the questionnaire, previews, and full submissions.
pub fn scan_router(service: Arc<SubmissionService>) -> Router {
    Router::new()
        .route("/api/v1/questionnaire", get(questionnaire_handler))
        .route("/api/v1/scans/preview", post(preview_handler))
        .route("/api/v1/scans", post(submit_handler))
        .route("/api/v1/scans/report", post(report_handler))
        .with_state(service)
}

pub(crate) async fn questionnaire_handler(
    State(service): State<Arc<SubmissionService>>,
) -> Response {
    (StatusCode::OK, axum::Json(service.questionnaire().clone())).into_response()
}

pub(crate) async fn preview_handler(
    State(service): State<Arc<SubmissionService>>,
    axum::Json(request): axum::Json<PreviewRequest>,
) -> Response {
    match service.preview(&request.answers) {
        Ok(preview) => (StatusCode::OK, axum::Json(preview)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler(
    State(service): State<Arc<SubmissionService>>,
    axum::Json(submission): axum::Json<ScanSubmission>,
) -> Response {
    match run_submission(service, submission).await {
        Ok(outcome) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(&outcome.report.document);
            let payload = json!({
                "total_score": outcome.result.total,
                "raw_total": outcome.result.raw_total,
                "level": outcome.result.level,
                "level_label": outcome.result.level.label(),
                "category_scores": outcome.result.category_scores,
                "benchmarks": outcome.benchmarks,
                "recommendations": outcome.result.recommendations,
                "chart_svg": outcome.report.chart_svg,
                "report": {
                    "file_name": outcome.report.file_name,
                    "content_type": "application/pdf",
                    "base64": encoded,
                },
                "persistence": outcome.receipt,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn report_handler(
    State(service): State<Arc<SubmissionService>>,
    axum::Json(submission): axum::Json<ScanSubmission>,
) -> Response {
    match run_submission(service, submission).await {
        Ok(outcome) => {
            let headers = [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
                (
                    header::CONTENT_DISPOSITION,
                    HeaderValue::from_static(REPORT_DISPOSITION),
                ),
                (
                    HeaderName::from_static(SCORE_HEADER),
                    HeaderValue::from(u16::from(outcome.result.total)),
                ),
            ];
            (StatusCode::OK, headers, outcome.report.document).into_response()
        }
        Err(response) => response,
    }
}

/// Moves the blocking pipeline (rendering, persistence calls) off the async executor.
async fn run_submission(
    service: Arc<SubmissionService>,
    submission: ScanSubmission,
) -> Result<SubmissionOutcome, Response> {
    match tokio::task::spawn_blocking(move || service.submit(submission)).await {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(error)) => Err(error_response(error)),
        Err(join_error) => {
            tracing::error!(error = %join_error, "submission task aborted");
            let payload = json!({
                "error": "submission processing aborted",
            });
            Err((StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response())
        }
    }
}

fn error_response(error: SubmissionError) -> Response {
    match error {
        SubmissionError::Validation(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        SubmissionError::Answers(error) => {
            let payload = json!({
                "error": error.to_string(),
                "question": error.question(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        SubmissionError::Rendering(error) => {
            tracing::error!(error = %error, "report rendering failed");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
