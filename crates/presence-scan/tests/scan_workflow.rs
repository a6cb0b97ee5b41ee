//! End-to-end scan scenarios through the public service facade and HTTP router,
//! using the digital maturity questionnaire and a CSV submission log.

mod common {
    use std::path::Path;
    use std::sync::Arc;

    use presence_scan::assessment::{
        AnswerRecord, CsvSubmissionLog, PdfReportRenderer, PersistenceAdapter, Questionnaire,
        ReportTheme, Respondent, RetryPolicy, ScanSubmission, ScoringEngine, SubmissionLog,
        SubmissionService,
    };

    pub(super) fn respondent() -> Respondent {
        Respondent {
            display_name: "Tomas Vidal".to_string(),
            email: "tomas@fieldwork.example".to_string(),
            business_name: None,
            phone: None,
            website: Some("fieldwork.example".to_string()),
        }
    }

    /// 69 points: Brand 15, Web 18, Content 18, Ads 5, Sales 13.
    pub(super) fn answers() -> AnswerRecord {
        AnswerRecord::new()
            .with_choice("brand_identity", "manual")
            .with_choice("message_clarity", "partial")
            .with_choice("website", "informational")
            .with_choice("mobile_speed", "fast")
            .with_choice("posting_frequency", "daily")
            .with_scale("content_quality", 8)
            .with_choice("ad_budget", "none")
            .with_choice("ad_tracking", "basic")
            .with_choice("crm", "yes")
            .with_choice("follow_up", "same_day")
    }

    pub(super) fn submission() -> ScanSubmission {
        ScanSubmission {
            respondent: respondent(),
            answers: answers(),
        }
    }

    pub(super) fn service(csv_path: &Path) -> SubmissionService {
        let engine = ScoringEngine::new(Questionnaire::digital_maturity())
            .expect("builtin questionnaire is valid");
        let theme = ReportTheme {
            organization: "Fieldwork Labs".to_string(),
            ..ReportTheme::default()
        };
        let log: Arc<dyn SubmissionLog> = Arc::new(CsvSubmissionLog::new(csv_path));
        SubmissionService::new(
            engine,
            Arc::new(PdfReportRenderer::new(theme)),
            PersistenceAdapter::new(Some(log), None, RetryPolicy::once()),
        )
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use presence_scan::assessment::{scan_router, Category, MaturityLevel, SubmissionError};
use tower::ServiceExt;

use common::*;

#[test]
fn submission_is_scored_rendered_and_logged() {
    let dir = tempfile::tempdir().expect("temp dir");
    let csv_path = dir.path().join("logs").join("submissions.csv");
    let service = service(&csv_path);

    let outcome = service.submit(submission()).expect("submission succeeds");

    assert_eq!(outcome.result.total, 69);
    assert_eq!(outcome.result.level, MaturityLevel::Growing);
    assert_eq!(outcome.result.category_score(Category::Web), 18);
    assert_eq!(outcome.result.category_score(Category::Sales), 13);
    assert_eq!(
        outcome.result.recommendations,
        vec![
            "Brand: make your value proposition clear within three seconds.".to_string(),
            "Web: publish a site that answers who you are and how to buy.".to_string(),
            "Sales: enable online checkout or booking.".to_string(),
            "Ads: commit a fixed monthly advertising budget.".to_string(),
            "Ads: install a tracking pixel and define conversion goals.".to_string(),
            "Sales: answer new leads within the hour.".to_string(),
        ]
    );
    assert_eq!(outcome.benchmarks[&Category::Web], 13);

    let pdf = String::from_utf8_lossy(&outcome.report.document);
    assert!(pdf.contains("Report: Tomas Vidal"));
    assert!(pdf.contains("Final score: 69/100 - Status: Growing"));
    assert!(pdf.contains("Prepared by Fieldwork Labs"));

    assert!(outcome.receipt.logged);
    let logged = std::fs::read_to_string(&csv_path).expect("log written");
    let lines: Vec<&str> = logged.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("timestamp,display_name"));
    assert!(lines[1].contains("Tomas Vidal"));
    assert!(lines[1].ends_with(",69,"));
}

#[test]
fn repeated_submissions_append_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let csv_path = dir.path().join("submissions.csv");
    let service = service(&csv_path);

    service.submit(submission()).expect("first submission");
    service.submit(submission()).expect("second submission");

    let logged = std::fs::read_to_string(&csv_path).expect("log written");
    assert_eq!(logged.lines().count(), 3);
}

#[test]
fn missing_email_leaves_the_log_untouched() {
    let dir = tempfile::tempdir().expect("temp dir");
    let csv_path = dir.path().join("submissions.csv");
    let service = service(&csv_path);
    let mut submission = submission();
    submission.respondent.email = "  ".to_string();

    let error = service.submit(submission).expect_err("email is required");

    assert!(matches!(error, SubmissionError::Validation(_)));
    assert!(!csv_path.exists());
}

#[tokio::test]
async fn report_route_delivers_the_pdf() {
    let dir = tempfile::tempdir().expect("temp dir");
    let router = scan_router(Arc::new(service(&dir.path().join("submissions.csv"))));

    let response = router
        .oneshot(
            Request::post("/api/v1/scans/report")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&submission()).expect("serialize submission"),
                ))
                .expect("valid request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-scan-score"], "69");
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    assert!(body.starts_with(b"%PDF-1.4"));
}

#[tokio::test]
async fn preview_route_rejects_malformed_answers() {
    let dir = tempfile::tempdir().expect("temp dir");
    let router = scan_router(Arc::new(service(&dir.path().join("submissions.csv"))));
    let payload = serde_json::json!({
        "answers": { "content_quality": "excellent" }
    });

    let response = router
        .oneshot(
            Request::post("/api/v1/scans/preview")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("valid request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
