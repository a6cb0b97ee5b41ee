use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::assessment::domain::{AnswerRecord, Respondent, ScanSubmission};
use crate::workflows::assessment::persistence::{
    PersistenceAdapter, PersistenceError, ReportStore, RetryPolicy, SubmissionLog, SubmissionRow,
};
use crate::workflows::assessment::questionnaire::Questionnaire;
use crate::workflows::assessment::report::{
    PdfReportRenderer, RenderError, RenderedReport, ReportContext, ReportRenderer,
};
use crate::workflows::assessment::scoring::ScoringEngine;
use crate::workflows::assessment::service::SubmissionService;

pub(super) fn submitted_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 10, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn respondent() -> Respondent {
    Respondent {
        display_name: "Lucia Romero".to_string(),
        email: "lucia@harbor.example".to_string(),
        business_name: Some("Harbor Coffee".to_string()),
        phone: Some("+34 611 222 333".to_string()),
        website: Some("https://harbor.example".to_string()),
    }
}

/// Halfway answers: 50 points, two recommendations.
pub(super) fn growing_answers() -> AnswerRecord {
    AnswerRecord::new()
        .with_choice("brand_identity", "logo_only")
        .with_choice("website", "basic")
        .with_choice("posting_frequency", "few_per_week")
        .with_scale("content_quality", 7)
        .with_selections("active_channels", &["instagram", "linkedin"])
        .with_choice("paid_ads", "sporadic")
        .with_choice("crm", "no")
}

pub(super) fn maximal_answers() -> AnswerRecord {
    AnswerRecord::new()
        .with_choice("brand_identity", "manual")
        .with_choice("website", "optimized_store")
        .with_choice("posting_frequency", "daily")
        .with_scale("content_quality", 10)
        .with_selections(
            "active_channels",
            &["instagram", "linkedin", "tiktok", "facebook", "youtube"],
        )
        .with_choice("paid_ads", "monthly")
        .with_choice("crm", "yes")
}

pub(super) fn submission() -> ScanSubmission {
    ScanSubmission {
        respondent: respondent(),
        answers: growing_answers(),
    }
}

pub(super) fn anonymous_submission() -> ScanSubmission {
    let mut submission = submission();
    submission.respondent.display_name = "   ".to_string();
    submission
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(Questionnaire::brand_scanner_360()).expect("builtin questionnaire is valid")
}

pub(super) fn build_service(
    persistence: PersistenceAdapter,
) -> (SubmissionService, Arc<CountingRenderer>) {
    let renderer = Arc::new(CountingRenderer::default());
    let service = SubmissionService::new(engine(), renderer.clone(), persistence);
    (service, renderer)
}

pub(super) fn adapter(
    log: Option<Arc<dyn SubmissionLog>>,
    store: Option<Arc<dyn ReportStore>>,
) -> PersistenceAdapter {
    PersistenceAdapter::new(
        log,
        store,
        RetryPolicy {
            max_attempts: 2,
            backoff: std::time::Duration::ZERO,
        },
    )
}

/// Real renderer wrapped with a call counter.
#[derive(Debug, Default)]
pub(super) struct CountingRenderer {
    inner: PdfReportRenderer,
    calls: AtomicUsize,
}

impl CountingRenderer {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReportRenderer for CountingRenderer {
    fn render(&self, context: &ReportContext<'_>) -> Result<RenderedReport, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.render(context)
    }
}

#[derive(Debug)]
pub(super) struct BrokenRenderer;

impl ReportRenderer for BrokenRenderer {
    fn render(&self, _context: &ReportContext<'_>) -> Result<RenderedReport, RenderError> {
        Err(RenderError::Unavailable("font cache missing".to_string()))
    }
}

#[derive(Debug, Default)]
pub(super) struct MemoryLog {
    rows: Mutex<Vec<SubmissionRow>>,
}

impl MemoryLog {
    pub(super) fn rows(&self) -> Vec<SubmissionRow> {
        self.rows.lock().expect("log mutex poisoned").clone()
    }
}

impl SubmissionLog for MemoryLog {
    fn append(&self, row: &SubmissionRow) -> Result<(), PersistenceError> {
        self.rows
            .lock()
            .expect("log mutex poisoned")
            .push(row.clone());
        Ok(())
    }
}

/// Store that hands out a link and remembers what it received.
#[derive(Debug, Default)]
pub(super) struct MemoryStore {
    files: Mutex<Vec<(String, usize)>>,
}

impl MemoryStore {
    pub(super) fn files(&self) -> Vec<(String, usize)> {
        self.files.lock().expect("store mutex poisoned").clone()
    }
}

impl ReportStore for MemoryStore {
    fn store(&self, file_name: &str, document: &[u8]) -> Result<String, PersistenceError> {
        self.files
            .lock()
            .expect("store mutex poisoned")
            .push((file_name.to_string(), document.len()));
        Ok(format!("https://files.example/{file_name}"))
    }
}

/// Fails every call and counts attempts.
#[derive(Debug, Default)]
pub(super) struct OfflineBackend {
    attempts: AtomicUsize,
}

impl OfflineBackend {
    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ReportStore for OfflineBackend {
    fn store(&self, _file_name: &str, _document: &[u8]) -> Result<String, PersistenceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(PersistenceError::Backend("drive offline".to_string()))
    }
}

impl SubmissionLog for OfflineBackend {
    fn append(&self, _row: &SubmissionRow) -> Result<(), PersistenceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(PersistenceError::Timeout(std::time::Duration::from_secs(10)))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}
