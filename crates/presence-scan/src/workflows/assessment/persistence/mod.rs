//! Best-effort side channel: spreadsheet-style submission log plus document upload.
//!
//! Nothing in here may fail a submission. Every adapter error is retried within
//! the configured budget, logged, and folded into the returned receipt.

pub mod csv_log;
pub mod drive;
pub mod sheets;

pub use csv_log::CsvSubmissionLog;
pub use drive::GoogleDriveStore;
pub use sheets::GoogleSheetsLog;

use std::fmt::Debug;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::intake::VerifiedRespondent;

/// Link column marker written when the upload was attempted and failed.
pub const UPLOAD_FAILED_MARKER: &str = "upload-failed";

/// One appended row, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRow {
    pub timestamp: String,
    pub display_name: String,
    pub business_name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub total_score: u8,
    pub document_link: String,
}

impl SubmissionRow {
    pub const HEADERS: [&'static str; 8] = [
        "timestamp",
        "display_name",
        "business_name",
        "email",
        "phone",
        "website",
        "total_score",
        "document_link",
    ];

    pub fn new(
        submitted_at: DateTime<Utc>,
        respondent: &VerifiedRespondent,
        total_score: u8,
        document_link: String,
    ) -> Self {
        Self {
            timestamp: submitted_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            display_name: respondent.display_name.clone(),
            business_name: respondent.business_name.clone().unwrap_or_default(),
            email: respondent.email.clone(),
            phone: respondent.phone.clone().unwrap_or_default(),
            website: respondent.website.clone().unwrap_or_default(),
            total_score,
            document_link,
        }
    }

    pub fn cells(&self) -> [String; 8] {
        [
            self.timestamp.clone(),
            self.display_name.clone(),
            self.business_name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.website.clone(),
            self.total_score.to_string(),
            self.document_link.clone(),
        ]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("persistence backend failed: {0}")]
    Backend(String),
    #[error("persistence call timed out after {0:?}")]
    Timeout(Duration),
    #[error("persistence runtime unavailable: {0}")]
    Runtime(String),
    #[error("submission log io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("submission log csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Durable append-only log of submissions (spreadsheet, CSV file, ...).
pub trait SubmissionLog: Debug + Send + Sync {
    fn append(&self, row: &SubmissionRow) -> Result<(), PersistenceError>;
}

/// File store receiving rendered documents; returns a shareable link.
pub trait ReportStore: Debug + Send + Sync {
    fn store(&self, file_name: &str, document: &[u8]) -> Result<String, PersistenceError>;
}

/// Bounded retry with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    fn run<T>(
        &self,
        operation: &'static str,
        mut call: impl FnMut() -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match call() {
                Ok(value) => return Ok(value),
                Err(err) if attempt < attempts => {
                    tracing::debug!(operation, attempt, error = %err, "retrying persistence call");
                    attempt += 1;
                    if !self.backoff.is_zero() {
                        thread::sleep(self.backoff);
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(250),
        }
    }
}

/// Outcome of the best-effort persistence step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersistenceReceipt {
    pub logged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_link: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Composes the optional file store and submission log behind one call.
#[derive(Debug, Clone, Default)]
pub struct PersistenceAdapter {
    log: Option<Arc<dyn SubmissionLog>>,
    store: Option<Arc<dyn ReportStore>>,
    retry: RetryPolicy,
}

impl PersistenceAdapter {
    pub fn new(
        log: Option<Arc<dyn SubmissionLog>>,
        store: Option<Arc<dyn ReportStore>>,
        retry: RetryPolicy,
    ) -> Self {
        Self { log, store, retry }
    }

    /// Adapter with nothing configured; every call is a no-op.
    pub fn disabled() -> Self {
        Self::new(None, None, RetryPolicy::once())
    }

    pub fn is_enabled(&self) -> bool {
        self.log.is_some() || self.store.is_some()
    }

    pub fn persist(
        &self,
        submitted_at: DateTime<Utc>,
        respondent: &VerifiedRespondent,
        total_score: u8,
        file_name: &str,
        document: &[u8],
    ) -> PersistenceReceipt {
        let mut receipt = PersistenceReceipt::default();

        let link_cell = match &self.store {
            Some(store) => match self
                .retry
                .run("store_document", || store.store(file_name, document))
            {
                Ok(link) => {
                    receipt.document_link = Some(link.clone());
                    link
                }
                Err(err) => {
                    tracing::warn!(error = %err, file_name, "report upload failed; continuing without link");
                    receipt.warnings.push(format!("document upload failed: {err}"));
                    UPLOAD_FAILED_MARKER.to_string()
                }
            },
            None => String::new(),
        };

        if let Some(log) = &self.log {
            let row = SubmissionRow::new(submitted_at, respondent, total_score, link_cell);
            match self.retry.run("append_submission", || log.append(&row)) {
                Ok(()) => receipt.logged = true,
                Err(err) => {
                    tracing::warn!(error = %err, "submission log append failed");
                    receipt.warnings.push(format!("submission log failed: {err}"));
                }
            }
        }

        receipt
    }
}
