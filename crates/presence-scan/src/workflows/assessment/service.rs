use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::benchmark::BenchmarkProvider;
use super::domain::{AnswerRecord, Category, ScanSubmission};
use super::intake::{verify_respondent, ValidationError, VerifiedRespondent};
use super::persistence::{PersistenceAdapter, PersistenceReceipt};
use super::questionnaire::Questionnaire;
use super::report::{RenderError, RenderedReport, ReportContext, ReportRenderer};
use super::scoring::{AnswerError, ScoreResult, ScoringEngine};

/// Service sequencing identity checks, scoring, rendering, and best-effort persistence.
#[derive(Debug, Clone)]
pub struct SubmissionService {
    engine: Arc<ScoringEngine>,
    benchmarks: Arc<BenchmarkProvider>,
    renderer: Arc<dyn ReportRenderer>,
    persistence: PersistenceAdapter,
}

/// Score plus benchmarks, without any document or side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanPreview {
    pub result: ScoreResult,
    pub benchmarks: BTreeMap<Category, i32>,
}

/// Everything produced for one accepted submission.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub respondent: VerifiedRespondent,
    pub result: ScoreResult,
    pub benchmarks: BTreeMap<Category, i32>,
    pub report: RenderedReport,
    pub receipt: PersistenceReceipt,
}

impl SubmissionService {
    /// Benchmarks default to the questionnaire's category table.
    pub fn new(
        engine: ScoringEngine,
        renderer: Arc<dyn ReportRenderer>,
        persistence: PersistenceAdapter,
    ) -> Self {
        let benchmarks = BenchmarkProvider::from_questionnaire(engine.questionnaire());
        Self {
            engine: Arc::new(engine),
            benchmarks: Arc::new(benchmarks),
            renderer,
            persistence,
        }
    }

    pub fn with_benchmarks(mut self, benchmarks: BenchmarkProvider) -> Self {
        self.benchmarks = Arc::new(benchmarks);
        self
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        self.engine.questionnaire()
    }

    pub fn persistence(&self) -> &PersistenceAdapter {
        &self.persistence
    }

    /// Score answers only; nothing is rendered or persisted.
    pub fn preview(&self, answers: &AnswerRecord) -> Result<ScanPreview, SubmissionError> {
        let result = self.engine.score(answers)?;
        let benchmarks = self
            .benchmarks
            .benchmarks(&self.questionnaire().category_order());
        Ok(ScanPreview { result, benchmarks })
    }

    /// Run the full pipeline for one submission.
    ///
    /// Blocks while persistence runs; call from a blocking context.
    pub fn submit(&self, submission: ScanSubmission) -> Result<SubmissionOutcome, SubmissionError> {
        self.submit_at(submission, Utc::now())
    }

    pub fn submit_at(
        &self,
        submission: ScanSubmission,
        submitted_at: DateTime<Utc>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let respondent = verify_respondent(submission.respondent)?;
        let result = self.engine.score(&submission.answers)?;

        let questionnaire = self.questionnaire();
        let benchmarks = self.benchmarks.benchmarks(&questionnaire.category_order());

        let context = ReportContext {
            questionnaire_title: &questionnaire.title,
            respondent: &respondent,
            result: &result,
            categories: &questionnaire.categories,
            benchmarks: &benchmarks,
            generated_at: submitted_at,
        };
        let report = self.renderer.render(&context)?;

        let receipt = self.persistence.persist(
            submitted_at,
            &respondent,
            result.total,
            &report.file_name,
            &report.document,
        );

        tracing::info!(
            questionnaire = %questionnaire.slug,
            total = result.total,
            level = result.level.label(),
            recommendations = result.recommendations.len(),
            logged = receipt.logged,
            warnings = receipt.warnings.len(),
            "scan submission processed"
        );

        Ok(SubmissionOutcome {
            respondent,
            result,
            benchmarks,
            report,
            receipt,
        })
    }
}

/// Error raised by the submission service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Answers(#[from] AnswerError),
    #[error(transparent)]
    Rendering(#[from] RenderError),
}
