//! Digital presence assessment: questionnaire definitions, the scoring engine,
//! report rendering, and best-effort persistence of submissions.

pub mod benchmark;
pub mod domain;
pub mod intake;
pub mod persistence;
pub mod questionnaire;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use benchmark::BenchmarkProvider;
pub use domain::{
    AnswerChoice, AnswerRecord, AnswerValue, Category, ChoiceId, Question, QuestionId,
    QuestionInput, Respondent, ScanSubmission,
};
pub use intake::{verify_respondent, ValidationError, VerifiedRespondent};
pub use persistence::{
    CsvSubmissionLog, PersistenceAdapter, PersistenceError, PersistenceReceipt, ReportStore,
    RetryPolicy, SubmissionLog, SubmissionRow, UPLOAD_FAILED_MARKER,
};
pub use questionnaire::{CategoryProfile, MaximaMismatch, Questionnaire, QuestionnaireError};
pub use report::{
    BarChart, BarGroup, PdfReportRenderer, RenderError, RenderedReport, ReportContext,
    ReportRenderer, ReportTheme, Rgb,
};
pub use router::{scan_router, PreviewRequest};
pub use scoring::{
    score, AnswerError, ChoiceAdvice, ChoicePoints, MaturityLevel, RuleScoring, ScoreResult,
    ScoringEngine, ScoringRule, MAX_TOTAL_SCORE,
};
pub use service::{ScanPreview, SubmissionError, SubmissionOutcome, SubmissionService};
