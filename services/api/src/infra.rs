use metrics_exporter_prometheus::PrometheusHandle;
use presence_scan::assessment::{
    CsvSubmissionLog, PdfReportRenderer, PersistenceAdapter, Questionnaire, ReportStore,
    ScoringEngine, SubmissionLog, SubmissionService,
};
use presence_scan::assessment::persistence::{GoogleDriveStore, GoogleSheetsLog};
use presence_scan::config::{AppConfig, PersistenceConfig};
use presence_scan::error::AppError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the scoring engine, renderer, and persistence adapters from configuration.
pub(crate) async fn build_submission_service(
    config: &AppConfig,
) -> Result<SubmissionService, AppError> {
    let questionnaire = Questionnaire::resolve(&config.scan.questionnaire)?;
    info!(
        questionnaire = %questionnaire.slug,
        questions = questionnaire.questions.len(),
        rules = questionnaire.rules.len(),
        "questionnaire loaded"
    );
    let engine = ScoringEngine::new(questionnaire)?;
    let renderer = Arc::new(PdfReportRenderer::new(config.report.theme()));
    let persistence = build_persistence(&config.persistence).await?;

    Ok(SubmissionService::new(engine, renderer, persistence))
}

/// The spreadsheet log takes precedence over the CSV file when both are configured.
pub(crate) async fn build_persistence(
    config: &PersistenceConfig,
) -> Result<PersistenceAdapter, AppError> {
    let mut log: Option<Arc<dyn SubmissionLog>> = config
        .csv_path
        .as_ref()
        .map(|path| Arc::new(CsvSubmissionLog::new(path.clone())) as Arc<dyn SubmissionLog>);
    let mut store: Option<Arc<dyn ReportStore>> = None;

    if let Some(google) = &config.google {
        if let Some(spreadsheet_id) = &google.spreadsheet_id {
            let sheets = GoogleSheetsLog::connect(
                &google.service_account_key,
                spreadsheet_id.clone(),
                google.sheet_range.clone(),
                config.timeout,
            )
            .await?;
            if log.is_some() {
                warn!("GOOGLE_SPREADSHEET_ID set; PERSIST_CSV_PATH is ignored");
            }
            log = Some(Arc::new(sheets));
        }

        if let Some(folder_id) = &google.drive_folder_id {
            let drive = GoogleDriveStore::connect(
                &google.service_account_key,
                Some(folder_id.clone()),
                config.timeout,
            )
            .await?;
            store = Some(Arc::new(drive));
        }
    }

    let adapter = PersistenceAdapter::new(log, store, config.retry_policy());
    if !adapter.is_enabled() {
        info!("no submission log or document store configured; persistence disabled");
    }
    Ok(adapter)
}
