use std::path::Path;
use std::time::Duration;

use google_sheets4::api::{Scope, ValueRange};
use google_sheets4::hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use google_sheets4::hyper_util::client::legacy::connect::HttpConnector;
use google_sheets4::hyper_util::client::legacy::Client;
use google_sheets4::hyper_util::rt::TokioExecutor;
use google_sheets4::{yup_oauth2, Sheets};
use serde_json::Value;
use tokio::runtime::Handle;

use super::{PersistenceError, SubmissionLog, SubmissionRow};

/// Appends submission rows to a Google spreadsheet range.
///
/// Like the Drive store, `append` blocks on the captured runtime handle.
pub struct GoogleSheetsLog<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    hub: Sheets<C>,
    handle: Handle,
    spreadsheet_id: String,
    range: String,
    timeout: Duration,
}

impl<C> GoogleSheetsLog<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    pub fn new(
        hub: Sheets<C>,
        handle: Handle,
        spreadsheet_id: String,
        range: String,
        timeout: Duration,
    ) -> Self {
        Self {
            hub,
            handle,
            spreadsheet_id,
            range,
            timeout,
        }
    }
}

impl GoogleSheetsLog<HttpsConnector<HttpConnector>> {
    pub async fn connect(
        key_path: &Path,
        spreadsheet_id: String,
        range: String,
        timeout: Duration,
    ) -> Result<Self, PersistenceError> {
        let key = yup_oauth2::read_service_account_key(key_path).await?;
        let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
            .build()
            .await?;
        let connector = HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        let hub = Sheets::new(client, auth);
        let handle = Handle::try_current().map_err(|err| PersistenceError::Runtime(err.to_string()))?;
        Ok(Self::new(hub, handle, spreadsheet_id, range, timeout))
    }
}

impl<C> std::fmt::Debug for GoogleSheetsLog<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsLog")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

/// Spreadsheet cells for one row, in `SubmissionRow::HEADERS` order; the score stays numeric.
pub(crate) fn row_values(row: &SubmissionRow) -> Vec<Value> {
    let SubmissionRow {
        timestamp,
        display_name,
        business_name,
        email,
        phone,
        website,
        total_score,
        document_link,
    } = row;
    vec![
        Value::String(timestamp.clone()),
        Value::String(display_name.clone()),
        Value::String(business_name.clone()),
        Value::String(email.clone()),
        Value::String(phone.clone()),
        Value::String(website.clone()),
        Value::from(*total_score),
        Value::String(document_link.clone()),
    ]
}

impl<C> SubmissionLog for GoogleSheetsLog<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    fn append(&self, row: &SubmissionRow) -> Result<(), PersistenceError> {
        let request = ValueRange {
            values: Some(vec![row_values(row)]),
            ..ValueRange::default()
        };

        let result = self.handle.block_on(async {
            tokio::time::timeout(
                self.timeout,
                self.hub
                    .spreadsheets()
                    .values_append(request, &self.spreadsheet_id, &self.range)
                    .value_input_option("USER_ENTERED")
                    .insert_data_option("INSERT_ROWS")
                    .add_scope(Scope::Spreadsheet)
                    .doit(),
            )
            .await
        });

        result
            .map_err(|_| PersistenceError::Timeout(self.timeout))?
            .map_err(|err| PersistenceError::Backend(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::workflows::assessment::intake::VerifiedRespondent;

    #[test]
    fn row_values_keep_score_numeric() {
        let respondent = VerifiedRespondent {
            display_name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            business_name: None,
            phone: Some("+34 600 000 000".to_string()),
            website: None,
        };
        let at = Utc
            .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .expect("valid timestamp");
        let row = SubmissionRow::new(at, &respondent, 63, "https://drive.example/doc".to_string());

        let values = row_values(&row);

        assert_eq!(values.len(), SubmissionRow::HEADERS.len());
        let column = |name: &str| {
            let index = SubmissionRow::HEADERS
                .iter()
                .position(|header| *header == name)
                .expect("known column");
            &values[index]
        };
        assert_eq!(column("timestamp"), &Value::String("2026-01-02T03:04:05Z".to_string()));
        assert_eq!(column("phone"), &Value::String("+34 600 000 000".to_string()));
        assert_eq!(column("total_score"), &Value::from(63));
        assert_eq!(
            column("document_link"),
            &Value::String("https://drive.example/doc".to_string())
        );

        let cells = row.cells();
        for (value, cell) in values.iter().zip(cells.iter()) {
            match value {
                Value::String(text) => assert_eq!(text, cell),
                other => assert_eq!(&other.to_string(), cell),
            }
        }
    }
}
