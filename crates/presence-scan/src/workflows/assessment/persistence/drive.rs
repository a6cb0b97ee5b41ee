use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use google_drive3::hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use google_drive3::hyper_util::client::legacy::connect::HttpConnector;
use google_drive3::hyper_util::client::legacy::Client;
use google_drive3::hyper_util::rt::TokioExecutor;
use google_drive3::{api::File, api::Scope, yup_oauth2, DriveHub};
use tokio::runtime::Handle;

use super::{PersistenceError, ReportStore};


/// Uploads rendered reports to a Drive folder and returns their web link.
///
/// Calls are driven through a captured runtime handle, so `store` must run on a
/// blocking thread (e.g. inside `spawn_blocking`), never directly on an async task.
pub struct GoogleDriveStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    hub: DriveHub<C>,
    handle: Handle,
    folder_id: Option<String>,
    timeout: Duration,
}

impl<C> GoogleDriveStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: DriveHub<C>, handle: Handle, folder_id: Option<String>, timeout: Duration) -> Self {
        Self {
            hub,
            handle,
            folder_id,
            timeout,
        }
    }

    fn map_error<E: std::fmt::Display>(err: E) -> PersistenceError {
        PersistenceError::Backend(err.to_string())
    }
}

impl GoogleDriveStore<HttpsConnector<HttpConnector>> {
    /// Authenticate with a service-account key and bind to the current runtime.
    pub async fn connect(
        key_path: &Path,
        folder_id: Option<String>,
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
        let hub = DriveHub::new(client, auth);
        let handle = Handle::try_current().map_err(|err| PersistenceError::Runtime(err.to_string()))?;
        Ok(Self::new(hub, handle, folder_id, timeout))
    }
}

impl<C> std::fmt::Debug for GoogleDriveStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleDriveStore")
            .field("folder_id", &self.folder_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl<C> ReportStore for GoogleDriveStore<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    fn store(&self, file_name: &str, document: &[u8]) -> Result<String, PersistenceError> {
        let metadata = File {
            name: Some(file_name.to_string()),
            mime_type: Some(mime::APPLICATION_PDF.as_ref().to_string()),
            parents: self.folder_id.clone().map(|parent| vec![parent]),
            ..File::default()
        };
        let cursor = Cursor::new(document.to_vec());

        let result = self.handle.block_on(async {
            tokio::time::timeout(
                self.timeout,
                self.hub
                    .files()
                    .create(metadata)
                    .param("fields", "id,webViewLink")
                    .supports_all_drives(true)
                    .add_scope(Scope::File)
                    .upload(cursor, mime::APPLICATION_PDF),
            )
            .await
        });

        let (_, file) = result
            .map_err(|_| PersistenceError::Timeout(self.timeout))?
            .map_err(GoogleDriveStore::<C>::map_error)?;

        match (file.web_view_link, file.id) {
            (Some(link), _) => Ok(link),
            (None, Some(id)) => Ok(format!("https://drive.google.com/file/d/{id}/view")),
            (None, None) => Err(PersistenceError::Backend(
                "drive returned no file id".to_string(),
            )),
        }
    }
}
